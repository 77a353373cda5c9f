use std::collections::BTreeMap;

use bevy::ecs::system::SystemParam;
use bevy::image::TextureAccessError;
use bevy::prelude::*;

use crate::engine::assets::site_config::SiteConfig;
use crate::engine::presentation::state_machine::{LayerContent, LayerId, SceneSink};
use crate::engine::presentation::step::AssetLayer;
use crate::engine::scene::drillholes::{DrillholeMeshes, spawn_drillhole_set};
use crate::engine::scene::layers::{
    LayerAsset, build_topography_mesh, imagery_material, imagery_plane_mesh, topography_material,
};

/// Loaded payload for a layer asset, ready to be turned into an entity.
pub enum LayerSource<'a> {
    Imagery(Handle<Image>),
    Topography {
        heightmap: &'a Image,
        drape: Option<Handle<Image>>,
    },
    Model(Handle<Scene>),
}

/// Entities currently materialised for the presentation.
#[derive(Resource, Default, Debug)]
pub struct LayerEntities {
    pub layers: BTreeMap<AssetLayer, Entity>,
    pub drillholes: Option<Entity>,
}

/// Bevy-backed scene writer. Only the presentation engine calls the `SceneSink` methods.
#[derive(SystemParam)]
pub struct BevySceneSink<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    entities: ResMut<'w, LayerEntities>,
    drillhole_meshes: ResMut<'w, DrillholeMeshes>,
    config: Res<'w, SiteConfig>,
}

impl BevySceneSink<'_, '_> {
    /// Release the cylinder mesh and material cache.
    pub fn release_shared(&mut self) {
        let Self {
            meshes,
            materials,
            drillhole_meshes,
            ..
        } = self;
        drillhole_meshes.release(meshes, materials);
    }

    fn set_visibility(&mut self, layer: AssetLayer, visibility: Visibility) {
        match self.entities.layers.get(&layer) {
            Some(&entity) => {
                self.commands.entity(entity).try_insert(visibility);
            }
            None => warn!("{:?} layer has no constructed asset", layer),
        }
    }
}

impl SceneSink for BevySceneSink<'_, '_> {
    type Source<'a> = LayerSource<'a>;
    type Error = TextureAccessError;

    fn construct(
        &mut self,
        asset: AssetLayer,
        source: LayerSource,
        translation: Vec3,
    ) -> Result<(), TextureAccessError> {
        if self.entities.layers.contains_key(&asset) {
            return Ok(());
        }

        let root = (
            LayerAsset(asset),
            Transform::from_translation(translation),
            Visibility::Hidden,
        );
        let entity = match source {
            LayerSource::Imagery(texture) => {
                let mesh = self.meshes.add(imagery_plane_mesh(self.config.plane_size));
                let material = self.materials.add(imagery_material(texture));
                self.commands
                    .spawn((root, Mesh3d(mesh), MeshMaterial3d(material)))
                    .id()
            }
            LayerSource::Topography { heightmap, drape } => {
                let mesh = build_topography_mesh(
                    heightmap,
                    self.config.plane_size,
                    self.config.topography_subdivisions,
                    self.config.displacement_scale,
                )?;
                let mesh = self.meshes.add(mesh);
                let material = self.materials.add(topography_material(drape));
                self.commands
                    .spawn((root, Mesh3d(mesh), MeshMaterial3d(material)))
                    .id()
            }
            LayerSource::Model(scene) => self.commands.spawn((root, SceneRoot(scene))).id(),
        };

        debug!("Constructed {:?} layer as {} at {}", asset, entity, translation);
        self.entities.layers.insert(asset, entity);
        Ok(())
    }

    fn place(&mut self, asset: AssetLayer, translation: Vec3) {
        if let Some(&entity) = self.entities.layers.get(&asset) {
            debug!("Moving {:?} layer to {}", asset, translation);
            self.commands
                .entity(entity)
                .try_insert(Transform::from_translation(translation));
        }
    }

    fn attach(&mut self, layer: &LayerContent) {
        match layer {
            LayerContent::Asset(asset) => self.set_visibility(*asset, Visibility::Visible),
            LayerContent::Drillholes(drillholes) => {
                let entity = spawn_drillhole_set(
                    &mut self.commands,
                    drillholes,
                    &mut self.drillhole_meshes,
                    &mut self.meshes,
                    &mut self.materials,
                );
                if let Some(previous) = self.entities.drillholes.replace(entity) {
                    self.commands.entity(previous).try_despawn();
                }
            }
        }
    }

    fn detach(&mut self, layer: LayerId) {
        match layer {
            LayerId::Asset(asset) => self.set_visibility(asset, Visibility::Hidden),
            LayerId::Drillholes { .. } => {
                if let Some(entity) = self.entities.drillholes.take() {
                    self.commands.entity(entity).try_despawn();
                }
            }
        }
    }

    fn dispose(&mut self, asset: AssetLayer) {
        if let Some(entity) = self.entities.layers.remove(&asset) {
            debug!("Disposing {:?} layer", asset);
            self.commands.entity(entity).try_despawn();
        }
    }
}
