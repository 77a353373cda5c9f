use std::collections::BTreeMap;

use bevy::asset::UntypedAssetId;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;

use crate::engine::assets::site_config::SiteConfig;
use crate::engine::loading::progress::{LoadFailure, LoadStatus, LoadingProgress};
use crate::engine::presentation::state_machine::PresentationEngine;
use crate::engine::presentation::step::AssetLayer;
use crate::engine::scene::sink::{BevySceneSink, LayerSource};

/// An in-flight layer asset request.
#[derive(Debug, Clone)]
pub enum LayerHandle {
    Image(Handle<Image>),
    Scene(Handle<Scene>),
}

impl LayerHandle {
    pub fn untyped_id(&self) -> UntypedAssetId {
        match self {
            Self::Image(handle) => handle.id().untyped(),
            Self::Scene(handle) => handle.id().untyped(),
        }
    }
}

/// Satellite texture to drape over the terrain.
#[derive(Debug, Clone, PartialEq)]
pub enum Drape {
    /// Satellite imagery is still in flight. Terrain waits for it to settle.
    Pending,
    Texture(Handle<Image>),
    Untextured,
}

impl Drape {
    /// A drape is only usable once its image has loaded. A failed or absent
    /// satellite layer leaves the terrain untextured.
    pub fn resolve(satellite: Option<(&Handle<Image>, LoadStatus)>) -> Self {
        match satellite {
            Some((texture, LoadStatus::Loaded)) => Self::Texture(texture.clone()),
            Some((_, LoadStatus::Loading)) => Self::Pending,
            Some((_, LoadStatus::Failed(_))) | None => Self::Untextured,
        }
    }
}

/// Layer assets requested but not yet constructed.
#[derive(Resource, Default)]
pub struct LayerLoader {
    pending: BTreeMap<AssetLayer, LayerHandle>,
    satellite_texture: Option<Handle<Image>>,
}

impl LayerLoader {
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    fn drape(&self, asset_server: &AssetServer) -> Drape {
        Drape::resolve(self.satellite_texture.as_ref().map(|texture| {
            (texture, LoadStatus::from_state(asset_server.get_load_state(texture)))
        }))
    }
}

/// Request every layer asset whose step the catalog offered.
pub fn start_layer_loading(
    mut loader: ResMut<LayerLoader>,
    engine: Res<PresentationEngine>,
    config: Res<SiteConfig>,
    asset_server: Res<AssetServer>,
) {
    for step in engine.steps() {
        let Some(layer) = step.asset_layer() else {
            continue;
        };
        let path = config.asset_path(layer);
        info!("Loading {:?} layer from {}", layer, path);

        let handle = match layer {
            AssetLayer::OreBody => {
                LayerHandle::Scene(asset_server.load(GltfAssetLabel::Scene(0).from_asset(path)))
            }
            _ => LayerHandle::Image(asset_server.load(path)),
        };

        if let (AssetLayer::Satellite, LayerHandle::Image(texture)) = (layer, &handle) {
            loader.satellite_texture = Some(texture.clone());
        }
        loader.pending.insert(layer, handle);
    }
}

/// Hand each arrived layer payload to the engine, which builds it once.
pub fn track_layer_loading(
    mut loader: ResMut<LayerLoader>,
    mut engine: ResMut<PresentationEngine>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut sink: BevySceneSink,
    config: Res<SiteConfig>,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
) {
    if loader.is_idle() {
        return;
    }

    let mut settled = Vec::new();
    for (&layer, handle) in &loader.pending {
        let outcome = match LoadStatus::from_state(asset_server.get_load_state(handle.untyped_id())) {
            LoadStatus::Loading => continue,
            LoadStatus::Failed(reason) => Err(reason),
            LoadStatus::Loaded => {
                let source = match handle {
                    LayerHandle::Image(texture) if layer == AssetLayer::Topography => {
                        let Some(heightmap) = images.get(texture) else {
                            continue;
                        };
                        let drape = match loader.drape(&asset_server) {
                            Drape::Pending => continue,
                            Drape::Texture(texture) => Some(texture),
                            Drape::Untextured => None,
                        };
                        LayerSource::Topography { heightmap, drape }
                    }
                    LayerHandle::Image(texture) => LayerSource::Imagery(texture.clone()),
                    LayerHandle::Scene(scene) => LayerSource::Model(scene.clone()),
                };
                engine
                    .asset_ready(layer, source, &mut sink)
                    .map_err(|error| error.to_string())
            }
        };
        settled.push((layer, outcome));
    }

    for (layer, outcome) in settled {
        loader.pending.remove(&layer);
        match outcome {
            Ok(()) => {
                println!("✓ {:?} layer ready", layer);
                loading_progress.layers_ready.insert(layer);
            }
            Err(reason) => {
                loading_progress.record_failure(LoadFailure::Layer {
                    layer,
                    path: config.asset_path(layer),
                    reason,
                });
                engine.asset_failed(layer);
            }
        }
    }
}
