use std::collections::HashMap;

use bevy::color::ColorToPacked;
use bevy::prelude::*;

use crate::engine::presentation::state_machine::{CylinderSpec, DrillholeLayer};

const CYLINDER_RESOLUTION: u32 = 16;

/// Root of the step-scoped cylinder set. Despawning it removes every cylinder.
#[derive(Component, Debug)]
pub struct DrillholeSet;

#[derive(Component, Debug, Clone)]
pub struct DrillholeCylinder {
    pub hole_id: String,
}

/// Mesh and materials shared by every cylinder set.
///
/// Materials are keyed by packed sRGBA so re-attaching a layer reuses them.
#[derive(Resource, Default)]
pub struct DrillholeMeshes {
    unit_cylinder: Option<Handle<Mesh>>,
    materials: HashMap<[u8; 4], Handle<StandardMaterial>>,
}

impl DrillholeMeshes {
    fn unit_cylinder(&mut self, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
        self.unit_cylinder
            .get_or_insert_with(|| {
                meshes.add(
                    Cylinder::new(1.0, 1.0)
                        .mesh()
                        .resolution(CYLINDER_RESOLUTION),
                )
            })
            .clone()
    }

    fn material(
        &mut self,
        colour: Color,
        materials: &mut Assets<StandardMaterial>,
    ) -> Handle<StandardMaterial> {
        let key = colour.to_srgba().to_u8_array();
        self.materials
            .entry(key)
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: colour,
                    perceptual_roughness: 0.7,
                    ..default()
                })
            })
            .clone()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Drop the shared mesh and every cached material.
    pub fn release(&mut self, meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) {
        if let Some(mesh) = self.unit_cylinder.take() {
            meshes.remove(&mesh);
        }
        for (_, material) in self.materials.drain() {
            materials.remove(&material);
        }
    }
}

/// Unit cylinder stretched to the segment: radius on X/Z, length on Y.
pub fn cylinder_transform(spec: &CylinderSpec) -> Transform {
    Transform::from_translation(spec.translation).with_scale(Vec3::new(
        spec.radius,
        spec.length,
        spec.radius,
    ))
}

/// Spawn one parent with a cylinder child per spec.
pub fn spawn_drillhole_set(
    commands: &mut Commands,
    layer: &DrillholeLayer,
    shared: &mut DrillholeMeshes,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let mesh = shared.unit_cylinder(meshes);

    commands
        .spawn((
            DrillholeSet,
            Name::new(format!("Drillholes ({:?}, {:?})", layer.dataset, layer.mode)),
            Transform::default(),
            Visibility::Visible,
        ))
        .with_children(|parent| {
            for spec in &layer.cylinders {
                parent.spawn((
                    DrillholeCylinder {
                        hole_id: spec.hole_id.clone(),
                    },
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(shared.material(spec.colour, materials)),
                    cylinder_transform(spec),
                ));
            }
        })
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_transform_scales_unit_mesh() {
        let spec = CylinderSpec {
            hole_id: "DH-01".to_string(),
            translation: Vec3::new(1.0, -5.0, 2.0),
            length: 10.0,
            radius: 5.0,
            colour: Color::WHITE,
        };
        let transform = cylinder_transform(&spec);
        assert_eq!(transform.translation, Vec3::new(1.0, -5.0, 2.0));
        assert_eq!(transform.scale, Vec3::new(5.0, 10.0, 5.0));
    }

    #[test]
    fn test_materials_are_shared_per_colour() {
        let mut shared = DrillholeMeshes::default();
        let mut materials = Assets::<StandardMaterial>::default();

        let a = shared.material(Color::srgb_u8(0x3b, 0x3f, 0x58), &mut materials);
        let b = shared.material(Color::srgb_u8(0x3b, 0x3f, 0x58), &mut materials);
        let c = shared.material(Color::srgb_u8(0x9e, 0x9e, 0x9e), &mut materials);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(shared.material_count(), 2);

        let mut meshes = Assets::<Mesh>::default();
        shared.release(&mut meshes, &mut materials);
        assert_eq!(shared.material_count(), 0);
    }
}
