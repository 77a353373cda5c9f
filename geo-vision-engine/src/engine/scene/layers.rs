use bevy::asset::RenderAssetUsages;
use bevy::image::TextureAccessError;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use crate::engine::presentation::step::AssetLayer;
use crate::engine::scene::heightmap::sample_intensity;

/// Marks the root entity of a constructed layer asset.
#[derive(Component, Debug, Clone, Copy)]
pub struct LayerAsset(pub AssetLayer);

/// Flat square carrying an imagery texture, centred on the scene origin.
pub fn imagery_plane_mesh(size: f32) -> Mesh {
    Mesh::from(Plane3d::default().mesh().size(size, size))
}

/// Unlit material so imagery keeps its source colours.
pub fn imagery_material(texture: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        unlit: true,
        cull_mode: None,
        ..default()
    }
}

/// Lit material for the displaced terrain. Untextured when no drape is available.
pub fn topography_material(drape: Option<Handle<Image>>) -> StandardMaterial {
    StandardMaterial {
        base_color: if drape.is_some() {
            Color::WHITE
        } else {
            Color::srgb(0.55, 0.5, 0.42)
        },
        base_color_texture: drape,
        perceptual_roughness: 0.9,
        ..default()
    }
}

/// Subdivided plane displaced along +Y by elevation intensity.
///
/// UVs match `imagery_plane_mesh` so the satellite drape lines up with the flat layer.
pub fn build_topography_mesh(
    heightmap: &Image,
    size: f32,
    subdivisions: u32,
    displacement_scale: f32,
) -> Result<Mesh, TextureAccessError> {
    let cells = subdivisions.max(1);
    let row_len = cells + 1;
    let half = size / 2.0;

    let mut positions = Vec::with_capacity((row_len * row_len) as usize);
    let mut uvs = Vec::with_capacity((row_len * row_len) as usize);

    for row in 0..row_len {
        let v = row as f32 / cells as f32;
        for col in 0..row_len {
            let u = col as f32 / cells as f32;
            let height = sample_intensity(heightmap, u, v)? * displacement_scale;
            positions.push([u * size - half, height, v * size - half]);
            uvs.push([u, v]);
        }
    }

    let mut indices = Vec::with_capacity((cells * cells * 6) as usize);
    for row in 0..cells {
        for col in 0..cells {
            let a = row * row_len + col;
            let b = a + 1;
            let c = a + row_len;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    Ok(Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
    .with_computed_normals())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;
    use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

    fn ramp_image() -> Image {
        Image::new(
            Extent3d {
                width: 2,
                height: 1,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            vec![0, 0, 0, 255, 255, 255, 255, 255],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        )
    }

    #[test]
    fn test_topography_vertex_and_index_counts() {
        let mesh = build_topography_mesh(&ramp_image(), 100.0, 4, 10.0).unwrap();
        assert_eq!(mesh.count_vertices(), 25);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(4 * 4 * 6));
    }

    #[test]
    fn test_topography_displaces_by_intensity() {
        let mesh = build_topography_mesh(&ramp_image(), 100.0, 1, 10.0).unwrap();
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("positions missing");
        };
        // Row-major from the (-x, -z) corner: black on the left, white on the right.
        assert_eq!(positions[0], [-50.0, 0.0, -50.0]);
        assert_eq!(positions[1], [50.0, 10.0, -50.0]);
    }

    #[test]
    fn test_topography_faces_up() {
        let mesh = build_topography_mesh(&ramp_image(), 10.0, 2, 0.0).unwrap();
        let Some(VertexAttributeValues::Float32x3(normals)) =
            mesh.attribute(Mesh::ATTRIBUTE_NORMAL)
        else {
            panic!("normals missing");
        };
        assert!(normals.iter().all(|n| n[1] > 0.99));
    }
}
