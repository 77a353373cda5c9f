use bevy::math::{DVec3, Vec3};
use constants::coordinate_system::transform_coordinates;

/// Arithmetic mean of survey points. Zero for an empty input.
pub fn compute_center<I>(points: I) -> DVec3
where
    I: IntoIterator<Item = DVec3>,
{
    let (sum, count) = points
        .into_iter()
        .fold((DVec3::ZERO, 0usize), |(sum, count), p| (sum + p, count + 1));

    if count == 0 {
        DVec3::ZERO
    } else {
        sum / count as f64
    }
}

/// Shared camera-relative frame. Survey coordinates are large (UTM metres), so
/// every layer subtracts the same centre in f64 before narrowing to f32.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneFrame {
    pub center: DVec3,
}

impl SceneFrame {
    pub fn new(center: DVec3) -> Self {
        Self { center }
    }

    /// Survey point (easting, northing, elevation) to centred, Y-up scene space.
    pub fn to_scene(&self, point: DVec3) -> Vec3 {
        let offset = point - self.center;
        let (x, y, z) = transform_coordinates(offset.x, offset.y, offset.z);
        Vec3::new(x as f32, y as f32, z as f32)
    }
}
