use bevy::math::Vec3;

/// Edge length of the imagery planes and the topography mesh (scene units).
pub const PLANE_SIZE: f32 = 1000.0;

/// Quads per side of the topography mesh.
pub const TOPOGRAPHY_SUBDIVISIONS: u32 = 250;

/// Elevation at full heightmap intensity.
pub const DISPLACEMENT_SCALE: f32 = 400.0;

pub const DRILLHOLE_RADIUS: f32 = 5.0;

pub const CAMERA_START: Vec3 = Vec3::new(0.0, 400.0, 500.0);

pub const BACKGROUND_RGB: [u8; 3] = [0xf0, 0xf4, 0xf5];

pub const AMBIENT_BRIGHTNESS: f32 = 700.0;
pub const DIRECTIONAL_ILLUMINANCE: f32 = 12_000.0;
