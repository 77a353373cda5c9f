//! Bevy side of the presentation: turns layer contents into entities.
//!
//! The presentation engine decides what is visible; everything here only
//! materialises those decisions through the `SceneSink` implementation.

/// Cylinder sets for drillhole steps, with a shared mesh and colour-keyed materials.
pub mod drillholes;

/// Bilinear sampling of elevation images.
pub mod heightmap;

/// Layer asset construction: imagery planes, the topography mesh, and material presets.
pub mod layers;

/// `SceneSink` backed by Bevy commands and asset storage.
pub mod sink;
