//! Orbit camera for scene navigation.

/// Viewport camera resource and controller system.
pub mod viewport_camera;
