//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, and plugin
//! initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Registers the loaders, the presentation systems and the RPC bridge, and
/// schedules them by lifecycle state.
pub mod app_setup;

/// Application lifecycle: layer discovery, then presentation.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
