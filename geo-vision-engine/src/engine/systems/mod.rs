//! Runtime systems driving the presentation.
//!
//! Keyboard and RPC commands become engine transitions here, and the native
//! overlay mirrors the active step.

/// Presentation commands, state notifications and shutdown teardown.
///
/// Keyboard shortcuts are native-only; the web frontend drives the same
/// commands over RPC.
pub mod navigation;

/// Native step title, description and legend overlay.
pub mod overlay;
