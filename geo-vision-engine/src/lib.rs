//! Layered 3D presentation of a geological survey site.
//!
//! `engine::presentation` holds the step state machine and everything it
//! derives (spatial frame, drillhole grouping, colours, legends). The rest of
//! `engine` wires it into Bevy: layer discovery, asset loading, scene
//! materialisation and input. `rpc` exposes the presentation to a hosting page.

pub mod engine;
pub mod rpc;
