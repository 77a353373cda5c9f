//! Presentation orchestration core.
//!
//! Everything here is renderer-agnostic: steps and colour modes, the shared
//! spatial frame, drillhole grouping, colouring, legends, and the state
//! machine that turns (step, colour mode, loaded data) into scene changes.

/// Segment colouring for lithology and assay modes.
pub mod colour_policy;

/// Drillhole records grouped by hole and ordered by depth.
pub mod drillhole_index;

/// Legend derivation for the visible drillhole layer.
pub mod legend;

/// Common origin for survey coordinates.
pub mod spatial;

/// Step/colour-mode state machine, layer diffing and the scene sink contract.
pub mod state_machine;

/// Presentation step, dataset, colour mode and layer asset tags.
pub mod step;
