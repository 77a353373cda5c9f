//! Discovery and loading of site data.
//!
//! The catalog probes which optional layers a deployment ships and builds the
//! step sequence. Layer assets and drillhole records then load in the
//! background and are handed to the presentation engine as they resolve.

/// Layer discovery and step-sequence construction.
///
/// Runs the probes on the IO task pool and starts the presentation when done.
pub mod catalog;

/// Drillhole record collections, loaded as a pair.
pub mod drillhole_loader;

/// Imagery, topography, and ore-body asset requests and construction.
pub mod layer_loader;

/// Resource existence checks: filesystem on native, HTTP `HEAD` on the web.
pub mod probe;

/// Load bookkeeping and failure reporting.
pub mod progress;
