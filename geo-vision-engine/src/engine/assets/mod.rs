//! Site data definitions: drillhole records and deployment configuration.

/// Drillhole segment records and the JSON asset wrapping a collection.
pub mod drillhole;

/// Deployment configuration: resource keys and layer sizing.
///
/// Built from the `constants` crate defaults and inserted as a resource at startup.
pub mod site_config;
