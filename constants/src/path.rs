/// Asset root used by the native filesystem probe (matches Bevy's default asset folder).
pub const ASSET_ROOT: &str = "assets";

/// Site folder relative to the asset root. Every layer resource lives under it.
pub const RELATIVE_SITE_PATH: &str = "site";

pub const SATELLITE_FILE: &str = "satellite.png";
pub const TOPOGRAPHY_FILE: &str = "topography.png";
pub const GEOLOGY_MAP_FILE: &str = "geology_map.png";
pub const MAGNETIC_MAP_FILE: &str = "magnetic_map.png";
pub const LITHOLOGY_RECORDS_FILE: &str = "lithology.holes.json";
pub const ASSAY_RECORDS_FILE: &str = "assay.holes.json";
pub const ORE_BODY_FILE: &str = "ore_body.glb";

/// Extension registered for drillhole record collections.
pub const DRILLHOLE_RECORDS_EXTENSION: &str = "holes.json";
