use bevy::prelude::*;
use constants::assay::{DEFAULT_GRADE_MAX, DEFAULT_GRADE_MIN};
use constants::path::{
    ASSAY_RECORDS_FILE, ASSET_ROOT, GEOLOGY_MAP_FILE, LITHOLOGY_RECORDS_FILE, MAGNETIC_MAP_FILE,
    ORE_BODY_FILE, RELATIVE_SITE_PATH, SATELLITE_FILE, TOPOGRAPHY_FILE,
};
use constants::render_settings::{
    DISPLACEMENT_SCALE, DRILLHOLE_RADIUS, PLANE_SIZE, TOPOGRAPHY_SUBDIVISIONS,
};
use serde::{Deserialize, Serialize};

use crate::engine::presentation::colour_policy::{ColourPolicy, GradeScale};
use crate::engine::presentation::state_machine::DrillholeStyle;
use crate::engine::presentation::step::{AssetLayer, Dataset, PresentationStep};

/// Resource keys for every layer, relative to the site folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerFiles {
    pub satellite: String,
    pub topography: String,
    pub geology_map: String,
    pub magnetic_map: String,
    pub lithology_records: String,
    pub assay_records: String,
    pub ore_body: String,
}

impl Default for LayerFiles {
    fn default() -> Self {
        Self {
            satellite: SATELLITE_FILE.to_string(),
            topography: TOPOGRAPHY_FILE.to_string(),
            geology_map: GEOLOGY_MAP_FILE.to_string(),
            magnetic_map: MAGNETIC_MAP_FILE.to_string(),
            lithology_records: LITHOLOGY_RECORDS_FILE.to_string(),
            assay_records: ASSAY_RECORDS_FILE.to_string(),
            ore_body: ORE_BODY_FILE.to_string(),
        }
    }
}

/// Deployment configuration: where resources live and how layers are sized.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root the native probe resolves resource keys against.
    pub asset_root: String,
    pub site_path: String,
    pub files: LayerFiles,
    pub plane_size: f32,
    pub topography_subdivisions: u32,
    pub displacement_scale: f32,
    pub drillhole_radius: f32,
    pub grade_scale: GradeScale,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            asset_root: ASSET_ROOT.to_string(),
            site_path: RELATIVE_SITE_PATH.to_string(),
            files: LayerFiles::default(),
            plane_size: PLANE_SIZE,
            topography_subdivisions: TOPOGRAPHY_SUBDIVISIONS,
            displacement_scale: DISPLACEMENT_SCALE,
            drillhole_radius: DRILLHOLE_RADIUS,
            grade_scale: GradeScale::new(DEFAULT_GRADE_MIN, DEFAULT_GRADE_MAX),
        }
    }
}

impl SiteConfig {
    fn site_file(&self, file: &str) -> String {
        format!("{}/{}", self.site_path, file)
    }

    /// Asset-server path of a layer asset.
    pub fn asset_path(&self, layer: AssetLayer) -> String {
        let file = match layer {
            AssetLayer::Satellite => &self.files.satellite,
            AssetLayer::Topography => &self.files.topography,
            AssetLayer::GeologyMap => &self.files.geology_map,
            AssetLayer::MagneticMap => &self.files.magnetic_map,
            AssetLayer::OreBody => &self.files.ore_body,
        };
        self.site_file(file)
    }

    /// Asset-server path of a drillhole record collection.
    pub fn dataset_path(&self, dataset: Dataset) -> String {
        let file = match dataset {
            Dataset::Lithology => &self.files.lithology_records,
            Dataset::Assay => &self.files.assay_records,
        };
        self.site_file(file)
    }

    pub fn drillhole_style(&self) -> DrillholeStyle {
        DrillholeStyle {
            radius: self.drillhole_radius,
            policy: ColourPolicy::new(self.grade_scale),
        }
    }

    /// Resources that must exist for a step to be offered.
    /// Both drillhole steps require both record collections.
    pub fn resources_for(&self, step: PresentationStep) -> Vec<String> {
        match step.asset_layer() {
            Some(layer) => vec![self.asset_path(layer)],
            None => vec![
                self.dataset_path(Dataset::Lithology),
                self.dataset_path(Dataset::Assay),
            ],
        }
    }
}
