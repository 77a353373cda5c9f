use bevy::math::DVec3;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One logged depth interval of a drillhole. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillholeSegment {
    #[serde(alias = "hole_id")]
    pub hole_id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(alias = "depth_from")]
    pub depth_from: f64,
    #[serde(alias = "depth_to")]
    pub depth_to: f64,
    #[serde(default)]
    pub lithology: Option<String>,
    #[serde(default)]
    pub grade: Option<f64>,
}

impl DrillholeSegment {
    pub fn length(&self) -> f64 {
        self.depth_to - self.depth_from
    }

    /// Zero and negative spans are kept in storage but never rendered.
    pub fn has_positive_length(&self) -> bool {
        self.length() > 0.0
    }

    /// Collar-relative reference point in survey coordinates.
    pub fn reference_point(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

/// A drillhole record collection as a Bevy asset. The JSON payload is a bare array.
#[derive(Asset, TypePath, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrillholeDataset {
    pub segments: Vec<DrillholeSegment>,
}
