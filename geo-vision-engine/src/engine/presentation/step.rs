use serde::{Deserialize, Serialize};

/// One stage of the presentation sequence. Each step shows exactly one visual layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresentationStep {
    Satellite,
    Topography,
    GeologyMap,
    MagneticMap,
    LithologyData,
    AssayData,
    OreBody,
}

impl PresentationStep {
    /// Every step in presentation order. Deployments show a subsequence of this.
    pub const CANONICAL_ORDER: [PresentationStep; 7] = [
        Self::Satellite,
        Self::Topography,
        Self::GeologyMap,
        Self::MagneticMap,
        Self::LithologyData,
        Self::AssayData,
        Self::OreBody,
    ];

    /// Convert RPC tag to step.
    pub fn from_string(s: &str) -> Option<Self> {
        Self::CANONICAL_ORDER
            .into_iter()
            .find(|step| step.tag().eq_ignore_ascii_case(s))
    }

    /// Stable identifier for frontend communication.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Satellite => "satellite",
            Self::Topography => "topography",
            Self::GeologyMap => "geologyMap",
            Self::MagneticMap => "magneticMap",
            Self::LithologyData => "lithologyData",
            Self::AssayData => "assayData",
            Self::OreBody => "oreBody",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Satellite => "Satellite Imagery",
            Self::Topography => "Topography",
            Self::GeologyMap => "Geology Map",
            Self::MagneticMap => "Magnetic Survey",
            Self::LithologyData => "Drillhole Lithology",
            Self::AssayData => "Drillhole Assays",
            Self::OreBody => "Ore Body Model",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Satellite => "Orthorectified imagery of the survey area.",
            Self::Topography => "Surface elevation draped with site imagery.",
            Self::GeologyMap => "Mapped surface geology units.",
            Self::MagneticMap => "Total magnetic intensity from the airborne survey.",
            Self::LithologyData => "Logged drillhole intervals from the lithology dataset.",
            Self::AssayData => "Sampled drillhole intervals from the assay dataset.",
            Self::OreBody => "Modelled mineralised volume.",
        }
    }

    /// Drillhole dataset backing this step, if it is a drillhole step.
    pub fn dataset(&self) -> Option<Dataset> {
        match self {
            Self::LithologyData => Some(Dataset::Lithology),
            Self::AssayData => Some(Dataset::Assay),
            _ => None,
        }
    }

    /// Single-use layer asset backing this step, if it is not a drillhole step.
    pub fn asset_layer(&self) -> Option<AssetLayer> {
        match self {
            Self::Satellite => Some(AssetLayer::Satellite),
            Self::Topography => Some(AssetLayer::Topography),
            Self::GeologyMap => Some(AssetLayer::GeologyMap),
            Self::MagneticMap => Some(AssetLayer::MagneticMap),
            Self::OreBody => Some(AssetLayer::OreBody),
            Self::LithologyData | Self::AssayData => None,
        }
    }
}

/// Drillhole record collection. Fixed by the active step, independent of colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dataset {
    Lithology,
    Assay,
}

impl Dataset {
    pub fn step(&self) -> PresentationStep {
        match self {
            Self::Lithology => PresentationStep::LithologyData,
            Self::Assay => PresentationStep::AssayData,
        }
    }
}

/// Segment colouring policy applied while a drillhole step is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColourMode {
    #[default]
    Lithology,
    Assay,
}

impl ColourMode {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lithology" => Some(Self::Lithology),
            "assay" => Some(Self::Assay),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Lithology => "lithology",
            Self::Assay => "assay",
        }
    }
}

/// Layer assets constructed at most once and toggled across steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetLayer {
    Satellite,
    Topography,
    GeologyMap,
    MagneticMap,
    OreBody,
}

impl AssetLayer {
    pub const ALL: [AssetLayer; 5] = [
        Self::Satellite,
        Self::Topography,
        Self::GeologyMap,
        Self::MagneticMap,
        Self::OreBody,
    ];

    pub fn step(&self) -> PresentationStep {
        match self {
            Self::Satellite => PresentationStep::Satellite,
            Self::Topography => PresentationStep::Topography,
            Self::GeologyMap => PresentationStep::GeologyMap,
            Self::MagneticMap => PresentationStep::MagneticMap,
            Self::OreBody => PresentationStep::OreBody,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_string() {
        for step in PresentationStep::CANONICAL_ORDER {
            assert_eq!(PresentationStep::from_string(step.tag()), Some(step));
        }
        assert_eq!(PresentationStep::from_string("cross-section"), None);
    }

    #[test]
    fn test_each_step_has_exactly_one_backing_source() {
        for step in PresentationStep::CANONICAL_ORDER {
            assert_ne!(step.dataset().is_some(), step.asset_layer().is_some());
        }
    }

    #[test]
    fn test_serde_uses_camel_case_tags() {
        let json = serde_json::to_string(&PresentationStep::GeologyMap).unwrap();
        assert_eq!(json, "\"geologyMap\"");
        let mode: ColourMode = serde_json::from_str("\"assay\"").unwrap();
        assert_eq!(mode, ColourMode::Assay);
    }
}
