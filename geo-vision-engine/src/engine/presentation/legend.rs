use std::collections::BTreeSet;

use bevy::prelude::*;
use constants::lithology::{LITHOLOGY_MAP, find_lithology};

use crate::engine::assets::drillhole::DrillholeSegment;
use crate::engine::presentation::colour_policy::{
    ColourPolicy, lithology_colour, missing_assay_colour, ramp_colour, unknown_lithology_colour,
};
use crate::engine::presentation::step::ColourMode;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub colour: Color,
}

impl LegendEntry {
    fn new(label: impl Into<String>, colour: Color) -> Self {
        Self {
            label: label.into(),
            colour,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "label": self.label,
            "colour": self.colour.to_srgba().to_hex(),
        })
    }
}

/// Key for the visible drillhole layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Legend {
    /// Rock types present in the rendered segments, in palette order.
    Categorical { entries: Vec<LegendEntry> },
    /// Grade ramp endpoints, plus the no-data colour when any grade is missing.
    Gradient {
        low: LegendEntry,
        high: LegendEntry,
        missing: Option<LegendEntry>,
    },
}

impl Legend {
    /// Derive the legend for rendered segments. `None` when nothing is rendered.
    pub fn derive<'a, I>(segments: I, mode: ColourMode, policy: &ColourPolicy) -> Option<Self>
    where
        I: IntoIterator<Item = &'a DrillholeSegment>,
    {
        let mut segments = segments.into_iter().peekable();
        segments.peek()?;

        match mode {
            ColourMode::Lithology => Some(categorical(segments)),
            ColourMode::Assay => Some(gradient(segments, policy)),
        }
    }

    /// Every entry in display order.
    pub fn entries(&self) -> Vec<&LegendEntry> {
        match self {
            Self::Categorical { entries } => entries.iter().collect(),
            Self::Gradient { low, high, missing } => {
                let mut out = vec![high, low];
                out.extend(missing.iter());
                out
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Categorical { entries } => serde_json::json!({
                "kind": "categorical",
                "entries": entries.iter().map(LegendEntry::to_json).collect::<Vec<_>>(),
            }),
            Self::Gradient { low, high, missing } => serde_json::json!({
                "kind": "gradient",
                "low": low.to_json(),
                "high": high.to_json(),
                "missing": missing.as_ref().map(LegendEntry::to_json),
            }),
        }
    }
}

fn categorical<'a>(segments: impl Iterator<Item = &'a DrillholeSegment>) -> Legend {
    let mut present = BTreeSet::new();
    let mut has_unknown = false;

    for segment in segments {
        let slot = segment.lithology.as_deref().and_then(find_lithology).and_then(|info| {
            LITHOLOGY_MAP.iter().position(|entry| entry.code == info.code)
        });
        match slot {
            Some(slot) => {
                present.insert(slot);
            }
            None => has_unknown = true,
        }
    }

    let mut entries: Vec<LegendEntry> = present
        .into_iter()
        .map(|slot| {
            let info = &LITHOLOGY_MAP[slot];
            LegendEntry::new(
                format!("{} ({})", capitalise(info.name), info.code),
                lithology_colour(Some(info.code)),
            )
        })
        .collect();

    if has_unknown {
        entries.push(LegendEntry::new("Unknown", unknown_lithology_colour()));
    }

    Legend::Categorical { entries }
}

fn gradient<'a>(
    mut segments: impl Iterator<Item = &'a DrillholeSegment>,
    policy: &ColourPolicy,
) -> Legend {
    let scale = policy.grade_scale;
    let any_missing = segments.any(|s| s.grade.is_none_or(f64::is_nan));

    Legend::Gradient {
        low: LegendEntry::new(format!("≤ {:.2}", scale.min), ramp_colour(0.0)),
        high: LegendEntry::new(format!("≥ {:.2}", scale.max), ramp_colour(1.0)),
        missing: any_missing.then(|| LegendEntry::new("No assay", missing_assay_colour())),
    }
}

fn capitalise(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
