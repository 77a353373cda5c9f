use bevy::prelude::*;
use constants::assay::{
    ASSAY_HIGH_HUE, ASSAY_LIGHTNESS, ASSAY_LOW_HUE, ASSAY_SATURATION, DEFAULT_GRADE_MAX,
    DEFAULT_GRADE_MIN, MISSING_ASSAY_RGB,
};
use constants::lithology::{UNKNOWN_LITHOLOGY_RGB, find_lithology};
use serde::{Deserialize, Serialize};

use crate::engine::assets::drillhole::DrillholeSegment;
use crate::engine::presentation::step::ColourMode;

/// Grade range mapped onto the low..high hue ramp, in domain units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeScale {
    pub min: f64,
    pub max: f64,
}

impl GradeScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Position of a grade on the ramp, saturated to [0, 1].
    pub fn normalise(&self, grade: f64) -> f64 {
        let span = self.max - self.min;
        if !(span > 0.0) || !span.is_finite() {
            return if grade >= self.max { 1.0 } else { 0.0 };
        }
        ((grade - self.min) / span).clamp(0.0, 1.0)
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::new(DEFAULT_GRADE_MIN, DEFAULT_GRADE_MAX)
    }
}

/// Total mapping from (segment, mode) to a display colour.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColourPolicy {
    pub grade_scale: GradeScale,
}

impl ColourPolicy {
    pub fn new(grade_scale: GradeScale) -> Self {
        Self { grade_scale }
    }

    pub fn colour_for(&self, segment: &DrillholeSegment, mode: ColourMode) -> Color {
        match mode {
            ColourMode::Lithology => lithology_colour(segment.lithology.as_deref()),
            ColourMode::Assay => self.assay_colour(segment.grade),
        }
    }

    /// Hue ramp colour for a grade. Absent or NaN grades get the neutral colour.
    pub fn assay_colour(&self, grade: Option<f64>) -> Color {
        match grade.filter(|g| !g.is_nan()) {
            Some(grade) => ramp_colour(self.grade_scale.normalise(grade) as f32),
            None => missing_assay_colour(),
        }
    }
}

pub fn lithology_colour(lithology: Option<&str>) -> Color {
    let [r, g, b] = lithology
        .and_then(find_lithology)
        .map_or(UNKNOWN_LITHOLOGY_RGB, |info| info.rgb);
    Color::srgb_u8(r, g, b)
}

/// Colour at position `t` in [0, 1] along the low..high hue ramp.
pub fn ramp_colour(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let hue = ASSAY_LOW_HUE + (ASSAY_HIGH_HUE - ASSAY_LOW_HUE) * t;
    Color::hsl(hue, ASSAY_SATURATION, ASSAY_LIGHTNESS)
}

pub fn missing_assay_colour() -> Color {
    let [r, g, b] = MISSING_ASSAY_RGB;
    Color::srgb_u8(r, g, b)
}

pub fn unknown_lithology_colour() -> Color {
    let [r, g, b] = UNKNOWN_LITHOLOGY_RGB;
    Color::srgb_u8(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::lithology::LITHOLOGY_MAP;

    fn segment(lithology: Option<&str>, grade: Option<f64>) -> DrillholeSegment {
        DrillholeSegment {
            hole_id: "DH-01".to_string(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            depth_from: 0.0,
            depth_to: 1.0,
            lithology: lithology.map(str::to_string),
            grade,
        }
    }

    #[test]
    fn test_basalt_uses_palette_colour() {
        let basalt = LITHOLOGY_MAP.iter().find(|i| i.name == "basalt").unwrap();
        let [r, g, b] = basalt.rgb;
        let colour = ColourPolicy::default().colour_for(&segment(Some("BASALT"), None), ColourMode::Lithology);
        assert_eq!(colour, Color::srgb_u8(r, g, b));
    }

    #[test]
    fn test_unmapped_and_absent_lithology_share_unknown() {
        let policy = ColourPolicy::default();
        let unknown = unknown_lithology_colour();
        assert_eq!(policy.colour_for(&segment(Some("kimberlite"), None), ColourMode::Lithology), unknown);
        assert_eq!(policy.colour_for(&segment(None, Some(0.3)), ColourMode::Lithology), unknown);
    }

    #[test]
    fn test_out_of_range_grades_saturate() {
        let policy = ColourPolicy::default();
        let low = policy.colour_for(&segment(None, Some(0.0)), ColourMode::Assay);
        let high = policy.colour_for(&segment(None, Some(1.0)), ColourMode::Assay);

        assert_eq!(policy.colour_for(&segment(None, Some(-5.0)), ColourMode::Assay), low);
        assert_eq!(policy.colour_for(&segment(None, Some(5.0)), ColourMode::Assay), high);
        assert_ne!(low, high);
    }

    #[test]
    fn test_missing_grade_is_not_low_grade() {
        let policy = ColourPolicy::default();
        let missing = policy.colour_for(&segment(Some("granite"), None), ColourMode::Assay);
        let nan = policy.colour_for(&segment(None, Some(f64::NAN)), ColourMode::Assay);

        assert_eq!(missing, missing_assay_colour());
        assert_eq!(nan, missing);
        assert_ne!(missing, ramp_colour(0.0));
    }

    #[test]
    fn test_colouring_is_deterministic() {
        let policy = ColourPolicy::default();
        let s = segment(Some("schist"), Some(0.37));
        for mode in [ColourMode::Lithology, ColourMode::Assay] {
            assert_eq!(policy.colour_for(&s, mode), policy.colour_for(&s, mode));
        }
    }

    #[test]
    fn test_ramp_runs_from_low_hue_to_high_hue() {
        let Color::Hsla(low) = ramp_colour(0.0) else {
            panic!("ramp colours are HSL");
        };
        let Color::Hsla(high) = ramp_colour(1.0) else {
            panic!("ramp colours are HSL");
        };
        assert_eq!(low.hue, ASSAY_LOW_HUE);
        assert_eq!(high.hue, ASSAY_HIGH_HUE);
    }

    #[test]
    fn test_grade_scale_normalises_domain_units() {
        let scale = GradeScale::new(0.5, 2.5);
        assert_eq!(scale.normalise(1.5), 0.5);
        assert_eq!(scale.normalise(-1.0), 0.0);
        assert_eq!(scale.normalise(9.0), 1.0);

        let flat = GradeScale::new(1.0, 1.0);
        assert_eq!(flat.normalise(0.5), 0.0);
        assert_eq!(flat.normalise(1.0), 1.0);
    }
}
