/// Hue (degrees) for the lowest assay grade.
pub const ASSAY_LOW_HUE: f32 = 120.0;

/// Hue (degrees) for the highest assay grade.
pub const ASSAY_HIGH_HUE: f32 = 0.0;

pub const ASSAY_SATURATION: f32 = 0.8;
pub const ASSAY_LIGHTNESS: f32 = 0.5;

/// Colour for segments without a grade. Must never coincide with the low-grade hue.
pub const MISSING_ASSAY_RGB: [u8; 3] = [0x5c, 0x67, 0x7d];

/// Default grade range mapped onto the hue ramp (domain units).
pub const DEFAULT_GRADE_MIN: f64 = 0.0;
pub const DEFAULT_GRADE_MAX: f64 = 1.0;
