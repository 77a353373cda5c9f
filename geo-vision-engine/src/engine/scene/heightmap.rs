use bevy::image::TextureAccessError;
use bevy::prelude::*;

/// Sample image intensity at normalised coordinates with bilinear interpolation.
///
/// Intensity is the sRGB red channel in [0, 1]. Coordinates outside [0, 1]
/// are clamped to the image edge.
pub fn sample_intensity(image: &Image, u: f32, v: f32) -> Result<f32, TextureAccessError> {
    let width = image.width().max(1);
    let height = image.height().max(1);

    // Continuous pixel space
    let pixel_x = u.clamp(0.0, 1.0) * (width - 1) as f32;
    let pixel_y = v.clamp(0.0, 1.0) * (height - 1) as f32;

    let x0 = pixel_x.floor() as u32;
    let y0 = pixel_y.floor() as u32;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let wx = pixel_x - x0 as f32;
    let wy = pixel_y - y0 as f32;

    let h00 = intensity_at(image, x0, y0)?;
    let h10 = intensity_at(image, x1, y0)?;
    let h01 = intensity_at(image, x0, y1)?;
    let h11 = intensity_at(image, x1, y1)?;

    let top = h00 * (1.0 - wx) + h10 * wx;
    let bottom = h01 * (1.0 - wx) + h11 * wx;
    Ok(top * (1.0 - wy) + bottom * wy)
}

fn intensity_at(image: &Image, x: u32, y: u32) -> Result<f32, TextureAccessError> {
    Ok(image.get_color_at(x, y)?.to_srgba().red)
}
