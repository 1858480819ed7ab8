use image::{DynamicImage, Rgba, RgbaImage};

use crate::config::FilterConfig;
use crate::error::Result;
use crate::raster::load_image;

/// Binarize an image for OCR.
///
/// Per pixel: `luma = 0.299*R + 0.587*G + 0.114*B`; the color channels all
/// become 255 when luma is strictly above `threshold`, 0 otherwise. Alpha
/// is left untouched. Pure function of the input; applying it twice yields
/// the same raster as applying it once.
///
/// # Arguments
/// * `image` - Source raster; read-only
/// * `threshold` - Luminance cutoff (exclusive)
///
/// # Returns
/// A new raster with the same dimensions as the input
pub fn binarize(image: &DynamicImage, threshold: u8) -> DynamicImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbaImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        let value = if luma > threshold as f64 { 255 } else { 0 };
        out.put_pixel(x, y, Rgba([value, value, value, a]));
    }

    DynamicImage::ImageRgba8(out)
}

/// Decode and binarize a whole page for the full-image OCR path. A decode
/// failure aborts this load only; the caller's session stays usable.
pub fn preprocess_page(bytes: &[u8], config: &FilterConfig) -> Result<DynamicImage> {
    let image = load_image(bytes)?;
    Ok(binarize(&image, config.threshold))
}
