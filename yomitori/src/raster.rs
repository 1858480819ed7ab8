use base64::{engine::general_purpose::STANDARD, Engine};
use image::{imageops, DynamicImage, GenericImageView, ImageFormat, ImageReader, RgbaImage};

use crate::error::{Result, YomitoriError};
use crate::geometry::SelectionRect;

/// An independently-owned raster holding exactly the selected pixels.
///
/// Created once per submission and consumed by `into_png_bytes`, so the
/// buffer cannot outlive its encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedRegion {
    image: RgbaImage,
}

impl CroppedRegion {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode the region as PNG, releasing the pixel buffer.
    pub fn into_png_bytes(self) -> Result<Vec<u8>> {
        encode_png(&DynamicImage::ImageRgba8(self.image))
    }
}

/// Decode image bytes, sniffing the container format.
pub fn load_image(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| YomitoriError::Decode(format!("Failed to read image: {e}")))?;

    reader
        .decode()
        .map_err(|e| YomitoriError::Decode(format!("Failed to decode image: {e}")))
}

/// Produce a new raster containing exactly the selected region.
///
/// The sampled box is the rectangle spanned by the anchor and the drag
/// endpoint, regardless of drag direction. The output is always
/// `(|width|, |height|)` pixels: a direct copy when the sampled box already
/// has those dimensions, a Lanczos3 resize otherwise (which also covers
/// selections overhanging the source, where the sampled box is clamped to
/// the image bounds).
pub fn crop_region(source: &DynamicImage, rect: &SelectionRect) -> Result<CroppedRegion> {
    let (left, top, width, height) = rect.normalized();
    let out_width = width.round() as u32;
    let out_height = height.round() as u32;
    if out_width == 0 || out_height == 0 {
        return Err(YomitoriError::EmptySelection);
    }

    let (src_width, src_height) = source.dimensions();
    let x0 = left.clamp(0.0, src_width as f32).round() as u32;
    let y0 = top.clamp(0.0, src_height as f32).round() as u32;
    let x1 = (left + width).clamp(0.0, src_width as f32).round() as u32;
    let y1 = (top + height).clamp(0.0, src_height as f32).round() as u32;
    if x1 <= x0 || y1 <= y0 {
        // The selection lies entirely outside the image.
        return Err(YomitoriError::EmptySelection);
    }
    let sampled_width = x1 - x0;
    let sampled_height = y1 - y0;

    let rgba = source.to_rgba8();
    let sampled = imageops::crop_imm(&rgba, x0, y0, sampled_width, sampled_height).to_image();

    let image = if sampled_width == out_width && sampled_height == out_height {
        sampled
    } else {
        imageops::resize(&sampled, out_width, out_height, imageops::FilterType::Lanczos3)
    };

    Ok(CroppedRegion { image })
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| YomitoriError::Encode(format!("Failed to encode image: {e}")))?;
    Ok(bytes)
}

/// Encode an image as a `data:image/png;base64,` URL, the locator form the
/// whole-page backend accepts alongside plain URLs.
pub fn to_data_url(image: &DynamicImage) -> Result<String> {
    let png = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}
