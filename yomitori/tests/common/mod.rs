use image::{DynamicImage, Rgba, RgbaImage};
use wiremock::{Match, Request};

/// Matches multipart bodies by substring. The built-in string matcher
/// requires the whole body to be valid UTF-8, which a body embedding raw
/// PNG bytes is not.
pub struct FormContains(pub &'static str);

impl Match for FormContains {
    fn matches(&self, request: &Request) -> bool {
        String::from_utf8_lossy(&request.body).contains(self.0)
    }
}

/// Build a deterministic page raster where each pixel encodes its own
/// coordinates, so cropped output can be traced back to source pixels.
pub fn coordinate_page(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 42, 255])
    }))
}

/// Encode a raster as PNG bytes, the on-disk form uploads arrive in.
pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    yomitori::raster::encode_png(image).expect("PNG encoding of a test raster")
}
