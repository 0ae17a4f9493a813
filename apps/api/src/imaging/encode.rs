//! PNG encoding and data-URI packaging.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::imaging::RenderError;

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(buf)
}

pub fn to_data_uri(png: &[u8]) -> String {
    format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png))
}

/// Reverse of [`to_data_uri`]; returns `None` for anything that isn't a PNG data URI.
#[cfg(test)]
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let payload = uri.strip_prefix(PNG_DATA_URI_PREFIX)?;
    STANDARD.decode(payload).ok()
}
