//! Upload payload normalization.
//!
//! Images are bounded in size and re-encoded as JPEG so the analysis request
//! stays small regardless of what the user picked; documents pass through.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;
use leafcheck_core::is_image_media_type;

pub const DEFAULT_MAX_DIMENSION: u32 = 1024;
pub const DEFAULT_JPEG_QUALITY: u8 = 70;
pub const NORMALIZED_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSettings {
    pub max_dimension: u32,
    pub jpeg_quality: u8,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Base64 payload ready for the analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPayload {
    pub data: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("file is empty or could not be read")]
    Read,
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("image has no drawable area ({width}x{height})")]
    Surface { width: u32, height: u32 },
    #[error("failed to encode image: {0}")]
    Encode(String),
}

pub fn normalize_payload(
    data: &[u8],
    media_type: &str,
    settings: &NormalizeSettings,
) -> Result<NormalizedPayload, NormalizeError> {
    if data.is_empty() {
        return Err(NormalizeError::Read);
    }
    if !is_image_media_type(media_type) {
        return Ok(NormalizedPayload {
            data: STANDARD.encode(data),
            mime_type: media_type.to_string(),
        });
    }

    let jpeg = recompress_image(data, settings)?;
    Ok(NormalizedPayload {
        data: STANDARD.encode(jpeg),
        mime_type: NORMALIZED_IMAGE_MEDIA_TYPE.to_string(),
    })
}

/// Target size for an image so that neither side exceeds `max`.
///
/// Only shrinks; the longer side lands exactly on `max` and the shorter side
/// is rounded, never below 1.
pub fn scaled_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let scale_side = |side: u32, long: u32| -> u32 {
        let scaled = (u64::from(side) * u64::from(max) + u64::from(long) / 2) / u64::from(long);
        (scaled as u32).max(1)
    };
    if width >= height {
        (max, scale_side(height, width))
    } else {
        (scale_side(width, height), max)
    }
}

fn recompress_image(data: &[u8], settings: &NormalizeSettings) -> Result<Vec<u8>, NormalizeError> {
    let image =
        image::load_from_memory(data).map_err(|err| NormalizeError::Decode(err.to_string()))?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(NormalizeError::Surface { width, height });
    }

    let (target_w, target_h) = scaled_dimensions(width, height, settings.max_dimension.max(1));
    let resized = if (target_w, target_h) == (width, height) {
        image
    } else {
        image.resize_exact(target_w, target_h, FilterType::Triangle)
    };

    // JPEG has no alpha channel.
    let rgb = resized.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, settings.jpeg_quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(|err| NormalizeError::Encode(err.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::scaled_dimensions;

    #[test]
    fn small_images_keep_their_size() {
        assert_eq!(scaled_dimensions(800, 600, 1024), (800, 600));
        assert_eq!(scaled_dimensions(1024, 1024, 1024), (1024, 1024));
    }

    #[test]
    fn landscape_is_bounded_by_width() {
        assert_eq!(scaled_dimensions(4000, 3000, 1024), (1024, 768));
        assert_eq!(scaled_dimensions(2048, 1000, 1024), (1024, 500));
    }

    #[test]
    fn portrait_is_bounded_by_height() {
        assert_eq!(scaled_dimensions(3000, 4000, 1024), (768, 1024));
        assert_eq!(scaled_dimensions(1000, 3001, 1024), (341, 1024));
    }

    #[test]
    fn extreme_aspect_ratio_never_collapses_to_zero() {
        assert_eq!(scaled_dimensions(10_000, 2, 1024), (1024, 1));
    }
}
