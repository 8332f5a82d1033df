//! Decoding of canvas exports into multi-channel pixel arrays.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::GenericImageView;
use ndarray::Array3;
use tracing::debug;

use crate::error::{PreprocessError, PreprocessResult};

/// Decodes a canvas export such as `data:image/png;base64,iVBOR...`.
///
/// A bare base64 payload without the data-URL prefix is accepted too.
pub fn decode_data_url(payload: &str) -> PreprocessResult<Array3<u8>> {
    let encoded = if payload.contains("base64") {
        payload
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| PreprocessError::Decode("data URL has no ',' separator".to_string()))?
    } else {
        payload
    };
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| PreprocessError::Decode(format!("invalid base64: {e}")))?;
    decode_image_bytes(&bytes)
}

/// Decodes an encoded image into rows x cols x channels, keeping the
/// image's own channel count.
pub fn decode_image_bytes(bytes: &[u8]) -> PreprocessResult<Array3<u8>> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| PreprocessError::Decode(format!("unsupported image: {e}")))?;
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(PreprocessError::Decode("image has zero area".to_string()));
    }

    let channels = usize::from(img.color().channel_count());
    let raw = match channels {
        1 => img.to_luma8().into_raw(),
        2 => img.to_luma_alpha8().into_raw(),
        3 => img.to_rgb8().into_raw(),
        _ => img.to_rgba8().into_raw(),
    };
    let channels = channels.clamp(1, 4);
    debug!(width, height, channels, "decoded drawing");

    Array3::from_shape_vec((height as usize, width as usize, channels), raw)
        .map_err(|e| PreprocessError::Decode(e.to_string()))
}
