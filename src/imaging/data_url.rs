//! `data:` URI codec (RFC 2397).

// ============================================================================
// Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use image::DynamicImage;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

const DATA_URL_PREFIX: &str = "data:";
const DEFAULT_MEDIA_TYPE: &str = "text/plain";

// ============================================================================
// DataUrl
// ============================================================================

/// A decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Media type without parameters, lowercased.
    pub media_type: String,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

/// Decodes a `data:` URI into its media type and payload.
///
/// # Errors
///
/// Returns [`Error::InvalidDataUrl`] if the prefix or comma is missing or
/// the payload is not valid base64 / percent-encoding.
pub fn decode_data_url(url: &str) -> Result<DataUrl> {
    let rest = url
        .get(..DATA_URL_PREFIX.len())
        .filter(|p| p.eq_ignore_ascii_case(DATA_URL_PREFIX))
        .map(|_| &url[DATA_URL_PREFIX.len()..])
        .ok_or_else(|| Error::invalid_data_url("URL does not start with 'data:'"))?;

    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::invalid_data_url("missing comma in data URL"))?;

    let mut params = metadata.split(';');
    let media_type = params
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MEDIA_TYPE)
        .to_ascii_lowercase();
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        decode_base64(payload)?
    } else {
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };

    Ok(DataUrl { media_type, bytes })
}

/// Decodes base64, tolerating ASCII whitespace.
fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    Base64Standard
        .decode(cleaned)
        .map_err(|e| Error::invalid_data_url(format!("invalid base64: {e}")))
}

/// Decodes a `data:` URI straight into a raster.
///
/// # Errors
///
/// - [`Error::InvalidDataUrl`] if the URI is malformed
/// - [`Error::Decode`] if the payload is not a supported image
pub fn decode_data_url_image(url: &str) -> Result<DynamicImage> {
    let data = decode_data_url(url)?;
    Ok(image::load_from_memory(&data.bytes)?)
}

/// Encodes bytes as a base64 `data:` URI.
#[must_use]
pub fn encode_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "{DATA_URL_PREFIX}{media_type};base64,{}",
        Base64Standard.encode(bytes)
    )
}

// ============================================================================
// Tests
// ============================================================================
