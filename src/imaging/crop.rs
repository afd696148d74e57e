//! Cropping captured screenshots to the selected element.
//!
//! The host captures the visible page at device resolution. The selected
//! element's CSS-pixel rectangle is clipped to the viewport, scaled by the
//! device pixel ratio, snapped to whole pixels and cut out of the raster.

// ============================================================================
// Imports
// ============================================================================

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, imageops};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Rect, Viewport, VisibleRect};

use super::data_url::{decode_data_url_image, encode_data_url};

// ============================================================================
// ImageFormat
// ============================================================================

/// Encoding of the cropped image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format with quality (1-100).
    Jpeg(u8),
}

impl ImageFormat {
    /// Creates PNG format.
    #[inline]
    #[must_use]
    pub fn png() -> Self {
        Self::Png
    }

    /// Creates JPEG format with quality (1-100).
    #[inline]
    #[must_use]
    pub fn jpeg(quality: u8) -> Self {
        Self::Jpeg(quality.clamp(1, 100))
    }

    /// Returns the MIME type for this format.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg(_) => "image/jpeg",
        }
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes a raster in the given format.
///
/// JPEG output drops the alpha channel.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the encoder fails.
pub fn encode_image(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Png => image
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| Error::encode(e.to_string()))?,
        ImageFormat::Jpeg(quality) => {
            let rgb = image.to_rgb8();
            JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
                .encode_image(&rgb)
                .map_err(|e| Error::encode(e.to_string()))?;
        }
    }
    Ok(buf)
}

// ============================================================================
// Cropping
// ============================================================================

/// Snaps a device-pixel rectangle to whole pixels inside a raster.
///
/// Edges are rounded to the nearest pixel and clamped to the raster, which
/// may be slightly smaller than `viewport * ratio`. Returns
/// `(x, y, width, height)`, or `None` when nothing is left.
#[must_use]
pub fn pixel_region(rect: VisibleRect, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
    if rect.is_empty() {
        return None;
    }

    let snap = |v: f64, max: u32| v.round().clamp(0.0, f64::from(max)) as u32;
    let left = snap(rect.x, image_width);
    let top = snap(rect.y, image_height);
    let right = snap(rect.x + rect.width, image_width);
    let bottom = snap(rect.y + rect.height, image_height);

    let width = right.saturating_sub(left);
    let height = bottom.saturating_sub(top);
    (width > 0 && height > 0).then_some((left, top, width, height))
}

/// Crops a captured screenshot to an element's visible rectangle.
///
/// `hover` is the element's viewport-relative rectangle in CSS pixels;
/// `viewport` supplies the clip bounds and device pixel ratio. The payload
/// is always decoded first, so a malformed capture fails even when the
/// element is off-screen.
///
/// Returns the cropped image as a `data:` URI, or `None` when the visible
/// part of the element is empty.
///
/// # Errors
///
/// - [`Error::InvalidDataUrl`] / [`Error::Decode`] if the capture is malformed
/// - [`Error::Encode`] if the cropped image cannot be encoded
pub fn crop_capture(
    data_url: &str,
    hover: Rect,
    viewport: Viewport,
    format: ImageFormat,
) -> Result<Option<String>> {
    let image = decode_data_url_image(data_url)?;
    let device_rect = viewport.device_rect(hover);

    debug!(
        ?device_rect,
        image_width = image.width(),
        image_height = image.height(),
        "Cropping capture"
    );

    let Some((x, y, width, height)) = pixel_region(device_rect, image.width(), image.height())
    else {
        debug!("Selection not visible, nothing to crop");
        return Ok(None);
    };

    let cropped = DynamicImage::from(imageops::crop_imm(&image, x, y, width, height).to_image());
    let bytes = encode_image(&cropped, format)?;

    Ok(Some(encode_data_url(format.mime_type(), &bytes)))
}

// ============================================================================
// Tests
// ============================================================================
