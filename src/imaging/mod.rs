//! Raster handling for captured screenshots.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `data_url` | `data:` URI decoding and encoding |
//! | `crop` | Output formats and the viewport-clipped crop |

// ============================================================================
// Submodules
// ============================================================================

/// Cropping captured screenshots.
pub mod crop;

/// `data:` URI codec.
pub mod data_url;

// ============================================================================
// Re-exports
// ============================================================================

pub use crop::{ImageFormat, crop_capture, encode_image, pixel_region};
pub use data_url::{DataUrl, decode_data_url, decode_data_url_image, encode_data_url};
