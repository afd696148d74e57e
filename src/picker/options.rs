//! Picker configuration.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use webclip_picker::{ImageFormat, PickerOptions};
//!
//! let options = PickerOptions::new()
//!     .with_capture_delay(Duration::from_millis(80))
//!     .with_output_format(ImageFormat::jpeg(85));
//!
//! assert_eq!(options.capture_delay, Duration::from_millis(80));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::imaging::ImageFormat;

// ============================================================================
// Constants
// ============================================================================

/// Default wait between confirmation and `takeScreenshot`.
///
/// Gives the overlay time to leave the rendered page before the host
/// captures it.
pub const DEFAULT_CAPTURE_DELAY: Duration = Duration::from_millis(50);

// ============================================================================
// PickerOptions
// ============================================================================

/// Picker configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerOptions {
    /// Wait between disabling the overlay and requesting the capture.
    ///
    /// Zero sends the request synchronously.
    pub capture_delay: Duration,

    /// Encoding of the cropped image.
    pub output_format: ImageFormat,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl PickerOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            capture_delay: DEFAULT_CAPTURE_DELAY,
            output_format: ImageFormat::Png,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl PickerOptions {
    /// Sets the capture delay.
    #[inline]
    #[must_use]
    pub fn with_capture_delay(mut self, delay: Duration) -> Self {
        self.capture_delay = delay;
        self
    }

    /// Sets the output format.
    #[inline]
    #[must_use]
    pub fn with_output_format(mut self, format: ImageFormat) -> Self {
        self.output_format = match format {
            ImageFormat::Jpeg(quality) => ImageFormat::jpeg(quality),
            ImageFormat::Png => ImageFormat::Png,
        };
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
