//! Viewport geometry.
//!
//! Clips an element's viewport-relative rectangle to the visible area and
//! rescales it to device pixels so it can address a raster captured at
//! device resolution.
//!
//! # Example
//!
//! ```
//! use webclip_picker::geometry::{Rect, Viewport};
//!
//! let viewport = Viewport::new(1000.0, 800.0).with_device_pixel_ratio(2.0);
//! let device = viewport.device_rect(Rect::new(-20.0, 10.0, 100.0, 50.0));
//!
//! assert_eq!(device.x, 0.0);
//! assert_eq!(device.y, 20.0);
//! assert_eq!(device.width, 160.0);
//! assert_eq!(device.height, 100.0);
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// Point
// ============================================================================

/// A position in viewport coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the viewport's left edge.
    pub x: f64,
    /// Vertical offset from the viewport's top edge.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// Rect
// ============================================================================

/// An axis-aligned rectangle in CSS pixels. May extend past the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` if the point lies inside the rectangle.
    ///
    /// Left and top edges are inclusive, right and bottom exclusive.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

// ============================================================================
// VisibleRect
// ============================================================================

/// The part of a [`Rect`] that is inside the viewport.
///
/// `width` and `height` are never negative. A rectangle entirely outside
/// the viewport clips to zero area, which callers treat as nothing to crop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisibleRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, `>= 0`.
    pub width: f64,
    /// Height, `>= 0`.
    pub height: f64,
}

impl VisibleRect {
    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Multiplies every field by the device pixel ratio.
    ///
    /// A ratio of exactly 1 returns the rectangle untouched.
    #[must_use]
    pub fn scale_to_device(self, device_pixel_ratio: f64) -> Self {
        if device_pixel_ratio == 1.0 {
            return self;
        }
        Self {
            x: self.x * device_pixel_ratio,
            y: self.y * device_pixel_ratio,
            width: self.width * device_pixel_ratio,
            height: self.height * device_pixel_ratio,
        }
    }
}

// ============================================================================
// Viewport
// ============================================================================

/// Visible area of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
    /// Physical pixels per CSS pixel.
    pub device_pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Viewport {
    /// Creates a viewport with a device pixel ratio of 1.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Sets the device pixel ratio.
    #[inline]
    #[must_use]
    pub const fn with_device_pixel_ratio(mut self, device_pixel_ratio: f64) -> Self {
        self.device_pixel_ratio = device_pixel_ratio;
        self
    }

    /// Clips `rect` to this viewport and scales it to device pixels.
    #[must_use]
    pub fn device_rect(&self, rect: Rect) -> VisibleRect {
        clip_to_viewport(rect, self.width, self.height).scale_to_device(self.device_pixel_ratio)
    }
}

// ============================================================================
// Clipping
// ============================================================================

/// Clips `rect` to `[0, viewport_width] x [0, viewport_height]`.
///
/// Anything left of or above the viewport is cut away, not shifted. No
/// rounding is performed.
#[must_use]
pub fn clip_to_viewport(rect: Rect, viewport_width: f64, viewport_height: f64) -> VisibleRect {
    let (x, width) = clip_axis(rect.x, rect.width, viewport_width);
    let (y, height) = clip_axis(rect.y, rect.height, viewport_height);
    VisibleRect {
        x,
        y,
        width,
        height,
    }
}

/// Clips one axis. Returns the new `(start, length)`.
fn clip_axis(mut start: f64, mut length: f64, extent: f64) -> (f64, f64) {
    if start < 0.0 {
        length += start;
        start = 0.0;
    }
    if start > extent {
        start = extent;
    }
    if start + length > extent {
        length = extent - start;
    }
    (start, length.max(0.0))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    const VW: f64 = 1000.0;
    const VH: f64 = 800.0;

    #[test]
    fn test_clip_left_overflow() {
        let clipped = clip_to_viewport(Rect::new(-20.0, 10.0, 100.0, 50.0), VW, VH);
        assert_eq!(
            clipped,
            VisibleRect {
                x: 0.0,
                y: 10.0,
                width: 80.0,
                height: 50.0
            }
        );
    }

    #[test]
    fn test_clip_bottom_right_overflow() {
        let clipped = clip_to_viewport(Rect::new(950.0, 780.0, 100.0, 100.0), VW, VH);
        assert_eq!(clipped.x, 950.0);
        assert_eq!(clipped.y, 780.0);
        assert_eq!(clipped.width, 50.0);
        assert_eq!(clipped.height, 20.0);
    }

    #[test]
    fn test_clip_larger_than_viewport() {
        let clipped = clip_to_viewport(Rect::new(-10.0, -10.0, 2000.0, 2000.0), VW, VH);
        assert_eq!(
            clipped,
            VisibleRect {
                x: 0.0,
                y: 0.0,
                width: VW,
                height: VH
            }
        );
    }

    #[test]
    fn test_scale_to_device() {
        let clipped = VisibleRect {
            x: 0.0,
            y: 10.0,
            width: 80.0,
            height: 50.0,
        };
        assert_eq!(
            clipped.scale_to_device(2.0),
            VisibleRect {
                x: 0.0,
                y: 20.0,
                width: 160.0,
                height: 100.0
            }
        );
    }

    #[test]
    fn test_scale_ratio_one_is_untouched() {
        let clipped = VisibleRect {
            x: 0.1,
            y: 0.2,
            width: 0.3,
            height: 0.7,
        };
        assert_eq!(clipped.scale_to_device(1.0), clipped);
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(19.9, 19.9)));
        assert!(!rect.contains(Point::new(20.0, 15.0)));
    }

    proptest! {
        #[test]
        fn prop_inside_viewport_is_identity(
            x in 0.0..500.0f64,
            y in 0.0..400.0f64,
            w in 0.0..500.0f64,
            h in 0.0..400.0f64,
        ) {
            let clipped = clip_to_viewport(Rect::new(x, y, w, h), VW, VH);
            prop_assert_eq!(clipped, VisibleRect { x, y, width: w, height: h });
        }

        #[test]
        fn prop_outside_viewport_is_empty(
            offset in 1.0..5000.0f64,
            w in 0.0..900.0f64,
            h in 0.0..700.0f64,
            along in 0.0..700.0f64,
            side in 0u8..4,
        ) {
            let rect = match side {
                0 => Rect::new(-(w + offset), along, w, h),
                1 => Rect::new(along, -(h + offset), w, h),
                2 => Rect::new(VW + offset, along, w, h),
                _ => Rect::new(along, VH + offset, w, h),
            };
            let clipped = clip_to_viewport(rect, VW, VH);
            prop_assert!(clipped.width == 0.0 || clipped.height == 0.0);
            prop_assert!(clipped.is_empty());
        }

        #[test]
        fn prop_clipped_stays_in_bounds(
            x in -3000.0..3000.0f64,
            y in -3000.0..3000.0f64,
            w in 0.0..3000.0f64,
            h in 0.0..3000.0f64,
        ) {
            let clipped = clip_to_viewport(Rect::new(x, y, w, h), VW, VH);
            prop_assert!(clipped.width >= 0.0 && clipped.height >= 0.0);
            prop_assert!(clipped.x >= 0.0 && clipped.x + clipped.width <= VW + 1e-9);
            prop_assert!(clipped.y >= 0.0 && clipped.y + clipped.height <= VH + 1e-9);
        }
    }
}
