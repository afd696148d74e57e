//! The overlay collaborator.
//!
//! The overlay draws the highlight box and info tooltip on top of the page.
//! Rendering lives outside this crate; the picker only drives the state
//! described by [`Overlay`].

// ============================================================================
// Imports
// ============================================================================

use crate::geometry::Rect;
use crate::identifiers::ElementId;

use super::HoverInfo;

// ============================================================================
// Cursor
// ============================================================================

/// Cursor shown over the highlight box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    /// Normal pick.
    #[default]
    Crosshair,
    /// Pick and continue (continue-picking modifier held).
    Copy,
}

impl Cursor {
    /// Returns the cursor for the modifier state.
    #[inline]
    #[must_use]
    pub fn for_modifier(continue_held: bool) -> Self {
        if continue_held { Self::Copy } else { Self::Crosshair }
    }

    /// Returns the CSS `cursor` value.
    #[must_use]
    pub fn css_value(self) -> &'static str {
        match self {
            Self::Crosshair => "crosshair",
            Self::Copy => "copy",
        }
    }
}

// ============================================================================
// Overlay
// ============================================================================

/// State the picker reads from and writes to the overlay.
pub trait Overlay {
    /// Shows or hides the overlay.
    fn set_enabled(&mut self, enabled: bool);

    /// Returns the currently highlighted element and its rectangle.
    fn hover_info(&self) -> Option<HoverInfo>;

    /// Returns the cursor currently applied to the highlight box.
    fn cursor(&self) -> Cursor;

    /// Applies a cursor to the highlight box.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Returns the element that hosts the overlay in the page.
    ///
    /// It and everything inside it are invisible to hit testing and
    /// ancestry walks.
    fn boundary(&self) -> ElementId;

    /// Highlights `element`, bypassing pointer tracking.
    fn highlight(&mut self, element: ElementId, rect: Rect);
}

// ============================================================================
// HeadlessOverlay
// ============================================================================

/// An overlay that keeps state without drawing anything.
///
/// Used when the page has no renderer attached and in tests. Records every
/// cursor write so redundant style writes are observable.
#[derive(Debug, Clone)]
pub struct HeadlessOverlay {
    boundary: ElementId,
    enabled: bool,
    hover: Option<HoverInfo>,
    cursor: Cursor,
    cursor_writes: usize,
}

impl HeadlessOverlay {
    /// Creates a disabled overlay hosted by `boundary`.
    #[must_use]
    pub fn new(boundary: ElementId) -> Self {
        Self {
            boundary,
            enabled: false,
            hover: None,
            cursor: Cursor::default(),
            cursor_writes: 0,
        }
    }

    /// Returns `true` while the overlay is shown.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of cursor writes so far.
    #[inline]
    #[must_use]
    pub fn cursor_writes(&self) -> usize {
        self.cursor_writes
    }
}

impl Overlay for HeadlessOverlay {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn hover_info(&self) -> Option<HoverInfo> {
        self.hover
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.cursor_writes += 1;
    }

    fn boundary(&self) -> ElementId {
        self.boundary
    }

    fn highlight(&mut self, element: ElementId, rect: Rect) {
        self.hover = Some(HoverInfo { element, rect });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_for_modifier() {
        assert_eq!(Cursor::for_modifier(false), Cursor::Crosshair);
        assert_eq!(Cursor::for_modifier(true), Cursor::Copy);
        assert_eq!(Cursor::Copy.css_value(), "copy");
    }

    #[test]
    fn test_headless_highlight() {
        let mut overlay = HeadlessOverlay::new(ElementId::new(99));
        assert!(overlay.hover_info().is_none());

        overlay.highlight(ElementId::new(3), Rect::new(1.0, 2.0, 3.0, 4.0));
        let hover = overlay.hover_info().expect("hover");
        assert_eq!(hover.element, ElementId::new(3));
        assert_eq!(hover.rect, Rect::new(1.0, 2.0, 3.0, 4.0));
    }
}
