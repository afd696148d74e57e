//! Session state and controller.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::dom::Document;
use crate::geometry::Point;
use crate::identifiers::ElementId;

use super::{Cursor, Overlay, Picker};

// ============================================================================
// PickerSession
// ============================================================================

/// Mutable state shared by the dispatcher, the coordinator and cursor updates.
///
/// Lives for the lifetime of the page. Reset to disabled on every
/// confirmation and on Escape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickerSession {
    enabled: bool,
    /// Weak: checked against the document before use.
    last_confirmed: Option<ElementId>,
    last_pointer: Point,
}

impl PickerSession {
    /// Creates a disabled session.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while the picker is live.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Element of the most recent confirmation, if any.
    ///
    /// May no longer be in the document.
    #[inline]
    #[must_use]
    pub fn last_confirmed_element(&self) -> Option<ElementId> {
        self.last_confirmed
    }

    /// Last pointer position seen while enabled.
    #[inline]
    #[must_use]
    pub fn last_pointer_position(&self) -> Point {
        self.last_pointer
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn remember_confirmed(&mut self, element: ElementId) {
        self.last_confirmed = Some(element);
    }

    pub(crate) fn track_pointer(&mut self, point: Point) {
        self.last_pointer = point;
    }
}

// ============================================================================
// Picker - Session Control
// ============================================================================

impl<D: Document, O: Overlay> Picker<D, O> {
    /// Shows the overlay and starts tracking. Idempotent.
    pub fn enable(&mut self) {
        self.set_enabled(true);
    }

    /// Hides the overlay. Idempotent.
    pub fn disable(&mut self) {
        self.set_enabled(false);
    }

    /// Sets the enabled state of session and overlay together.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.session.is_enabled() != enabled {
            debug!(enabled, "Picker toggled");
        }
        self.session.set_enabled(enabled);
        self.overlay.set_enabled(enabled);
    }

    /// Returns `true` while the picker is live.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.session.is_enabled()
    }

    /// Switches the cursor between normal pick and pick-and-continue.
    ///
    /// No-op while disabled or when the cursor already matches.
    pub fn update_cursor_mode(&mut self, continue_held: bool) {
        if !self.session.is_enabled() {
            return;
        }
        let cursor = Cursor::for_modifier(continue_held);
        if self.overlay.cursor() != cursor {
            debug!(cursor = cursor.css_value(), "Changing cursor");
            self.overlay.set_cursor(cursor);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
