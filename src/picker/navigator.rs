//! Drill up/down along the ancestor chain at the pointer.
//!
//! The chain is rebuilt from the live document on every call: the
//! innermost element under the pointer (ignoring the overlay) first, the
//! document root last. Drilling up moves one step toward the root,
//! drilling down one step back toward the innermost element.
//!
//! A step is silently refused when there is nowhere to go, when the
//! current target is no longer on the chain, or when the candidate would
//! contain the overlay itself.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::dom::Document;
use crate::geometry::Point;
use crate::identifiers::ElementId;

use super::{Overlay, Picker};

// ============================================================================
// DrillDirection
// ============================================================================

/// Direction of a drill step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrillDirection {
    /// Toward the document root.
    Up,
    /// Toward the innermost element under the pointer.
    Down,
}

// ============================================================================
// Navigation
// ============================================================================

/// Returns the topmost element at `point` that is neither the overlay
/// boundary nor inside it.
pub fn innermost_candidate<D>(document: &D, point: Point, boundary: ElementId) -> Option<ElementId>
where
    D: Document + ?Sized,
{
    document
        .elements_from_point(point)
        .into_iter()
        .find(|el| !document.contains(boundary, *el))
}

/// Computes the next drill target, or `None` if the target stays put.
pub fn compute_drill_target<D>(
    document: &D,
    direction: DrillDirection,
    current: ElementId,
    point: Point,
    boundary: ElementId,
) -> Option<ElementId>
where
    D: Document + ?Sized,
{
    let innermost = innermost_candidate(document, point, boundary)?;
    let chain = document.ancestors_and_self(innermost);

    let Some(index) = chain.iter().position(|el| *el == current) else {
        debug!(%current, "Drill target not under pointer");
        return None;
    };

    let next = match direction {
        DrillDirection::Up => chain.get(index + 1).copied(),
        DrillDirection::Down => index.checked_sub(1).and_then(|i| chain.get(i).copied()),
    }?;

    if document.contains(next, boundary) {
        debug!(candidate = %next, "Drill candidate contains overlay, keeping target");
        return None;
    }

    debug!(
        ?direction,
        from = %current,
        to = %next,
        depth = index,
        chain_len = chain.len(),
        "Drill target computed"
    );
    Some(next)
}

// ============================================================================
// Picker - Navigation
// ============================================================================

impl<D: Document, O: Overlay> Picker<D, O> {
    /// Moves the highlight one step along the ancestor chain at the last
    /// pointer position.
    ///
    /// Returns the new target, or `None` if nothing changed.
    pub fn drill(&mut self, direction: DrillDirection) -> Option<ElementId> {
        let current = self.overlay.hover_info()?.element;
        let next = compute_drill_target(
            &self.document,
            direction,
            current,
            self.session.last_pointer_position(),
            self.overlay.boundary(),
        )?;

        let rect = self.document.bounding_rect(next)?;
        self.overlay.highlight(next, rect);
        Some(next)
    }

    /// Records the pointer position and highlights the element under it.
    pub fn track_pointer(&mut self, point: Point) {
        if !self.session.is_enabled() {
            return;
        }
        self.session.track_pointer(point);

        let Some(target) = innermost_candidate(&self.document, point, self.overlay.boundary()) else {
            return;
        };
        if self.overlay.hover_info().map(|h| h.element) == Some(target) {
            return;
        }
        if let Some(rect) = self.document.bounding_rect(target) {
            self.overlay.highlight(target, rect);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
