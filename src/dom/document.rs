//! Read-only view of a live page.

use crate::geometry::{Point, Rect, Viewport};
use crate::identifiers::ElementId;

// ============================================================================
// Document
// ============================================================================

/// The subset of the page the picker reads.
///
/// Implementations answer from the live page at call time.
pub trait Document {
    /// Returns every element under `point`, topmost first.
    fn elements_from_point(&self, point: Point) -> Vec<ElementId>;

    /// Returns the parent element, or `None` for the root.
    fn parent_element(&self, element: ElementId) -> Option<ElementId>;

    /// Returns the element's viewport-relative border box.
    ///
    /// `None` if the element is no longer in the document.
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    /// Returns the current viewport.
    fn viewport(&self) -> Viewport;

    /// Returns `true` while the element is attached to the document.
    fn is_connected(&self, element: ElementId) -> bool {
        self.bounding_rect(element).is_some()
    }

    /// Returns `true` if `other` is `element` or one of its descendants.
    fn contains(&self, element: ElementId, other: ElementId) -> bool {
        let mut current = Some(other);
        while let Some(el) = current {
            if el == element {
                return true;
            }
            current = self.parent_element(el);
        }
        false
    }

    /// Returns `element` followed by its ancestors up to the root.
    fn ancestors_and_self(&self, element: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut current = Some(element);
        while let Some(el) = current {
            chain.push(el);
            current = self.parent_element(el);
        }
        chain
    }
}
