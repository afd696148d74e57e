//! In-memory document with hit testing.
//!
//! [`DomTree`] backs headless embedders and tests. Each element carries a
//! viewport-relative border box and an optional z-index; hit testing
//! returns the elements under a point in paint order, topmost first.
//!
//! # Example
//!
//! ```
//! use webclip_picker::dom::{Document, DomTree};
//! use webclip_picker::geometry::{Point, Rect, Viewport};
//!
//! let mut tree = DomTree::new(Viewport::new(800.0, 600.0));
//! let body = tree.append(tree.root(), "body", Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
//! let div = tree.append(body, "div", Rect::new(10.0, 10.0, 100.0, 100.0)).unwrap();
//!
//! let hits = tree.elements_from_point(Point::new(50.0, 50.0));
//! assert_eq!(hits, vec![div, body, tree.root()]);
//! ```

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;

use crate::geometry::{Point, Rect, Viewport};
use crate::identifiers::ElementId;

use super::Document;

// ============================================================================
// Node
// ============================================================================

/// A single element.
#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    rect: Rect,
    /// Explicit stacking order. `None` inherits from the parent.
    z_index: Option<i32>,
}

// ============================================================================
// DomTree
// ============================================================================

/// An in-memory document.
///
/// Created with a root `html` element covering the viewport.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: FxHashMap<ElementId, Node>,
    root: ElementId,
    next_id: u64,
    viewport: Viewport,
}

impl DomTree {
    /// Creates a document whose root covers `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let root = ElementId::new(0);
        let mut nodes = FxHashMap::default();
        nodes.insert(
            root,
            Node {
                tag: "html".to_string(),
                parent: None,
                children: Vec::new(),
                rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
                z_index: None,
            },
        );

        Self {
            nodes,
            root,
            next_id: 1,
            viewport,
        }
    }

    /// Returns the root element.
    #[inline]
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Returns the number of connected elements, root included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root cannot be removed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the element's tag name.
    #[must_use]
    pub fn tag(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(&element).map(|n| n.tag.as_str())
    }

    /// Returns the element's children in document order.
    #[must_use]
    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.nodes
            .get(&element)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Appends a new last child to `parent`.
    ///
    /// Returns `None` if `parent` is not in the document.
    pub fn append(&mut self, parent: ElementId, tag: impl Into<String>, rect: Rect) -> Option<ElementId> {
        let id = ElementId::new(self.next_id);
        self.nodes.get_mut(&parent)?.children.push(id);
        self.next_id += 1;

        self.nodes.insert(
            id,
            Node {
                tag: tag.into(),
                parent: Some(parent),
                children: Vec::new(),
                rect,
                z_index: None,
            },
        );
        Some(id)
    }

    /// Detaches `element` and its subtree.
    ///
    /// Returns `false` for the root or an element already removed.
    pub fn remove(&mut self, element: ElementId) -> bool {
        if element == self.root {
            return false;
        }
        let Some(node) = self.nodes.get(&element) else {
            return false;
        };

        if let Some(parent) = node.parent
            && let Some(parent_node) = self.nodes.get_mut(&parent)
        {
            parent_node.children.retain(|c| *c != element);
        }

        let mut stack = vec![element];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Moves or resizes an element's border box.
    pub fn set_rect(&mut self, element: ElementId, rect: Rect) -> bool {
        match self.nodes.get_mut(&element) {
            Some(node) => {
                node.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Sets the element's z-index. Descendants without their own inherit it.
    pub fn set_z_index(&mut self, element: ElementId, z_index: i32) -> bool {
        match self.nodes.get_mut(&element) {
            Some(node) => {
                node.z_index = Some(z_index);
                true
            }
            None => false,
        }
    }

    /// Replaces the viewport (resize, zoom).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

// ============================================================================
// Document
// ============================================================================

impl Document for DomTree {
    fn elements_from_point(&self, point: Point) -> Vec<ElementId> {
        // (effective z-index, document order, id)
        let mut hits: Vec<(i32, usize, ElementId)> = Vec::new();
        let mut order = 0usize;
        let mut stack = vec![(self.root, 0i32)];

        while let Some((id, inherited_z)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let z = node.z_index.unwrap_or(inherited_z);

            if node.rect.contains(point) {
                hits.push((z, order, id));
            }
            order += 1;

            for child in node.children.iter().rev() {
                stack.push((*child, z));
            }
        }

        hits.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        hits.into_iter().map(|(_, _, id)| id).collect()
    }

    fn parent_element(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(&element).and_then(|n| n.parent)
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.nodes.get(&element).map(|n| n.rect)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

// ============================================================================
// Tests
// ============================================================================
