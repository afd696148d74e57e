//! Type-safe identifiers for page entities.
//!
//! An [`ElementId`] is a live reference into a document. It is only
//! meaningful to the [`Document`](crate::dom::Document) that issued it and
//! deliberately does not implement `Serialize`: nothing holding one may cross
//! to the host process.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// ElementId
// ============================================================================

/// Handle to an element in a live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Creates an element ID from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
