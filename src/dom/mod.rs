//! Live document access.
//!
//! The picker never caches DOM structure: every navigation step re-reads
//! the document through the [`Document`] trait at call time, so mutations
//! between key presses are always observed.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Document`] | Read-only view of a live page |
//! | [`DomTree`] | In-memory document with hit testing |

// ============================================================================
// Submodules
// ============================================================================

/// The document trait.
pub mod document;

/// In-memory document implementation.
pub mod tree;

// ============================================================================
// Re-exports
// ============================================================================

pub use document::Document;
pub use tree::DomTree;
