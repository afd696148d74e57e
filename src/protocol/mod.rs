//! Cross-context message types.
//!
//! This module defines the messages exchanged between the page (this
//! crate) and the host process that performs the actual screen capture.
//!
//! # Protocol Overview
//!
//! Every message is a JSON object `{ "event": <name>, "data": { ... } }`:
//!
//! | Event | Direction | Payload |
//! |-------|-----------|---------|
//! | `enablePicker` | Host → Page | `{ enable?: bool }` (default `true`) |
//! | `takeScreenshot` | Page → Host | `{ hoverInfo, continuePicking }` |
//! | `takenScreenshot` | Host → Page | `{ dataURL, hoverInfo, continuePicking }` |
//! | `openCroppedInNewTab` | Page → Host | `{ dataURL, continuePicking }` |
//! | `captureFailed` | Page → Host | `{ message, continuePicking }` |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `message` | Outgoing [`HostMessage`] and its payloads |
//! | `event` | Incoming [`PageEvent`] parsing |

// ============================================================================
// Submodules
// ============================================================================

/// Incoming message types.
pub mod event;

/// Outgoing message types.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::{CaptureResult, PageEvent, RawEvent};
pub use message::{CroppedCapture, HostMessage, HoverRect, SelectionRequest};
