//! Webclip Picker - page-side element picker for region screenshots.
//!
//! This library implements the interactive half of a screenshot-clipping
//! tool: a user hovers elements in a page, drills up and down the ancestor
//! chain, and confirms one. A host process captures the visible viewport,
//! and the page crops that capture to the chosen element.
//!
//! # Architecture
//!
//! The picker follows a page/host model:
//!
//! - **Page (Rust)**: Tracks input, highlights elements, crops captures
//! - **Host process**: Captures the viewport, opens the cropped result
//!
//! Key design principles:
//!
//! - A [`Picker`] owns its session state; nothing is global
//! - The DOM and the highlight overlay are traits ([`dom::Document`],
//!   [`picker::Overlay`]) so the picker runs headless
//! - Host messages use an `{ "event", "data" }` envelope
//! - Decoding and cropping run off the event loop
//!
//! # Quick Start
//!
//! ```no_run
//! use std::net::{IpAddr, Ipv4Addr};
//!
//! use tokio::sync::mpsc;
//! use webclip_picker::dom::DomTree;
//! use webclip_picker::geometry::{Rect, Viewport};
//! use webclip_picker::picker::{HeadlessOverlay, event_loop};
//! use webclip_picker::transport::PendingServer;
//! use webclip_picker::{Picker, PickerOptions, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut tree = DomTree::new(Viewport::new(1280.0, 720.0).with_device_pixel_ratio(2.0));
//!     let root = tree.root();
//!     let frame = tree.append(root, "iframe", Rect::default()).unwrap_or(root);
//!     let overlay = HeadlessOverlay::new(frame);
//!
//!     let (mut picker, outbox) = Picker::channel(tree, overlay, PickerOptions::new());
//!
//!     // Wait for the host process to connect
//!     let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
//!     println!("host url: {}", server.ws_url());
//!     let connection = server.accept(outbox).await?;
//!
//!     let (host_tx, host_rx) = mpsc::unbounded_channel();
//!     connection.set_event_sink(host_tx);
//!
//!     // Feed page input on `inputs`
//!     let (_inputs_tx, inputs_rx) = mpsc::unbounded_channel();
//!     event_loop::run(&mut picker, inputs_rx, host_rx).await;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dom`] | Document abstraction and an in-memory tree |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`geometry`] | Points, rectangles, viewport clipping |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`imaging`] | Data URLs, cropping and encoding |
//! | [`picker`] | The picker, its input dispatch and capture handshake |
//! | [`protocol`] | Host message types |
//! | [`transport`] | WebSocket transport to the host |

// ============================================================================
// Modules
// ============================================================================

/// Document abstraction.
///
/// The picker reads the page through [`dom::Document`]; [`dom::DomTree`]
/// is an in-memory implementation.
pub mod dom;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Geometry in CSS and device pixels.
pub mod geometry;

/// Type-safe identifiers for page entities.
pub mod identifiers;

/// Data URL codec and capture cropping.
pub mod imaging;

/// The element picker.
///
/// - [`Picker`] - Session state plus the document and overlay it drives
/// - [`picker::event_loop`] - Single-task loop over input and host events
pub mod picker;

/// Host protocol message types.
pub mod protocol;

/// WebSocket transport layer.
///
/// Bridges the picker's channels to the host process.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::ElementId;

// Imaging types
pub use imaging::ImageFormat;

// Picker types
pub use picker::{HoverInfo, Picker, PickerOptions};

// Protocol types
pub use protocol::{HostMessage, PageEvent};
