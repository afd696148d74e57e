//! The element picker.
//!
//! A [`Picker`] owns the page-side state of one picking session and the
//! collaborators it drives:
//!
//! | Part | Module | Role |
//! |------|--------|------|
//! | Session controller | `session` | enable/disable, cursor mode |
//! | Ancestry navigator | `navigator` | drill up/down at the pointer |
//! | Capture coordinator | `capture` | `takeScreenshot` / `takenScreenshot` handshake |
//! | Input dispatcher | `input` | keyboard and pointer events |
//!
//! Everything runs on one task. The only suspension points are the
//! capture delay and the crop of a returned screenshot, neither of which
//! holds a borrow of the picker.
//!
//! # Example
//!
//! ```no_run
//! use webclip_picker::dom::DomTree;
//! use webclip_picker::geometry::{Point, Rect, Viewport};
//! use webclip_picker::picker::{HeadlessOverlay, InputEvent, Key, KeyEvent, Picker, PointerEvent};
//! use webclip_picker::PickerOptions;
//!
//! # async fn example() {
//! let mut tree = DomTree::new(Viewport::new(1280.0, 720.0));
//! let root = tree.root();
//! let frame = tree.append(root, "iframe", Rect::default()).unwrap();
//! tree.append(root, "body", Rect::new(0.0, 0.0, 1280.0, 720.0)).unwrap();
//! let overlay = HeadlessOverlay::new(frame);
//!
//! let (mut picker, mut outbox) = Picker::channel(tree, overlay, PickerOptions::new());
//! picker.enable();
//! picker.dispatch(&InputEvent::PointerMove(PointerEvent::at(Point::new(10.0, 10.0))));
//! picker.dispatch(&InputEvent::KeyDown(KeyEvent::new(Key::Space)));
//!
//! let request = outbox.recv().await;
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Capture handshake.
pub mod capture;

/// Single-task event loop.
pub mod event_loop;

/// Keyboard and pointer dispatch.
pub mod input;

/// Drill up/down along the ancestor chain.
pub mod navigator;

/// Picker configuration.
pub mod options;

/// The overlay collaborator.
pub mod overlay;

/// Session state and controller.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use input::{EventDisposition, InputEvent, Key, KeyEvent, MouseButton, PointerEvent, TriggerEvent, TriggerSource};
pub use navigator::{DrillDirection, compute_drill_target, innermost_candidate};
pub use options::{DEFAULT_CAPTURE_DELAY, PickerOptions};
pub use overlay::{Cursor, HeadlessOverlay, Overlay};
pub use session::PickerSession;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tokio::sync::mpsc;

use crate::dom::Document;
use crate::geometry::Rect;
use crate::identifiers::ElementId;
use crate::protocol::{HostMessage, HoverRect, SelectionRequest};

// ============================================================================
// HoverInfo
// ============================================================================

/// Snapshot of the highlighted element.
///
/// Carries a live element reference and therefore cannot be sent to the
/// host. Use [`HoverInfo::to_request`] for the serializable projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverInfo {
    /// The highlighted element.
    pub element: ElementId,
    /// Its viewport-relative rectangle in CSS pixels.
    pub rect: Rect,
}

impl HoverInfo {
    /// Strips the element reference and builds the capture request.
    #[must_use]
    pub fn to_request(&self, continue_picking: bool) -> SelectionRequest {
        SelectionRequest {
            hover_info: HoverRect::from(self.rect),
            continue_picking,
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// Observer invoked at every confirmation.
///
/// Called after the picker is disabled and before the request is queued.
pub type ConfirmHook = Box<dyn FnMut(&SelectionRequest) + Send>;

// ============================================================================
// Picker
// ============================================================================

/// Page-side element picker.
///
/// Generic over the live [`Document`] and the [`Overlay`] collaborator.
/// Messages for the host process are queued on an unbounded channel.
pub struct Picker<D, O> {
    pub(crate) document: D,
    pub(crate) overlay: O,
    pub(crate) session: PickerSession,
    pub(crate) options: PickerOptions,
    pub(crate) outbox: mpsc::UnboundedSender<HostMessage>,
    pub(crate) confirm_hook: Option<ConfirmHook>,
}

impl<D, O> fmt::Debug for Picker<D, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picker")
            .field("session", &self.session)
            .field("options", &self.options)
            .field("confirm_hook", &self.confirm_hook.is_some())
            .finish_non_exhaustive()
    }
}

impl<D: Document, O: Overlay> Picker<D, O> {
    /// Creates a disabled picker that queues host messages on `outbox`.
    pub fn new(
        document: D,
        mut overlay: O,
        options: PickerOptions,
        outbox: mpsc::UnboundedSender<HostMessage>,
    ) -> Self {
        overlay.set_enabled(false);
        Self {
            document,
            overlay,
            session: PickerSession::new(),
            options,
            outbox,
            confirm_hook: None,
        }
    }

    /// Creates a disabled picker and the receiving end of its outbox.
    pub fn channel(
        document: D,
        overlay: O,
        options: PickerOptions,
    ) -> (Self, mpsc::UnboundedReceiver<HostMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(document, overlay, options, tx), rx)
    }
}

// ============================================================================
// Picker - Accessors
// ============================================================================

impl<D, O> Picker<D, O> {
    /// Returns the document.
    #[inline]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Returns the document for mutation.
    #[inline]
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Returns the overlay.
    #[inline]
    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Returns the session state.
    #[inline]
    pub fn session(&self) -> &PickerSession {
        &self.session
    }

    /// Returns the options.
    #[inline]
    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    /// Installs the confirmation observer, replacing any previous one.
    pub fn set_confirm_hook(&mut self, hook: ConfirmHook) {
        self.confirm_hook = Some(hook);
    }

    /// Removes the confirmation observer.
    pub fn clear_confirm_hook(&mut self) {
        self.confirm_hook = None;
    }
}

// ============================================================================
// Test Support
// ============================================================================

#[cfg(test)]
pub(crate) mod fixture {
    use super::*;

    use crate::dom::DomTree;
    use crate::geometry::Viewport;

    /// `html > body > section > div`, plus the overlay frame on top.
    pub(crate) struct Page {
        pub picker: Picker<DomTree, HeadlessOverlay>,
        pub outbox: mpsc::UnboundedReceiver<HostMessage>,
        pub body: ElementId,
        pub section: ElementId,
        pub div: ElementId,
        pub frame: ElementId,
    }

    pub(crate) fn page(options: PickerOptions) -> Page {
        let mut tree = DomTree::new(Viewport::new(1000.0, 800.0));
        let root = tree.root();
        let body = tree
            .append(root, "body", Rect::new(0.0, 0.0, 1000.0, 800.0))
            .expect("body");
        let section = tree
            .append(body, "section", Rect::new(0.0, 0.0, 500.0, 400.0))
            .expect("section");
        let div = tree
            .append(section, "div", Rect::new(20.0, 20.0, 100.0, 50.0))
            .expect("div");
        let frame = tree
            .append(body, "iframe", Rect::new(0.0, 0.0, 1000.0, 800.0))
            .expect("frame");
        tree.set_z_index(frame, i32::MAX);

        let (picker, outbox) = Picker::channel(tree, HeadlessOverlay::new(frame), options);
        Page {
            picker,
            outbox,
            body,
            section,
            div,
            frame,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
