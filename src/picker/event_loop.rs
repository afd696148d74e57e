//! Single-task event loop.
//!
//! Page input and host messages are multiplexed onto one task. Each
//! channel is handled in arrival order; when both have something ready the
//! host message goes first. Crop work is handed to the blocking pool, so
//! Escape and other input keep flowing while a capture is being processed.

// ============================================================================
// Imports
// ============================================================================

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::dom::Document;
use crate::protocol::PageEvent;

use super::{InputEvent, Overlay, Picker};

// ============================================================================
// Event Loop
// ============================================================================

/// Drives `picker` until both channels are closed.
///
/// Must run inside a Tokio runtime. Outstanding crop tasks are not awaited;
/// dropping the page drops them.
pub async fn run<D, O>(
    picker: &mut Picker<D, O>,
    mut inputs: mpsc::UnboundedReceiver<InputEvent>,
    mut host_events: mpsc::UnboundedReceiver<PageEvent>,
) where
    D: Document,
    O: Overlay,
{
    let mut inputs_open = true;
    let mut host_open = true;

    while inputs_open || host_open {
        tokio::select! {
            biased;

            event = host_events.recv(), if host_open => match event {
                Some(event) => {
                    debug!(event = event.event_name(), "Host event");
                    picker.handle_page_event(event);
                }
                None => {
                    debug!("Host channel closed");
                    host_open = false;
                }
            },

            event = inputs.recv(), if inputs_open => match event {
                Some(event) => {
                    let disposition = picker.dispatch(&event);
                    trace!(?event, ?disposition, "Input dispatched");
                }
                None => {
                    debug!("Input channel closed");
                    inputs_open = false;
                }
            },
        }
    }

    debug!("Picker event loop terminated");
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::geometry::Point;
    use crate::picker::fixture::page;
    use crate::picker::{Key, KeyEvent, PickerOptions, PointerEvent};
    use crate::protocol::HostMessage;

    #[tokio::test]
    async fn test_loop_enables_and_confirms() {
        let mut page = page(PickerOptions::new().with_capture_delay(Duration::from_millis(5)));
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (host_tx, host_rx) = mpsc::unbounded_channel();

        host_tx
            .send(PageEvent::EnablePicker { enable: true })
            .expect("send");
        drop(host_tx);

        input_tx
            .send(InputEvent::PointerMove(PointerEvent::at(Point::new(30.0, 30.0))))
            .expect("send");
        input_tx
            .send(InputEvent::KeyDown(KeyEvent::new(Key::Space)))
            .expect("send");
        drop(input_tx);

        run(&mut page.picker, input_rx, host_rx).await;

        assert!(!page.picker.is_enabled());
        match page.outbox.recv().await.expect("request") {
            HostMessage::TakeScreenshot(request) => {
                assert_eq!(request.hover_info.width, 100.0);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
