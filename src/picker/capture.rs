//! Capture handshake with the host process.
//!
//! # Flow
//!
//! 1. Confirmation disables the picker synchronously, so the overlay is out
//!    of the page before anything else happens.
//! 2. After [`PickerOptions::capture_delay`](super::PickerOptions) the page
//!    sends `takeScreenshot` with the element reference stripped.
//! 3. The host answers with `takenScreenshot` carrying the raw capture.
//! 4. The capture is decoded, clipped to the viewport, cropped and sent on
//!    as `openCroppedInNewTab`. A capture that cannot be decoded is reported
//!    as `captureFailed` instead.
//!
//! The delay is a race-avoidance heuristic, not a guarantee that the
//! overlay has been repainted away.

// ============================================================================
// Imports
// ============================================================================

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::dom::Document;
use crate::geometry::{Rect, Viewport};
use crate::imaging::{ImageFormat, crop_capture};
use crate::protocol::{CaptureResult, CroppedCapture, HostMessage, PageEvent, SelectionRequest};

use super::{Cursor, HoverInfo, Overlay, Picker, TriggerEvent};

// ============================================================================
// Picker - Capture
// ============================================================================

impl<D: Document, O: Overlay> Picker<D, O> {
    /// Handles a confirmation attempt on the current target.
    ///
    /// The picker is disabled whether or not the trigger is honored.
    pub fn on_action(&mut self, trigger: TriggerEvent) {
        let hover = self.overlay.hover_info();
        debug!(?trigger, target = ?hover.map(|h| h.element), "Picker action");

        match hover {
            Some(hover) if trigger.is_honored() => {
                self.confirm_selection(hover, trigger.continue_held);
            }
            _ => self.disable(),
        }
    }

    /// Confirms `hover` and requests a capture.
    ///
    /// Disables the picker before anything is queued. With a non-zero
    /// capture delay the request is sent from a spawned task and this must
    /// be called inside a Tokio runtime.
    pub fn confirm_selection(&mut self, hover: HoverInfo, continue_picking: bool) {
        self.session.remember_confirmed(hover.element);
        self.disable();

        let request = hover.to_request(continue_picking);
        debug!(element = %hover.element, ?request, "Selection confirmed");

        if let Some(hook) = self.confirm_hook.as_mut() {
            hook(&request);
        }

        let delay = self.options.capture_delay;
        if delay.is_zero() {
            send_request(&self.outbox, request);
            return;
        }

        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            send_request(&outbox, request);
        });
    }

    /// Crops a returned capture and forwards it.
    ///
    /// With `continue_picking` the picker is re-armed and the previously
    /// confirmed element re-highlighted right away, before the crop runs.
    /// The crop runs on the blocking pool; the returned handle completes
    /// once the result (or failure) has been queued for the host. Must be
    /// called inside a Tokio runtime.
    pub fn on_capture_result(&mut self, result: CaptureResult) -> JoinHandle<()> {
        let continue_picking = result.continue_picking;
        if continue_picking {
            self.rearm();
        }

        let job = CropJob {
            data_url: result.data_url,
            hover: Rect::from(result.hover_info),
            viewport: self.document.viewport(),
            format: self.options.output_format,
            continue_picking,
        };
        let outbox = self.outbox.clone();

        tokio::task::spawn_blocking(move || job.run(&outbox))
    }

    /// Handles a message from the host.
    ///
    /// Returns the crop task for `takenScreenshot`.
    pub fn handle_page_event(&mut self, event: PageEvent) -> Option<JoinHandle<()>> {
        match event {
            PageEvent::EnablePicker { enable } => {
                self.set_enabled(enable);
                self.overlay.set_cursor(Cursor::Crosshair);
                None
            }
            PageEvent::TakenScreenshot(result) => Some(self.on_capture_result(result)),
            PageEvent::MalformedCapture {
                message,
                continue_picking,
            } => {
                self.on_capture_failure(message, continue_picking);
                None
            }
            PageEvent::Unknown { event, .. } => {
                debug!(event, "Ignoring unknown host event");
                None
            }
        }
    }

    /// Reports a capture that never reached the crop step.
    ///
    /// Re-arms like a successful result when `continue_picking` is set.
    pub fn on_capture_failure(&mut self, message: String, continue_picking: bool) {
        warn!(%message, continue_picking, "Capture payload rejected");
        if continue_picking {
            self.rearm();
        }

        let failure = HostMessage::CaptureFailed {
            message,
            continue_picking,
        };
        if self.outbox.send(failure).is_err() {
            warn!("Host channel closed, dropping capture failure");
        }
    }

    /// Re-enables the picker on the last confirmed element, if it is still
    /// in the document.
    fn rearm(&mut self) {
        self.enable();

        let Some(element) = self.session.last_confirmed_element() else {
            return;
        };
        match self.document.bounding_rect(element) {
            Some(rect) => self.overlay.highlight(element, rect),
            None => debug!(%element, "Last confirmed element detached, not re-highlighting"),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn send_request(outbox: &mpsc::UnboundedSender<HostMessage>, request: SelectionRequest) {
    if outbox.send(HostMessage::TakeScreenshot(request)).is_err() {
        warn!("Host channel closed, dropping capture request");
    }
}

/// Everything the crop needs, detached from the picker.
struct CropJob {
    data_url: String,
    hover: Rect,
    viewport: Viewport,
    format: ImageFormat,
    continue_picking: bool,
}

impl CropJob {
    fn run(self, outbox: &mpsc::UnboundedSender<HostMessage>) {
        let message = match crop_capture(&self.data_url, self.hover, self.viewport, self.format) {
            Ok(Some(data_url)) => {
                debug!(len = data_url.len(), "Sending cropped capture");
                HostMessage::OpenCroppedInNewTab(CroppedCapture {
                    data_url,
                    continue_picking: self.continue_picking,
                })
            }
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Capture could not be cropped");
                HostMessage::CaptureFailed {
                    message: e.to_string(),
                    continue_picking: self.continue_picking,
                }
            }
        };

        if outbox.send(message).is_err() {
            warn!("Host channel closed, dropping cropped capture");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use image::{DynamicImage, Rgba, RgbaImage};

    use crate::geometry::Point;
    use crate::imaging::{decode_data_url_image, encode_data_url, encode_image};
    use crate::picker::fixture::page;
    use crate::picker::{InputEvent, Key, KeyEvent, MouseButton, PickerOptions, PointerEvent};
    use crate::protocol::HoverRect;

    const INSIDE_DIV: Point = Point::new(30.0, 30.0);

    fn immediate() -> PickerOptions {
        PickerOptions::new().with_capture_delay(Duration::ZERO)
    }

    fn screenshot(width: u32, height: u32) -> String {
        let img = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        let bytes = encode_image(&DynamicImage::ImageRgba8(img), ImageFormat::Png).expect("encode");
        encode_data_url("image/png", &bytes)
    }

    fn result(data_url: String, continue_picking: bool) -> CaptureResult {
        CaptureResult {
            data_url,
            hover_info: HoverRect {
                left: 20.0,
                top: 20.0,
                width: 100.0,
                height: 50.0,
            },
            continue_picking,
        }
    }

    #[tokio::test]
    async fn test_confirm_disables_before_sending() {
        let mut page = page(PickerOptions::new().with_capture_delay(Duration::from_millis(20)));
        page.picker.enable();
        page.picker.track_pointer(INSIDE_DIV);

        page.picker.on_action(TriggerEvent::pointer(MouseButton::Primary, false));

        assert!(!page.picker.is_enabled());
        assert!(page.outbox.try_recv().is_err(), "request must wait for the delay");

        let msg = page.outbox.recv().await.expect("request");
        assert_eq!(msg.event_name(), "takeScreenshot");
        assert_eq!(page.picker.session().last_confirmed_element(), Some(page.div));
    }

    #[tokio::test]
    async fn test_action_without_target_only_disables() {
        let mut page = page(immediate());
        page.picker.enable();

        page.picker.on_action(TriggerEvent::synthetic(false));

        assert!(!page.picker.is_enabled());
        assert!(page.outbox.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_capture_result_crops_and_forwards() {
        let mut page = page(immediate());

        page.picker
            .on_capture_result(result(screenshot(1000, 800), false))
            .await
            .expect("crop task");

        assert!(!page.picker.is_enabled());
        match page.outbox.try_recv().expect("cropped") {
            HostMessage::OpenCroppedInNewTab(cropped) => {
                assert!(!cropped.continue_picking);
                let image = decode_data_url_image(&cropped.data_url).expect("decode").to_rgba8();
                assert_eq!(image.dimensions(), (100, 50));
                assert_eq!(image.get_pixel(0, 0), &Rgba([20, 20, 7, 255]));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_continue_picking_rearms_and_rehighlights() {
        let mut page = page(immediate());
        page.picker.enable();
        page.picker
            .dispatch(&InputEvent::PointerMove(PointerEvent::at(INSIDE_DIV)));
        page.picker
            .dispatch(&InputEvent::PointerUp(PointerEvent::at(INSIDE_DIV).with_shift(true)));
        let _request = page.outbox.try_recv().expect("request");

        // pointer wandered off before the result came back
        page.picker.enable();
        page.picker.track_pointer(Point::new(800.0, 700.0));
        page.picker.disable();

        let task = page.picker.on_capture_result(result(screenshot(1000, 800), true));
        assert!(page.picker.is_enabled());
        assert_eq!(
            page.picker.overlay().hover_info().map(|h| h.element),
            Some(page.div)
        );

        task.await.expect("crop task");
        match page.outbox.try_recv().expect("cropped") {
            HostMessage::OpenCroppedInNewTab(cropped) => assert!(cropped.continue_picking),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_without_continue_stays_disabled() {
        let mut page = page(immediate());
        page.picker.enable();
        page.picker
            .dispatch(&InputEvent::PointerMove(PointerEvent::at(INSIDE_DIV)));
        page.picker
            .dispatch(&InputEvent::PointerUp(PointerEvent::at(INSIDE_DIV)));
        let _request = page.outbox.try_recv().expect("request");

        page.picker
            .on_capture_result(result(screenshot(1000, 800), false))
            .await
            .expect("crop task");
        assert!(!page.picker.is_enabled());
    }

    #[tokio::test]
    async fn test_detached_element_not_rehighlighted() {
        let mut page = page(immediate());
        page.picker.enable();
        page.picker
            .dispatch(&InputEvent::PointerMove(PointerEvent::at(INSIDE_DIV)));
        page.picker
            .dispatch(&InputEvent::PointerUp(PointerEvent::at(INSIDE_DIV).with_shift(true)));
        let _request = page.outbox.try_recv().expect("request");

        page.picker.document_mut().remove(page.section);
        let task = page.picker.on_capture_result(result(screenshot(1000, 800), true));

        assert!(page.picker.is_enabled());
        task.await.expect("crop task");
    }

    #[tokio::test]
    async fn test_malformed_capture_never_forwards_crop() {
        let mut page = page(immediate());

        page.picker
            .on_capture_result(result("data:image/png;base64,AAAA".to_string(), false))
            .await
            .expect("crop task");

        match page.outbox.try_recv().expect("failure") {
            HostMessage::CaptureFailed { message, .. } => assert!(!message.is_empty()),
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(page.outbox.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_malformed_payload_reports_and_rearms() {
        let mut page = page(immediate());
        page.picker.enable();
        page.picker
            .dispatch(&InputEvent::PointerMove(PointerEvent::at(INSIDE_DIV)));
        page.picker
            .dispatch(&InputEvent::KeyDown(KeyEvent::new(Key::Space).with_shift(true)));
        let _request = page.outbox.try_recv().expect("request");

        let event = PageEvent::from_json(
            r#"{"event":"takenScreenshot","data":{"dataURL":5,"continuePicking":true}}"#,
        )
        .expect("envelope");
        assert!(page.picker.handle_page_event(event).is_none());

        assert!(page.picker.is_enabled());
        assert_eq!(
            page.picker.overlay().hover_info().map(|h| h.element),
            Some(page.div)
        );
        match page.outbox.try_recv().expect("failure") {
            HostMessage::CaptureFailed {
                message,
                continue_picking,
            } => {
                assert!(message.contains("takenScreenshot"));
                assert!(continue_picking);
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(page.outbox.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_offscreen_selection_forwards_nothing() {
        let mut page = page(immediate());
        let mut offscreen = result(screenshot(1000, 800), false);
        offscreen.hover_info.top = 2000.0;

        page.picker
            .on_capture_result(offscreen)
            .await
            .expect("crop task");
        assert!(page.outbox.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_enable_picker_event_resets_cursor() {
        let mut page = page(immediate());
        page.picker.enable();
        page.picker.update_cursor_mode(true);

        page.picker.handle_page_event(PageEvent::EnablePicker { enable: true });
        assert!(page.picker.is_enabled());
        assert_eq!(page.picker.overlay().cursor(), Cursor::Crosshair);

        page.picker.handle_page_event(PageEvent::EnablePicker { enable: false });
        assert!(!page.picker.is_enabled());
    }
}
