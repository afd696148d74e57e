//! Outgoing message types.
//!
//! Nothing in this module can hold an [`ElementId`](crate::ElementId): the
//! types here are the serializable projections of in-page state.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

// ============================================================================
// HoverRect
// ============================================================================

/// Viewport-relative rectangle of the selected element, in CSS pixels.
///
/// # Format
///
/// ```json
/// { "left": 10, "top": 20, "width": 100, "height": 50 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HoverRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl From<Rect> for HoverRect {
    fn from(rect: Rect) -> Self {
        Self {
            left: rect.x,
            top: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl From<HoverRect> for Rect {
    fn from(rect: HoverRect) -> Self {
        Rect::new(rect.left, rect.top, rect.width, rect.height)
    }
}

// ============================================================================
// SelectionRequest
// ============================================================================

/// Payload of `takeScreenshot`.
///
/// Built from a [`HoverInfo`](crate::picker::HoverInfo) with the element
/// reference stripped.
///
/// # Format
///
/// ```json
/// {
///   "hoverInfo": { "left": 10, "top": 20, "width": 100, "height": 50 },
///   "continuePicking": false
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    /// Rectangle to crop to.
    #[serde(rename = "hoverInfo")]
    pub hover_info: HoverRect,

    /// Re-arm the picker after this capture.
    #[serde(rename = "continuePicking")]
    pub continue_picking: bool,
}

// ============================================================================
// CroppedCapture
// ============================================================================

/// Payload of `openCroppedInNewTab`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CroppedCapture {
    /// The cropped image as a `data:` URI.
    #[serde(rename = "dataURL")]
    pub data_url: String,

    /// Echo of the selection's flag.
    #[serde(rename = "continuePicking")]
    pub continue_picking: bool,
}

// ============================================================================
// HostMessage
// ============================================================================

/// A message from the page to the host process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum HostMessage {
    /// Ask the host to capture the visible page.
    #[serde(rename = "takeScreenshot")]
    TakeScreenshot(SelectionRequest),

    /// Hand the cropped image onward.
    #[serde(rename = "openCroppedInNewTab")]
    OpenCroppedInNewTab(CroppedCapture),

    /// The capture payload could not be decoded or cropped.
    #[serde(rename = "captureFailed")]
    CaptureFailed {
        /// Failure description.
        message: String,
        /// Echo of the selection's flag.
        #[serde(rename = "continuePicking")]
        continue_picking: bool,
    },
}

impl HostMessage {
    /// Returns the event name on the wire.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::TakeScreenshot(_) => "takeScreenshot",
            Self::OpenCroppedInNewTab(_) => "openCroppedInNewTab",
            Self::CaptureFailed { .. } => "captureFailed",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};

    #[test]
    fn test_take_screenshot_wire_format() {
        let msg = HostMessage::TakeScreenshot(SelectionRequest {
            hover_info: HoverRect::from(Rect::new(10.0, 20.0, 100.0, 50.0)),
            continue_picking: true,
        });
        let value: Value = serde_json::to_value(&msg).expect("serialize");

        assert_eq!(
            value,
            json!({
                "event": "takeScreenshot",
                "data": {
                    "hoverInfo": { "left": 10.0, "top": 20.0, "width": 100.0, "height": 50.0 },
                    "continuePicking": true
                }
            })
        );
        assert_eq!(msg.event_name(), "takeScreenshot");
    }

    #[test]
    fn test_open_cropped_wire_format() {
        let msg = HostMessage::OpenCroppedInNewTab(CroppedCapture {
            data_url: "data:image/png;base64,AAAA".to_string(),
            continue_picking: false,
        });
        let json = serde_json::to_string(&msg).expect("serialize");

        assert!(json.contains("\"event\":\"openCroppedInNewTab\""));
        assert!(json.contains("\"dataURL\":\"data:image/png;base64,AAAA\""));
        assert!(json.contains("\"continuePicking\":false"));
    }

    #[test]
    fn test_capture_failed_wire_format() {
        let msg = HostMessage::CaptureFailed {
            message: "bad payload".to_string(),
            continue_picking: false,
        };
        let value: Value = serde_json::to_value(&msg).expect("serialize");

        assert_eq!(value["event"], "captureFailed");
        assert_eq!(value["data"]["message"], "bad payload");
    }

    #[test]
    fn test_hover_rect_conversion() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let hover = HoverRect::from(rect);
        assert_eq!(hover.left, 1.0);
        assert_eq!(hover.top, 2.0);
        assert_eq!(Rect::from(hover), rect);
    }
}
