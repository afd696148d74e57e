//! Incoming message types.
//!
//! Messages from the host are decoded in two steps: the envelope first,
//! then `data` according to the event name. Unrecognized events are kept
//! as [`PageEvent::Unknown`] so callers can ignore them. A `takenScreenshot`
//! whose `data` does not decode becomes [`PageEvent::MalformedCapture`], so
//! the failure still reaches the host.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

use super::HoverRect;

// ============================================================================
// RawEvent
// ============================================================================

/// Envelope of a host message before `data` is interpreted.
///
/// # Format
///
/// ```json
/// { "event": "takenScreenshot", "data": { ... } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    /// Event name.
    pub event: String,

    /// Event-specific data. Absent is treated as `null`.
    #[serde(default)]
    pub data: Value,
}

impl RawEvent {
    /// Interprets `data` according to the event name.
    #[must_use]
    pub fn parse(self) -> PageEvent {
        match self.event.as_str() {
            "enablePicker" => {
                let enable = self
                    .data
                    .get("enable")
                    .and_then(Value::as_bool)
                    .unwrap_or(true);
                PageEvent::EnablePicker { enable }
            }

            "takenScreenshot" => {
                let continue_picking = self
                    .data
                    .get("continuePicking")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);

                match serde_json::from_value::<CaptureResult>(self.data) {
                    Ok(result) => PageEvent::TakenScreenshot(result),
                    Err(e) => PageEvent::MalformedCapture {
                        message: Error::protocol(format!("malformed takenScreenshot: {e}"))
                            .to_string(),
                        continue_picking,
                    },
                }
            }

            _ => PageEvent::Unknown {
                event: self.event,
                data: self.data,
            },
        }
    }
}

// ============================================================================
// CaptureResult
// ============================================================================

/// Payload of `takenScreenshot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureResult {
    /// The raw, un-cropped screenshot as a `data:` URI.
    #[serde(rename = "dataURL")]
    pub data_url: String,

    /// Echo of the rectangle to crop to.
    #[serde(rename = "hoverInfo")]
    pub hover_info: HoverRect,

    /// Echo of the selection's flag.
    #[serde(rename = "continuePicking", default)]
    pub continue_picking: bool,
}

// ============================================================================
// PageEvent
// ============================================================================

/// A message from the host process to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Turn the picker on or off.
    EnablePicker {
        /// Target state.
        enable: bool,
    },

    /// The screenshot requested by `takeScreenshot`.
    TakenScreenshot(CaptureResult),

    /// A `takenScreenshot` whose `data` could not be decoded.
    MalformedCapture {
        /// Why the payload was rejected.
        message: String,
        /// `continuePicking` from the raw payload, `false` if unreadable.
        continue_picking: bool,
    },

    /// Any other event.
    Unknown {
        /// Event name.
        event: String,
        /// Raw data.
        data: Value,
    },
}

impl PageEvent {
    /// Parses a JSON text message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the text is not a message envelope.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str::<RawEvent>(text)?.parse())
    }

    /// Returns the event name.
    #[must_use]
    pub fn event_name(&self) -> &str {
        match self {
            Self::EnablePicker { .. } => "enablePicker",
            Self::TakenScreenshot(_) | Self::MalformedCapture { .. } => "takenScreenshot",
            Self::Unknown { event, .. } => event,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
