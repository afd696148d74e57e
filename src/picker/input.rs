//! Keyboard and pointer dispatch.
//!
//! Events are delivered in capture phase at the document level, so the
//! page cannot swallow them first. While the picker is enabled:
//!
//! | Input | Action |
//! |-------|--------|
//! | `Escape` up | disable |
//! | `Space` down | confirm the current target (synthetic trigger) |
//! | `Q` down | drill up |
//! | `A` down | drill down |
//! | any key up/down | re-apply cursor mode from `shiftKey` |
//! | pointer up | confirm if it was the primary button |

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::dom::Document;
use crate::geometry::Point;

use super::{DrillDirection, Overlay, Picker};

// ============================================================================
// Key
// ============================================================================

/// Physical keys the picker reacts to, by `KeyboardEvent.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape key
    Escape,
    /// Space bar
    Space,
    /// Q key
    KeyQ,
    /// A key
    KeyA,
    /// Left Shift
    ShiftLeft,
    /// Right Shift
    ShiftRight,
    /// Anything else
    Other,
}

impl Key {
    /// Maps a `KeyboardEvent.code` string.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "Escape" => Self::Escape,
            "Space" => Self::Space,
            "KeyQ" => Self::KeyQ,
            "KeyA" => Self::KeyA,
            "ShiftLeft" => Self::ShiftLeft,
            "ShiftRight" => Self::ShiftRight,
            _ => Self::Other,
        }
    }

    /// Returns the `KeyboardEvent.code` string.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Escape => "Escape",
            Self::Space => "Space",
            Self::KeyQ => "KeyQ",
            Self::KeyA => "KeyA",
            Self::ShiftLeft => "ShiftLeft",
            Self::ShiftRight => "ShiftRight",
            Self::Other => "",
        }
    }

    /// Drill direction bound to this key, if any.
    #[inline]
    #[must_use]
    pub fn drill_direction(self) -> Option<DrillDirection> {
        match self {
            Self::KeyQ => Some(DrillDirection::Up),
            Self::KeyA => Some(DrillDirection::Down),
            _ => None,
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// A key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// `shiftKey` at the time of the event.
    pub shift: bool,
}

impl KeyEvent {
    /// Creates a key event without Shift held.
    #[inline]
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    /// Sets the Shift state.
    #[inline]
    #[must_use]
    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }
}

/// Mouse button, by `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Usually the left button.
    Primary,
    /// Usually the wheel button.
    Auxiliary,
    /// Usually the right button.
    Secondary,
    /// Back, forward and beyond.
    Other(u16),
}

impl MouseButton {
    /// Maps `MouseEvent.button`.
    #[must_use]
    pub fn from_index(index: u16) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Viewport position.
    pub point: Point,
    /// Button for up/down events.
    pub button: MouseButton,
    /// `shiftKey` at the time of the event.
    pub shift: bool,
}

impl PointerEvent {
    /// Creates a primary-button event at `point` without Shift held.
    #[inline]
    #[must_use]
    pub fn at(point: Point) -> Self {
        Self {
            point,
            button: MouseButton::Primary,
            shift: false,
        }
    }

    /// Sets the button.
    #[inline]
    #[must_use]
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    /// Sets the Shift state.
    #[inline]
    #[must_use]
    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }
}

/// Raw input delivered to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// `keydown`
    KeyDown(KeyEvent),
    /// `keyup`
    KeyUp(KeyEvent),
    /// `mousemove`
    PointerMove(PointerEvent),
    /// `mouseup`
    PointerUp(PointerEvent),
}

/// Whether the event's default action should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventDisposition {
    /// Let the page handle the event normally.
    #[default]
    Proceed,
    /// Suppress the default action.
    PreventDefault,
}

// ============================================================================
// TriggerEvent
// ============================================================================

/// What fired a confirmation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// A real pointer release.
    Pointer(MouseButton),
    /// Keyboard stand-in for a click (Space).
    Synthetic,
}

/// A confirmation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Origin of the trigger.
    pub source: TriggerSource,
    /// Continue-picking modifier held.
    pub continue_held: bool,
}

impl TriggerEvent {
    /// A pointer release.
    #[inline]
    #[must_use]
    pub fn pointer(button: MouseButton, continue_held: bool) -> Self {
        Self {
            source: TriggerSource::Pointer(button),
            continue_held,
        }
    }

    /// A keyboard trigger.
    #[inline]
    #[must_use]
    pub fn synthetic(continue_held: bool) -> Self {
        Self {
            source: TriggerSource::Synthetic,
            continue_held,
        }
    }

    /// Synthetic triggers always confirm; pointer releases only with the
    /// primary button.
    #[inline]
    #[must_use]
    pub fn is_honored(&self) -> bool {
        match self.source {
            TriggerSource::Synthetic => true,
            TriggerSource::Pointer(button) => button == MouseButton::Primary,
        }
    }
}

// ============================================================================
// Picker - Dispatch
// ============================================================================

impl<D: Document, O: Overlay> Picker<D, O> {
    /// Routes one input event.
    pub fn dispatch(&mut self, event: &InputEvent) -> EventDisposition {
        match *event {
            InputEvent::KeyDown(key) => self.on_key_down(key),
            InputEvent::KeyUp(key) => self.on_key_up(key),
            InputEvent::PointerMove(pointer) => {
                self.track_pointer(pointer.point);
                EventDisposition::Proceed
            }
            InputEvent::PointerUp(pointer) => {
                // confirms the current highlight, which may be a drilled ancestor
                if self.is_enabled() {
                    self.session.track_pointer(pointer.point);
                    self.on_action(TriggerEvent::pointer(pointer.button, pointer.shift));
                }
                EventDisposition::Proceed
            }
        }
    }

    fn on_key_down(&mut self, event: KeyEvent) -> EventDisposition {
        let mut disposition = EventDisposition::Proceed;

        if self.is_enabled() {
            if event.key == Key::Space {
                debug!("Space trigger");
                disposition = EventDisposition::PreventDefault;
                self.on_action(TriggerEvent::synthetic(event.shift));
            } else if let Some(direction) = event.key.drill_direction() {
                disposition = EventDisposition::PreventDefault;
                self.drill(direction);
            }
        }

        self.update_cursor_mode(event.shift);
        disposition
    }

    fn on_key_up(&mut self, event: KeyEvent) -> EventDisposition {
        if event.key == Key::Escape && self.is_enabled() {
            self.disable();
            debug!("User aborted");
        }

        self.update_cursor_mode(event.shift);
        EventDisposition::Proceed
    }
}

// ============================================================================
// Tests
// ============================================================================
