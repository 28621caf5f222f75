//! Input model: modifier keys, mouse buttons, wheel deltas, and the gesture state machine.
//!
//! `Modifiers` and `Button` capture the user's intent at the time of a
//! pointer event. `Gesture` is the interaction tracked between pointer-down
//! and pointer-up; the heavy per-gesture state (snapshots, anchors) lives in
//! the component that owns it, so the variants here only say who is in
//! charge.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Deserialize;

use crate::hit::Handle;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Modifiers {
    /// Shift key is held.
    #[serde(alias = "shiftKey")]
    pub shift: bool,
    /// Ctrl key is held.
    #[serde(alias = "ctrlKey")]
    pub ctrl: bool,
    /// Alt / Option key is held.
    #[serde(alias = "altKey")]
    pub alt: bool,
    /// Meta / Command key is held.
    #[serde(alias = "metaKey")]
    pub meta: bool,
}

impl Modifiers {
    #[must_use]
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    #[must_use]
    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// The gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Viewport pan, via the middle button or Space + drag.
    Panning,
    /// Selected layers follow the pointer.
    Dragging,
    /// A resize handle is being dragged.
    Resizing(Handle),
    /// The rotate handle is being dragged.
    Rotating,
    /// Rubber-band selection over empty canvas.
    Marquee,
}

impl Gesture {
    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}
