//! Input abstraction layer.
//!
//! Normalizes host pointer, wheel and keyboard events into a unified
//! `InputEvent` enum. Coordinates are relative to the canvas container.

/// Which button changed state, using DOM `MouseEvent.button` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl PointerButton {
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            n => Self::Other(n.clamp(0, u8::MAX as i16) as u8),
        }
    }
}

/// Buttons currently held, using DOM `MouseEvent.buttons` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons(pub u16);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const PRIMARY: Buttons = Buttons(1);
    pub const SECONDARY: Buttons = Buttons(2);
    pub const MIDDLE: Buttons = Buttons(4);

    pub fn primary(self) -> bool {
        self.0 & Self::PRIMARY.0 != 0
    }

    pub fn secondary(self) -> bool {
        self.0 & Self::SECONDARY.0 != 0
    }

    pub fn with(self, other: Buttons) -> Buttons {
        Buttons(self.0 | other.0)
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A button was pressed. `buttons` already includes it.
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        buttons: Buttons,
    },

    PointerMove {
        x: f32,
        y: f32,
        button: PointerButton,
        buttons: Buttons,
    },

    /// A button was released. `buttons` no longer includes it.
    PointerUp {
        x: f32,
        y: f32,
        button: PointerButton,
        buttons: Buttons,
    },

    /// Primary click, delivered by the host after the matching release.
    Click { x: f32, y: f32 },

    /// Wheel scroll; positive `delta_y` scrolls down.
    Wheel { x: f32, y: f32, delta_y: f32 },

    /// Keyboard shortcut.
    Key {
        key: String,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    },
}

impl InputEvent {
    pub fn press(x: f32, y: f32, button: PointerButton, buttons: Buttons) -> Self {
        Self::PointerDown {
            x,
            y,
            button,
            buttons,
        }
    }

    pub fn moved(x: f32, y: f32, buttons: Buttons) -> Self {
        Self::PointerMove {
            x,
            y,
            button: PointerButton::Primary,
            buttons,
        }
    }

    pub fn release(x: f32, y: f32, button: PointerButton, buttons: Buttons) -> Self {
        Self::PointerUp {
            x,
            y,
            button,
            buttons,
        }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        }
    }

    /// Extract position if this is a positioned event.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Click { x, y }
            | Self::Wheel { x, y, .. } => Some((*x, *y)),
            Self::Key { .. } => None,
        }
    }
}
