//! Platform-agnostic input event types.
//!
//! Every backend maps its native input (keyboard, mouse, game controller) to
//! these enums. The interpreter never sees raw platform input.

use serde::{Deserialize, Serialize};

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A d-pad / arrow / face button pressed.
    ButtonPress(Button),
    /// Shoulder button (or page key) pressed.
    ShoulderPress(Shoulder),
    /// Composed character from a physical keyboard.
    TextInput(char),
    /// Backspace / delete-left.
    Backspace,
    /// Primary pointer button pressed at absolute position (mouse or touch).
    PointerClick { x: i32, y: i32 },
    /// User requested quit (window close, etc.).
    Quit,
}

/// Buttons that map across keyboard and controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    /// Return key, controller A.
    Confirm,
    /// Escape key, controller B.
    Cancel,
    /// F1, controller Start.
    Start,
    /// F2, controller Back.
    Select,
}

impl Button {
    /// Navigation direction for d-pad buttons: `-1` for up/left, `+1` for
    /// down/right, `None` otherwise.
    pub fn direction(self) -> Option<i32> {
        match self {
            Self::Up | Self::Left => Some(-1),
            Self::Down | Self::Right => Some(1),
            _ => None,
        }
    }
}

/// Shoulder buttons, used for scene switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shoulder {
    Left,
    Right,
}

impl Shoulder {
    /// Scene step for this shoulder.
    pub fn direction(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}
