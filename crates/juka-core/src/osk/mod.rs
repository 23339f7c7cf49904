//! On-screen keyboard for editing input elements without a physical keyboard.

mod keyboard;

pub use keyboard::{Key, OnScreenKeyboard, OskLayout, OskState, ROWS};
