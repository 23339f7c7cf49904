//! Juka core interpreter.
//!
//! Loads a JSON scene document and runs it as a kiosk UI: variable
//! substitution, focus navigation, the on-screen keyboard, button triggers,
//! and per-frame drawing through the backend traits. This crate has zero
//! platform dependencies.

// Re-exports from juka-types (foundation types and traits).
pub use juka_types::backend;
pub use juka_types::error;
pub use juka_types::input;

pub mod clock;
pub mod collapsed_list;
pub mod config;
pub mod document;
pub mod focus;
pub mod launcher;
pub mod layout;
pub mod osk;
pub mod render;
pub mod router;
pub mod session;
pub mod style;
pub mod substitute;
pub mod trigger;
pub mod variables;

#[cfg(test)]
pub(crate) mod test_utils;
