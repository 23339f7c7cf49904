//! Foundation types and traits for the Juka kiosk player.
//!
//! This crate contains the platform-agnostic types shared by every Juka
//! crate: colors and geometry, input events, the render/measure/input backend
//! traits, and the error type.

pub mod backend;
pub mod error;
pub mod input;
