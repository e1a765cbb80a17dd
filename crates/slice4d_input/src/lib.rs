//! Keyboard input for slice4d
//!
//! This crate maps `winit` key codes onto the core's [`GameCommand`]
//! vocabulary. The core never sees a key; hosts feed key events through
//! [`KeyBindings`] and forward whatever comes out.

mod key_bindings;

pub use key_bindings::{key_from_name, InputAction, KeyBindings};
