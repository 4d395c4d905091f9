//! Input contract
//!
//! The runtime never talks to a windowing library directly. Each frame it
//! drains discrete events from an `InputBackend` and queries held keys
//! through it. Backends live in `crate::backend`.

mod keys;

pub use keys::{Key, KeyParseError};

use crate::math::Vec2;

/// A discrete input event delivered once
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Window close requested
    Quit,
    /// A key went down this frame
    KeyDown(Key),
    /// A mouse button went down at this screen position
    MouseDown(Vec2),
}

/// Source of input for the runtime
pub trait InputBackend {
    /// Drain every event that arrived since the previous call, oldest first
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Is `key` currently held down?
    fn is_key_held(&self, key: Key) -> bool;
}
