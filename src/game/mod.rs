//! Game Runtime Module
//!
//! A small real-time 2D sprite runtime: rectangles with simple physics,
//! listener lists for input and per-frame hooks, overlap callbacks, and a
//! game-over/restart cycle, all owned by one `Game` value.
//!
//! Key concepts:
//! - SpriteId: generational handle; stale handles resolve to nothing
//! - World: sprite arena with draw order, platforms and deferred removal
//! - EventRegistry: listener lists keyed by trigger, in registration order
//! - Game: runtime context passed to every callback as `&mut Game`
//!
//! Timing is variable-step: every physics formula is scaled by `dt`.

pub mod assets;
pub mod background;
pub mod commands;
pub mod controls;
pub mod entity;
pub mod event;
pub mod overlap;
pub mod physics;
pub mod renderer;
pub mod runtime;
pub mod slots;
pub mod sprite;
pub mod state;
pub mod world;

// Re-export main types
pub use background::BackgroundMode;
pub use commands::DEFAULT_TEXT_SIZE;
pub use controls::{Bounds, ProjectileDesc, DEFAULT_CONTROL_SPEED};
pub use entity::SpriteId;
pub use event::EventRegistry;
pub use runtime::{FpsLimit, FrameOutcome, Game, DEFAULT_GRAVITY};
pub use sprite::{Sprite, SpriteDesc, Visual};
pub use state::{GamePhase, GameState};
pub use world::World;
