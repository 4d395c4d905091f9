//! pixelkit: a tiny single-screen arcade game runtime
//!
//! Rectangles with simple physics, callbacks for keys, clicks, overlaps
//! and per-frame hooks, and a game-over/restart cycle. Rendering and input
//! go through backend traits; macroquad provides the real window.
//!
//! ```no_run
//! use pixelkit::{GameConfig, Key, SpriteDesc};
//!
//! pixelkit::logging::init();
//! pixelkit::start(GameConfig::default(), |game| {
//!     game.on_start(|game| {
//!         let player = game.create_sprite(SpriteDesc::new(300.0, 400.0, 40.0, 40.0));
//!         game.attach_arrow_control(player, pixelkit::DEFAULT_CONTROL_SPEED, None);
//!     });
//!     game.on_key_pressed(Key::Escape, |game| game.game_over("Bye"));
//! })
//! .unwrap();
//! ```

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod backend;
pub mod color;
pub mod config;
pub mod game;
pub mod input;
pub mod logging;
pub mod math;

pub use app::start;
pub use color::Color;
pub use config::{ConfigError, GameConfig};
pub use game::{
    BackgroundMode, Bounds, FpsLimit, FrameOutcome, Game, ProjectileDesc, Sprite, SpriteDesc,
    SpriteId, DEFAULT_CONTROL_SPEED, DEFAULT_GRAVITY, DEFAULT_TEXT_SIZE,
};
pub use input::Key;
pub use math::{Rect, Vec2};
