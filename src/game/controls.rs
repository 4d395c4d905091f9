//! Arrow-key movement and projectiles
//!
//! Helpers built purely on the public registry: arrow control is an
//! ordinary pre-physics update listener, and a projectile is an ordinary
//! sprite with a velocity and a lifetime.

use super::entity::SpriteId;
use super::runtime::Game;
use super::sprite::SpriteDesc;
use crate::color::Color;
use crate::input::Key;
use crate::math::{clamp_span, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pixels per second when a script has no preference
pub const DEFAULT_CONTROL_SPEED: f32 = 200.0;

/// Region a controlled sprite must stay fully inside, as corner coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Bounds {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Bounds covering a whole window
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Move `rect` back inside, each axis on its own.
    pub fn clamp(&self, rect: &mut Rect) {
        rect.x = clamp_span(rect.x, rect.w, self.x0, self.x1);
        rect.y = clamp_span(rect.y, rect.h, self.y0, self.y1);
    }
}

/// Displacement for this frame from the arrow keys that are down.
/// Diagonals are the plain sum of both axes.
pub fn arrow_displacement(held: impl Fn(Key) -> bool, speed: f32, dt: f32) -> Vec2 {
    let step = speed * dt;
    let mut delta = Vec2::ZERO;
    if held(Key::Left) {
        delta.x -= step;
    }
    if held(Key::Right) {
        delta.x += step;
    }
    if held(Key::Up) {
        delta.y -= step;
    }
    if held(Key::Down) {
        delta.y += step;
    }
    delta
}

/// Parameters for `Game::projectile_from`.
///
/// Defaults: 8x8 yellow, gone after two seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileDesc {
    pub image: Option<PathBuf>,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub lifetime: Option<f32>,
}

impl Default for ProjectileDesc {
    fn default() -> Self {
        Self {
            image: None,
            width: 8.0,
            height: 8.0,
            color: Color::YELLOW,
            lifetime: Some(2.0),
        }
    }
}

impl ProjectileDesc {
    pub fn image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// `None` keeps the projectile until something destroys it
    pub fn lifetime(mut self, seconds: Option<f32>) -> Self {
        self.lifetime = seconds;
        self
    }
}

impl Game {
    /// Move `id` with the arrow keys at `speed` px/s, optionally kept inside
    /// `bounds`. The speed lives on the sprite (`Sprite::control_speed`) and
    /// can be changed later. Does nothing once the sprite is gone.
    pub fn attach_arrow_control(&mut self, id: SpriteId, speed: f32, bounds: Option<Bounds>) {
        if let Some(sprite) = self.world.get_mut(id) {
            sprite.control_speed = speed;
        }

        self.on_update(move |game, dt| {
            let Some(sprite) = game.world.get(id).filter(|s| s.is_alive()) else {
                return;
            };
            let input = &game.input;
            let delta = arrow_displacement(|key| input.is_key_held(key), sprite.control_speed, dt);

            if let Some(sprite) = game.world.get_mut(id) {
                sprite.rect.translate(delta);
                if let Some(bounds) = bounds {
                    bounds.clamp(&mut sprite.rect);
                }
            }
        });
    }

    /// Spawn a projectile centered on `source` moving at `(vx, vy)`.
    /// Returns None when `source` is no longer alive.
    pub fn projectile_from(
        &mut self,
        source: SpriteId,
        vx: f32,
        vy: f32,
        desc: ProjectileDesc,
    ) -> Option<SpriteId> {
        let center = self.world.get(source).filter(|s| s.is_alive())?.center();

        let mut sprite = SpriteDesc::new(
            center.x - desc.width / 2.0,
            center.y - desc.height / 2.0,
            desc.width,
            desc.height,
        )
        .color(desc.color)
        .velocity(vx, vy);
        sprite.image = desc.image;
        sprite.lifetime = desc.lifetime;

        Some(self.create_sprite(sprite))
    }
}
