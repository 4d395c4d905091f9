//! Sprites
//!
//! A sprite is a rectangle with a look (image or flat color) and a handful
//! of opt-in behaviors the physics step understands: velocity, follow,
//! edge bounce, gravity, and a lifetime.

use super::entity::SpriteId;
use crate::backend::ImageId;
use crate::color::Color;
use crate::math::{Rect, Vec2};
use std::path::PathBuf;

/// How a sprite is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visual {
    /// Pre-scaled image from the image cache
    Image(ImageId),
    /// Solid rectangle
    Fill(Color),
}

/// Steering toward another sprite's center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Follow {
    pub target: SpriteId,
    /// Pixels per second
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub visual: Visual,
    /// Position and size; moved by physics every frame
    pub rect: Rect,
    /// Pixels per second
    pub velocity: Vec2,
    /// Seconds to live, counted from creation
    pub lifetime: Option<f32>,
    pub follow: Option<Follow>,
    /// Reflect off the window edges
    pub bounce: bool,
    /// Downward acceleration in px/s², when gravity is enabled
    pub gravity: Option<f32>,
    /// Landed on a platform this frame (gravity sprites only)
    pub on_ground: bool,
    /// Speed used by arrow-key control, in px/s
    pub control_speed: f32,
    age: f32,
    alive: bool,
}

impl Sprite {
    pub fn new(visual: Visual, rect: Rect) -> Self {
        Self {
            visual,
            rect,
            velocity: Vec2::ZERO,
            lifetime: None,
            follow: None,
            bounce: false,
            gravity: None,
            on_ground: false,
            control_speed: 0.0,
            age: 0.0,
            alive: true,
        }
    }

    /// Seconds since creation
    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark for removal. The sprite is reaped at the start of the next
    /// physics step and may still be drawn once before that.
    pub fn destroy(&mut self) {
        self.alive = false;
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.velocity = Vec2::new(vx, vy);
    }

    pub fn follow(&mut self, target: SpriteId, speed: f32) {
        self.follow = Some(Follow { target, speed });
    }

    pub fn set_bounce(&mut self, enable: bool) {
        self.bounce = enable;
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Advance age by `dt`; expire once the lifetime is used up.
    pub(crate) fn tick_age(&mut self, dt: f32) {
        self.age += dt;
        if let Some(lifetime) = self.lifetime {
            if self.age >= lifetime {
                self.alive = false;
            }
        }
    }
}

/// Parameters for `Game::create_sprite`.
///
/// Defaults: 50x50 at (100, 100), blue, not moving, immortal, no image.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDesc {
    pub image: Option<PathBuf>,
    pub rect: Rect,
    /// Fill color, also the fallback when the image fails to load
    pub color: Color,
    pub velocity: Vec2,
    pub lifetime: Option<f32>,
}

impl Default for SpriteDesc {
    fn default() -> Self {
        Self {
            image: None,
            rect: Rect::new(100.0, 100.0, 50.0, 50.0),
            color: Color::BLUE,
            velocity: Vec2::ZERO,
            lifetime: None,
        }
    }
}

impl SpriteDesc {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            ..Default::default()
        }
    }

    pub fn image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn velocity(mut self, vx: f32, vy: f32) -> Self {
        self.velocity = Vec2::new(vx, vy);
        self
    }

    pub fn lifetime(mut self, seconds: f32) -> Self {
        self.lifetime = Some(seconds);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_expiry() {
        let mut s = Sprite::new(Visual::Fill(Color::WHITE), Rect::new(0.0, 0.0, 1.0, 1.0));
        s.lifetime = Some(1.0);
        s.tick_age(0.5);
        assert!(s.is_alive());
        s.tick_age(0.5);
        assert!(!s.is_alive());
        assert_eq!(s.age(), 1.0);
    }

    #[test]
    fn test_no_lifetime_never_expires() {
        let mut s = Sprite::new(Visual::Fill(Color::WHITE), Rect::default());
        for _ in 0..1000 {
            s.tick_age(1.0);
        }
        assert!(s.is_alive());
    }

    #[test]
    fn test_desc_defaults() {
        let d = SpriteDesc::default();
        assert_eq!(d.rect, Rect::new(100.0, 100.0, 50.0, 50.0));
        assert_eq!(d.color, Color::rgb(0, 0, 255));
        assert_eq!(d.velocity, Vec2::ZERO);
        assert!(d.lifetime.is_none());

        let d = SpriteDesc::new(1.0, 2.0, 3.0, 4.0).velocity(5.0, 6.0).lifetime(2.0).color((1, 2, 3));
        assert_eq!(d.velocity, Vec2::new(5.0, 6.0));
        assert_eq!(d.lifetime, Some(2.0));
        assert_eq!(d.color, Color::rgb(1, 2, 3));
    }
}
