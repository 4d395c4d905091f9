//! One-shot draw commands
//!
//! Circles and text queued by game scripts during a frame. They are drawn
//! after the sprites and dropped once the frame is presented, so a script
//! that wants something on screen re-issues it every frame.

use crate::color::Color;
use crate::math::Vec2;

/// Text size used when a script doesn't pick one
pub const DEFAULT_TEXT_SIZE: f32 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CircleCommand {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub text: String,
    /// Top-left corner
    pub position: Vec2,
    pub size: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    pub circles: Vec<CircleCommand>,
    pub texts: Vec<TextCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.circles.push(CircleCommand { center, radius, color });
    }

    pub fn text(&mut self, text: impl Into<String>, position: Vec2, size: f32, color: Color) {
        self.texts.push(TextCommand {
            text: text.into(),
            position,
            size,
            color,
        });
    }

    pub fn clear(&mut self) {
        self.circles.clear();
        self.texts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty() && self.texts.is_empty()
    }
}
