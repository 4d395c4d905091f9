//! Frame Renderer
//!
//! Draws one frame through a `GraphicsBackend`. Two layouts:
//! - Playing: background, sprites in draw order, circles, text, present
//! - Game over: background, centered message and restart prompt, present
//!
//! Sprites marked dead but not yet reaped are still drawn; they disappear
//! once the next physics step reaps them.

use super::background::Background;
use super::commands::CommandBuffer;
use super::sprite::Visual;
use super::world::World;
use crate::backend::GraphicsBackend;
use crate::color::Color;
use crate::input::Key;
use crate::math::Vec2;

/// Game-over message style
pub const GAME_OVER_TEXT_SIZE: f32 = 64.0;
pub const GAME_OVER_COLOR: Color = Color::rgb(255, 50, 50);

/// Restart prompt style
pub const PROMPT_TEXT_SIZE: f32 = 32.0;
pub const PROMPT_COLOR: Color = Color::rgb(200, 200, 200);

/// Draw a playing frame and present it.
pub fn draw_frame(
    gfx: &mut dyn GraphicsBackend,
    background: &Background,
    world: &World,
    commands: &CommandBuffer,
    size: (u32, u32),
) {
    background.draw(gfx, size);

    for (_, sprite) in world.iter() {
        match sprite.visual {
            Visual::Image(image) => gfx.blit(image, sprite.rect),
            Visual::Fill(color) => gfx.fill_rect(color, sprite.rect),
        }
    }

    for circle in &commands.circles {
        gfx.draw_circle(circle.color, circle.center, circle.radius);
    }
    for text in &commands.texts {
        gfx.draw_text(&text.text, text.position, text.size, text.color);
    }

    gfx.present();
}

/// Text shown under the game-over message
pub fn restart_prompt(restart_key: Key) -> String {
    format!("Press {} to Restart", restart_key.label())
}

/// Draw the game-over overlay and present it.
pub fn draw_game_over(
    gfx: &mut dyn GraphicsBackend,
    background: &Background,
    message: &str,
    restart_key: Key,
    (width, height): (u32, u32),
) {
    background.draw(gfx, (width, height));

    let (w, h) = (width as f32, height as f32);
    draw_centered(gfx, message, h / 2.0 - 80.0, w, GAME_OVER_TEXT_SIZE, GAME_OVER_COLOR);

    let prompt = restart_prompt(restart_key);
    draw_centered(gfx, &prompt, h / 2.0 + 10.0, w, PROMPT_TEXT_SIZE, PROMPT_COLOR);

    gfx.present();
}

fn draw_centered(
    gfx: &mut dyn GraphicsBackend,
    text: &str,
    top: f32,
    width: f32,
    size: f32,
    color: Color,
) {
    let x = (width - gfx.text_width(text, size)) / 2.0;
    gfx.draw_text(text, Vec2::new(x, top), size, color);
}
