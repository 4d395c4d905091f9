//! Window background
//!
//! A solid color, or an image either stretched over the window or tiled
//! at its native size. Image failures fall back to the color.

use crate::backend::{GraphicsBackend, ImageId};
use crate::color::Color;
use crate::math::Rect;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a background image covers the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackgroundMode {
    /// Scaled once to the window size
    #[default]
    Stretch,
    /// Repeated at native size from the top-left corner
    Tile,
}

#[derive(Debug, Clone, Default)]
pub struct Background {
    path: Option<PathBuf>,
    color: Color,
    mode: BackgroundMode,
    /// Loaded image and its pixel size
    image: Option<(ImageId, u32, u32)>,
}

impl Background {
    pub fn color(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Configure and try to load the image for a window of `width` x `height`.
    pub fn set(
        &mut self,
        gfx: &mut dyn GraphicsBackend,
        path: Option<&Path>,
        color: Color,
        mode: BackgroundMode,
        (width, height): (u32, u32),
    ) {
        self.path = path.map(Path::to_path_buf);
        self.color = color;
        self.mode = mode;
        self.image = None;

        let Some(path) = path else { return };
        let loaded = match mode {
            BackgroundMode::Stretch => gfx
                .load_scaled_image(path, width, height)
                .map(|id| (id, width, height)),
            BackgroundMode::Tile => gfx.load_image(path).map(|id| {
                let (w, h) = gfx.image_size(id).unwrap_or((width, height));
                (id, w, h)
            }),
        };
        match loaded {
            Ok(image) => self.image = Some(image),
            Err(e) => log::warn!(
                "can't load background {}: {}; using a solid color instead",
                path.display(),
                e
            ),
        }
    }

    pub fn fill_color(&self) -> Color {
        self.color
    }

    pub fn mode(&self) -> BackgroundMode {
        self.mode
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn draw(&self, gfx: &mut dyn GraphicsBackend, (width, height): (u32, u32)) {
        let Some((id, iw, ih)) = self.image else {
            gfx.fill_rect(self.color, Rect::screen(width as f32, height as f32));
            return;
        };
        match self.mode {
            BackgroundMode::Stretch => {
                gfx.blit(id, Rect::screen(width as f32, height as f32));
            }
            BackgroundMode::Tile => {
                if iw == 0 || ih == 0 {
                    return;
                }
                for y in (0..height).step_by(ih as usize) {
                    for x in (0..width).step_by(iw as usize) {
                        gfx.blit(id, Rect::new(x as f32, y as f32, iw as f32, ih as f32));
                    }
                }
            }
        }
    }
}
