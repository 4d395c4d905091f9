//! Platform backends
//!
//! The runtime draws through `GraphicsBackend` and reads input through
//! `crate::input::InputBackend`. Two implementations ship with the crate:
//! - `macroquad`: a real window (native and WASM)
//! - `headless`: records draw calls and replays scripted input, for tests
//!   and tooling

pub mod headless;
pub mod macroquad;

pub use headless::{DrawCall, DrawLog, HeadlessGraphics, HeadlessInput, InputHandle};
pub use self::macroquad::{MacroquadGraphics, MacroquadInput};

use crate::color::Color;
use crate::math::{Rect, Vec2};
use std::fmt;
use std::path::Path;

/// Opaque handle to an image owned by a graphics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(u32);

impl ImageId {
    /// Should only be called by backends when they store a new image.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Error type for image loading
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    /// File missing or unreadable
    NotFound(String),
    /// File exists but isn't a decodable image
    Decode(String),
    /// Requested a zero-sized or oversized image
    InvalidSize { width: u32, height: u32 },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound(msg) => write!(f, "not found: {}", msg),
            AssetError::Decode(msg) => write!(f, "decode error: {}", msg),
            AssetError::InvalidSize { width, height } => {
                write!(f, "invalid image size {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::NotFound(e.to_string())
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => AssetError::from(io),
            other => AssetError::Decode(other.to_string()),
        }
    }
}

/// Drawing surface for one window
///
/// All coordinates are screen pixels. Text is anchored at its top-left
/// corner, like every other primitive.
pub trait GraphicsBackend {
    /// Decode an image and scale it to exactly `width` x `height`
    fn load_scaled_image(&mut self, path: &Path, width: u32, height: u32) -> Result<ImageId, AssetError>;

    /// Decode an image at its original size
    fn load_image(&mut self, path: &Path) -> Result<ImageId, AssetError>;

    /// Pixel size of a loaded image
    fn image_size(&self, image: ImageId) -> Option<(u32, u32)>;

    fn fill_rect(&mut self, color: Color, rect: Rect);

    /// Draw `image` stretched over `rect`
    fn blit(&mut self, image: ImageId, rect: Rect);

    fn draw_circle(&mut self, color: Color, center: Vec2, radius: f32);

    fn draw_text(&mut self, text: &str, top_left: Vec2, size: f32, color: Color);

    /// Rendered width of `text` at `size`, for centering
    fn text_width(&self, text: &str, size: f32) -> f32;

    /// The frame is complete
    fn present(&mut self);
}
