//! macroquad backend
//!
//! Images are decoded and resized with the `image` crate, then uploaded as
//! `Texture2D`s. Must only be constructed inside a running macroquad window
//! (see `crate::app::start`), since uploading textures needs a GL context.
//!
//! Native builds read image files straight from disk. WASM has no
//! filesystem, so the loop preloads the files listed in
//! `ASSET_MANIFEST` over HTTP before `setup` runs, and image loads are
//! served from those bytes.

use super::{AssetError, GraphicsBackend, ImageId};
use crate::color::Color;
use crate::input::{InputBackend, InputEvent, Key};
use crate::math::{Rect, Vec2};
use image::imageops::FilterType;
use ::macroquad::prelude as mq;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Asset list written next to the web build, one path per line
pub const ASSET_MANIFEST: &str = "assets/manifest.txt";

/// Draws straight to the macroquad screen
pub struct MacroquadGraphics {
    textures: Vec<mq::Texture2D>,
    /// Preloaded file contents, looked up before the filesystem
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MacroquadGraphics {
    pub fn new() -> Self {
        Self {
            textures: Vec::new(),
            files: HashMap::new(),
        }
    }

    /// Serve `path` from `bytes` instead of reading it from disk
    pub fn insert_file(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Fetch every file named in the manifest at `manifest_path`.
    /// Returns how many were loaded; a missing manifest loads nothing.
    pub async fn preload_manifest(&mut self, manifest_path: &str) -> usize {
        let manifest = match mq::load_string(manifest_path).await {
            Ok(m) => m,
            Err(_) => {
                log::debug!("no asset manifest at {}", manifest_path);
                return 0;
            }
        };

        let mut loaded = 0;
        for path in manifest_entries(&manifest) {
            let Some(name) = path.to_str() else { continue };
            match mq::load_file(name).await {
                Ok(bytes) => {
                    self.insert_file(path, bytes);
                    loaded += 1;
                }
                Err(e) => log::warn!("can't preload {}: {}", name, e),
            }
        }
        log::info!("preloaded {} assets", loaded);
        loaded
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        if let Some(bytes) = self.files.get(path) {
            return Ok(bytes.clone());
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(std::fs::read(path)?)
        }
        #[cfg(target_arch = "wasm32")]
        {
            Err(AssetError::NotFound(format!("{} (not preloaded)", path.display())))
        }
    }

    fn upload(&mut self, rgba: image::RgbaImage) -> Result<ImageId, AssetError> {
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 || width > u16::MAX as u32 || height > u16::MAX as u32 {
            return Err(AssetError::InvalidSize { width, height });
        }
        let texture = mq::Texture2D::from_rgba8(width as u16, height as u16, rgba.as_raw());
        texture.set_filter(mq::FilterMode::Linear);
        self.textures.push(texture);
        Ok(ImageId::new(self.textures.len() as u32 - 1))
    }
}

impl Default for MacroquadGraphics {
    fn default() -> Self {
        Self::new()
    }
}

/// Paths listed in a manifest. Blank lines and `#` comments are skipped.
pub fn manifest_entries(manifest: &str) -> Vec<PathBuf> {
    manifest
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}

/// Decode an encoded image (PNG, JPEG, BMP) into RGBA
pub fn decode(bytes: &[u8]) -> Result<image::RgbaImage, AssetError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Decode and scale to exactly `width` x `height`
pub fn decode_scaled(bytes: &[u8], width: u32, height: u32) -> Result<image::RgbaImage, AssetError> {
    if width == 0 || height == 0 {
        return Err(AssetError::InvalidSize { width, height });
    }
    let img = image::load_from_memory(bytes)?;
    Ok(img.resize_exact(width, height, FilterType::Triangle).to_rgba8())
}

impl GraphicsBackend for MacroquadGraphics {
    fn load_scaled_image(&mut self, path: &Path, width: u32, height: u32) -> Result<ImageId, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::InvalidSize { width, height });
        }
        let bytes = self.read_bytes(path)?;
        let scaled = decode_scaled(&bytes, width, height)?;
        self.upload(scaled)
    }

    fn load_image(&mut self, path: &Path) -> Result<ImageId, AssetError> {
        let bytes = self.read_bytes(path)?;
        let rgba = decode(&bytes)?;
        self.upload(rgba)
    }

    fn image_size(&self, image: ImageId) -> Option<(u32, u32)> {
        self.textures
            .get(image.index() as usize)
            .map(|t| (t.width() as u32, t.height() as u32))
    }

    fn fill_rect(&mut self, color: Color, rect: Rect) {
        mq::draw_rectangle(rect.x, rect.y, rect.w, rect.h, color.into());
    }

    fn blit(&mut self, image: ImageId, rect: Rect) {
        let Some(texture) = self.textures.get(image.index() as usize) else { return };
        mq::draw_texture_ex(
            texture,
            rect.x,
            rect.y,
            mq::WHITE,
            mq::DrawTextureParams {
                dest_size: Some(mq::vec2(rect.w, rect.h)),
                ..Default::default()
            },
        );
    }

    fn draw_circle(&mut self, color: Color, center: Vec2, radius: f32) {
        mq::draw_circle(center.x, center.y, radius, color.into());
    }

    fn draw_text(&mut self, text: &str, top_left: Vec2, size: f32, color: Color) {
        // macroquad anchors text at the baseline
        let dims = mq::measure_text(text, None, size as u16, 1.0);
        mq::draw_text(text, top_left.x, top_left.y + dims.offset_y, size, color.into());
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        mq::measure_text(text, None, size as u16, 1.0).width
    }

    /// macroquad flips buffers in `next_frame().await`, which the loop calls.
    fn present(&mut self) {}
}

/// Reads keyboard and mouse state from macroquad
pub struct MacroquadInput;

impl MacroquadInput {
    /// Takes over the window close button so it arrives as `InputEvent::Quit`.
    pub fn new() -> Self {
        mq::prevent_quit();
        Self
    }
}

impl Default for MacroquadInput {
    fn default() -> Self {
        Self::new()
    }
}

const MOUSE_BUTTONS: [mq::MouseButton; 3] = [
    mq::MouseButton::Left,
    mq::MouseButton::Right,
    mq::MouseButton::Middle,
];

impl InputBackend for MacroquadInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if mq::is_quit_requested() {
            events.push(InputEvent::Quit);
        }
        for code in mq::get_keys_pressed() {
            if let Some(key) = key_from_code(code) {
                events.push(InputEvent::KeyDown(key));
            }
        }
        if MOUSE_BUTTONS.iter().any(|b| mq::is_mouse_button_pressed(*b)) {
            let (x, y) = mq::mouse_position();
            events.push(InputEvent::MouseDown(Vec2::new(x, y)));
        }
        events
    }

    fn is_key_held(&self, key: Key) -> bool {
        mq::is_key_down(key_code(key))
    }
}

/// Map a runtime key to macroquad's key code
pub fn key_code(key: Key) -> mq::KeyCode {
    use mq::KeyCode as K;
    match key {
        Key::Left => K::Left,
        Key::Right => K::Right,
        Key::Up => K::Up,
        Key::Down => K::Down,
        Key::Space => K::Space,
        Key::Enter => K::Enter,
        Key::Escape => K::Escape,
        Key::Tab => K::Tab,
        Key::Backspace => K::Backspace,
        Key::LeftShift => K::LeftShift,
        Key::RightShift => K::RightShift,
        Key::LeftControl => K::LeftControl,
        Key::RightControl => K::RightControl,
        Key::A => K::A,
        Key::B => K::B,
        Key::C => K::C,
        Key::D => K::D,
        Key::E => K::E,
        Key::F => K::F,
        Key::G => K::G,
        Key::H => K::H,
        Key::I => K::I,
        Key::J => K::J,
        Key::K => K::K,
        Key::L => K::L,
        Key::M => K::M,
        Key::N => K::N,
        Key::O => K::O,
        Key::P => K::P,
        Key::Q => K::Q,
        Key::R => K::R,
        Key::S => K::S,
        Key::T => K::T,
        Key::U => K::U,
        Key::V => K::V,
        Key::W => K::W,
        Key::X => K::X,
        Key::Y => K::Y,
        Key::Z => K::Z,
        Key::Num0 => K::Key0,
        Key::Num1 => K::Key1,
        Key::Num2 => K::Key2,
        Key::Num3 => K::Key3,
        Key::Num4 => K::Key4,
        Key::Num5 => K::Key5,
        Key::Num6 => K::Key6,
        Key::Num7 => K::Key7,
        Key::Num8 => K::Key8,
        Key::Num9 => K::Key9,
    }
}

/// Reverse of `key_code`; `None` for keys the runtime doesn't model
pub fn key_from_code(code: mq::KeyCode) -> Option<Key> {
    Key::ALL.iter().copied().find(|k| key_code(*k) == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// 2x1 PNG: red then blue
    fn png_bytes() -> Vec<u8> {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_from_memory() {
        let img = decode(&png_bytes()).unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_decode_scaled_resizes_exactly() {
        let img = decode_scaled(&png_bytes(), 8, 4).unwrap();
        assert_eq!(img.dimensions(), (8, 4));
        // Left side stays red, right side stays blue
        let left = img.get_pixel(0, 0).0;
        let right = img.get_pixel(7, 3).0;
        assert!(left[0] > 200 && left[2] < 50, "{:?}", left);
        assert!(right[2] > 200 && right[0] < 50, "{:?}", right);
    }

    #[test]
    fn test_decode_rejects_garbage_and_zero_size() {
        assert!(matches!(decode(b"not an image"), Err(AssetError::Decode(_))));
        assert_eq!(
            decode_scaled(&png_bytes(), 0, 4),
            Err(AssetError::InvalidSize { width: 0, height: 4 })
        );
    }

    #[test]
    fn test_preloaded_bytes_win_over_disk() {
        let mut gfx = MacroquadGraphics::new();
        let path = Path::new("assets/does-not-exist.png");
        assert!(matches!(gfx.read_bytes(path), Err(AssetError::NotFound(_))));

        gfx.insert_file(path, png_bytes());
        let bytes = gfx.read_bytes(path).unwrap();
        assert_eq!(decode(&bytes).unwrap().dimensions(), (2, 1));
    }

    #[test]
    fn test_manifest_entries_skip_blanks_and_comments() {
        let manifest = "# sprites\nassets/ship.png\n\n  assets/rock.png  \n";
        assert_eq!(
            manifest_entries(manifest),
            vec![PathBuf::from("assets/ship.png"), PathBuf::from("assets/rock.png")]
        );
    }

    #[test]
    fn test_key_codes_roundtrip() {
        for key in Key::ALL {
            assert_eq!(key_from_code(key_code(key)), Some(key));
        }
        assert_eq!(key_from_code(mq::KeyCode::F12), None);
    }
}
