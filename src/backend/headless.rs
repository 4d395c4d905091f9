//! Headless backend
//!
//! `HeadlessGraphics` records every draw call instead of rasterizing and
//! pretends a configurable set of image files exist. `HeadlessInput` replays
//! events and held keys pushed through an `InputHandle`. Both hand out cheap
//! shared handles so a test can keep inspecting them after the backend has
//! been moved into a `Game`.

use super::{AssetError, GraphicsBackend, ImageId};
use crate::color::Color;
use crate::input::{InputBackend, InputEvent, Key};
use crate::math::{Rect, Vec2};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    FillRect { color: Color, rect: Rect },
    Blit { image: ImageId, rect: Rect },
    Circle { color: Color, center: Vec2, radius: f32 },
    Text { text: String, top_left: Vec2, size: f32, color: Color },
    Present,
}

#[derive(Debug, Default)]
struct Recording {
    calls: Vec<DrawCall>,
    /// Number of successful decodes
    decodes: usize,
}

/// Shared view of what a `HeadlessGraphics` has drawn
#[derive(Debug, Clone, Default)]
pub struct DrawLog {
    inner: Rc<RefCell<Recording>>,
}

impl DrawLog {
    /// Copy of every call recorded so far
    pub fn calls(&self) -> Vec<DrawCall> {
        self.inner.borrow().calls.clone()
    }

    /// Drain recorded calls
    pub fn take(&self) -> Vec<DrawCall> {
        std::mem::take(&mut self.inner.borrow_mut().calls)
    }

    /// How many images were actually decoded (cache misses)
    pub fn decodes(&self) -> usize {
        self.inner.borrow().decodes
    }

    /// Number of presented frames still in the log
    pub fn presents(&self) -> usize {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Present))
            .count()
    }
}

/// Graphics backend that records instead of drawing
#[derive(Debug, Default)]
pub struct HeadlessGraphics {
    log: DrawLog,
    /// Files that "exist", with their native size
    files: HashMap<PathBuf, (u32, u32)>,
    /// Size of every loaded image, indexed by `ImageId`
    images: Vec<(u32, u32)>,
}

impl HeadlessGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend an image file of the given native size exists at `path`
    pub fn with_image(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        self.files.insert(path.into(), (width, height));
        self
    }

    /// Handle for inspecting draw calls later
    pub fn log(&self) -> DrawLog {
        self.log.clone()
    }

    fn store(&mut self, size: (u32, u32)) -> ImageId {
        self.images.push(size);
        self.log.inner.borrow_mut().decodes += 1;
        ImageId::new(self.images.len() as u32 - 1)
    }

    fn record(&mut self, call: DrawCall) {
        self.log.inner.borrow_mut().calls.push(call);
    }
}

impl GraphicsBackend for HeadlessGraphics {
    fn load_scaled_image(&mut self, path: &Path, width: u32, height: u32) -> Result<ImageId, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::InvalidSize { width, height });
        }
        if !self.files.contains_key(path) {
            return Err(AssetError::NotFound(path.display().to_string()));
        }
        Ok(self.store((width, height)))
    }

    fn load_image(&mut self, path: &Path) -> Result<ImageId, AssetError> {
        let size = self
            .files
            .get(path)
            .copied()
            .ok_or_else(|| AssetError::NotFound(path.display().to_string()))?;
        Ok(self.store(size))
    }

    fn image_size(&self, image: ImageId) -> Option<(u32, u32)> {
        self.images.get(image.index() as usize).copied()
    }

    fn fill_rect(&mut self, color: Color, rect: Rect) {
        self.record(DrawCall::FillRect { color, rect });
    }

    fn blit(&mut self, image: ImageId, rect: Rect) {
        self.record(DrawCall::Blit { image, rect });
    }

    fn draw_circle(&mut self, color: Color, center: Vec2, radius: f32) {
        self.record(DrawCall::Circle { color, center, radius });
    }

    fn draw_text(&mut self, text: &str, top_left: Vec2, size: f32, color: Color) {
        self.record(DrawCall::Text {
            text: text.to_string(),
            top_left,
            size,
            color,
        });
    }

    /// Fixed-advance font: every glyph is half as wide as the font size.
    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    fn present(&mut self) {
        self.record(DrawCall::Present);
    }
}

#[derive(Debug, Default)]
struct Script {
    pending: VecDeque<InputEvent>,
    held: HashSet<Key>,
}

/// Handle for feeding a `HeadlessInput`
#[derive(Debug, Clone, Default)]
pub struct InputHandle {
    inner: Rc<RefCell<Script>>,
}

impl InputHandle {
    /// Queue a raw event for the next poll
    pub fn push(&self, event: InputEvent) {
        self.inner.borrow_mut().pending.push_back(event);
    }

    /// Key goes down: queues a `KeyDown` and marks it held
    pub fn press(&self, key: Key) {
        let mut script = self.inner.borrow_mut();
        script.pending.push_back(InputEvent::KeyDown(key));
        script.held.insert(key);
    }

    /// Mark a key held without generating an event
    pub fn hold(&self, key: Key) {
        self.inner.borrow_mut().held.insert(key);
    }

    pub fn release(&self, key: Key) {
        self.inner.borrow_mut().held.remove(&key);
    }

    pub fn click(&self, x: f32, y: f32) {
        self.push(InputEvent::MouseDown(Vec2::new(x, y)));
    }

    pub fn quit(&self) {
        self.push(InputEvent::Quit);
    }
}

/// Input backend driven by an `InputHandle`
#[derive(Debug, Default)]
pub struct HeadlessInput {
    script: InputHandle,
}

impl HeadlessInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> InputHandle {
        self.script.clone()
    }
}

impl InputBackend for HeadlessInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.script.inner.borrow_mut().pending.drain(..).collect()
    }

    fn is_key_held(&self, key: Key) -> bool {
        self.script.inner.borrow().held.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let mut gfx = HeadlessGraphics::new();
        let err = gfx.load_scaled_image(Path::new("nope.png"), 8, 8).unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
        assert_eq!(gfx.log().decodes(), 0);
    }

    #[test]
    fn test_scaled_load_reports_requested_size() {
        let mut gfx = HeadlessGraphics::new().with_image("ship.png", 64, 64);
        let id = gfx.load_scaled_image(Path::new("ship.png"), 40, 20).unwrap();
        assert_eq!(gfx.image_size(id), Some((40, 20)));
        let raw = gfx.load_image(Path::new("ship.png")).unwrap();
        assert_eq!(gfx.image_size(raw), Some((64, 64)));
        assert_ne!(id, raw);
    }

    #[test]
    fn test_input_script() {
        let mut input = HeadlessInput::new();
        let handle = input.handle();
        handle.press(Key::Space);
        handle.click(3.0, 4.0);

        let events = input.poll_events();
        assert_eq!(
            events,
            vec![InputEvent::KeyDown(Key::Space), InputEvent::MouseDown(Vec2::new(3.0, 4.0))]
        );
        assert!(input.poll_events().is_empty());
        assert!(input.is_key_held(Key::Space));

        handle.release(Key::Space);
        assert!(!input.is_key_held(Key::Space));
    }
}
