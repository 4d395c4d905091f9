//! Game Runtime
//!
//! `Game` is the whole runtime context: sprites, listeners, game-over state,
//! per-frame draw commands, background, image cache and both backends.
//! Game scripts get `&mut Game` in every callback.
//!
//! `Game::frame` runs exactly one loop iteration:
//! 1. Drain input: quit, restart (from game over), key presses, clicks
//! 2. Game over: draw the overlay and stop here
//! 3. Held-key listeners
//! 4. Update listeners (pre-physics, with `dt`)
//! 5. Physics step, then overlap notifier
//! 6. Late-update listeners (post-physics)
//! 7. Draw the frame and drop the one-shot draw commands

use super::assets::ImageCache;
use super::background::{Background, BackgroundMode};
use super::commands::{CommandBuffer, DEFAULT_TEXT_SIZE};
use super::entity::SpriteId;
use super::event::{restore, EventRegistry, OverlapTriple};
use super::sprite::{Sprite, SpriteDesc, Visual};
use super::state::GameState;
use super::world::World;
use super::{overlap, physics, renderer};
use crate::backend::GraphicsBackend;
use crate::color::Color;
use crate::config::GameConfig;
use crate::input::{InputBackend, InputEvent, Key};
use crate::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Downward acceleration for `enable_gravity`, in px/s²
pub const DEFAULT_GRAVITY: f32 = 800.0;

/// FPS limit setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FpsLimit {
    /// 30 FPS
    Fps30,
    /// 60 FPS
    #[default]
    Fps60,
    /// Unlocked (as fast as possible)
    Unlocked,
}

impl FpsLimit {
    /// Get the target frame time in seconds (None = unlocked)
    pub fn frame_time(&self) -> Option<f64> {
        match self {
            FpsLimit::Fps30 => Some(1.0 / 30.0),
            FpsLimit::Fps60 => Some(1.0 / 60.0),
            FpsLimit::Unlocked => None,
        }
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            FpsLimit::Fps30 => "30",
            FpsLimit::Fps60 => "60",
            FpsLimit::Unlocked => "unlocked",
        }
    }
}

/// What the loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Result of draining input at the top of a frame
enum InputStep {
    Continue,
    Restarted,
    Quit,
}

pub struct Game {
    pub(crate) config: GameConfig,
    pub(crate) world: World,
    pub(crate) events: EventRegistry,
    pub(crate) state: GameState,
    pub(crate) commands: CommandBuffer,
    pub(crate) background: Background,
    pub(crate) images: ImageCache,
    pub(crate) gfx: Box<dyn GraphicsBackend>,
    pub(crate) input: Box<dyn InputBackend>,
    launched: bool,
}

impl Game {
    pub fn new(
        config: GameConfig,
        gfx: Box<dyn GraphicsBackend>,
        input: Box<dyn InputBackend>,
    ) -> Self {
        Self {
            config,
            world: World::new(),
            events: EventRegistry::new(),
            state: GameState::new(),
            commands: CommandBuffer::new(),
            background: Background::default(),
            images: ImageCache::new(),
            gfx,
            input,
            launched: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Window size in pixels
    pub fn screen_size(&self) -> (f32, f32) {
        (self.config.width as f32, self.config.height as f32)
    }

    fn window_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Run the on-start listeners for the first time. Later calls do nothing.
    pub fn launch(&mut self) {
        if self.launched {
            return;
        }
        self.launched = true;
        self.run_on_start();
    }

    /// Run one loop iteration with `dt` seconds since the previous one.
    pub fn frame(&mut self, dt: f32) -> FrameOutcome {
        if !self.launched {
            self.launch();
        }

        match self.drain_input() {
            InputStep::Quit => return FrameOutcome::Quit,
            InputStep::Restarted => {
                self.render();
                return FrameOutcome::Continue;
            }
            InputStep::Continue => {}
        }

        if self.state.is_game_over() {
            let size = self.window_size();
            renderer::draw_game_over(
                self.gfx.as_mut(),
                &self.background,
                self.state.message(),
                self.config.restart_key,
                size,
            );
            return FrameOutcome::Continue;
        }

        self.dispatch_held_keys();
        self.dispatch_update(dt);

        let screen = Rect::screen(self.config.width as f32, self.config.height as f32);
        physics::step(&mut self.world, dt, screen);
        overlap::notify(self);

        self.dispatch_late_update();
        self.render();
        FrameOutcome::Continue
    }

    fn drain_input(&mut self) -> InputStep {
        for event in self.input.poll_events() {
            match event {
                InputEvent::Quit => {
                    log::info!("quit requested");
                    return InputStep::Quit;
                }
                InputEvent::KeyDown(key) if self.state.is_game_over() => {
                    if key == self.config.restart_key && self.restart() {
                        // Anything else queued this frame belonged to the old round
                        return InputStep::Restarted;
                    }
                }
                InputEvent::KeyDown(key) => self.dispatch_key_pressed(key),
                InputEvent::MouseDown(pos) if self.state.is_running() => self.dispatch_click(pos),
                InputEvent::MouseDown(_) => {}
            }
        }
        InputStep::Continue
    }

    /// GameOver -> Running: wipe sprites and draw commands, then re-run
    /// the on-start listeners. Registrations are kept.
    fn restart(&mut self) -> bool {
        if !self.state.restart() {
            return false;
        }
        log::info!("restarting");
        self.world.clear();
        self.commands.clear();
        self.run_on_start();
        true
    }

    fn render(&mut self) {
        let size = self.window_size();
        renderer::draw_frame(
            self.gfx.as_mut(),
            &self.background,
            &self.world,
            &self.commands,
            size,
        );
        self.commands.clear();
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn run_on_start(&mut self) {
        let mut handlers = std::mem::take(&mut self.events.on_start);
        for handler in handlers.iter_mut() {
            handler(self);
        }
        restore(&mut self.events.on_start, handlers);
    }

    fn dispatch_held_keys(&mut self) {
        let mut map = self.events.key_held.take();
        for (key, handlers) in map.iter_mut() {
            if !self.input.is_key_held(key) {
                continue;
            }
            for handler in handlers.iter_mut() {
                handler(self);
            }
        }
        self.events.key_held.restore(map);
    }

    fn dispatch_key_pressed(&mut self, pressed: Key) {
        let mut map = self.events.key_pressed.take();
        for (key, handlers) in map.iter_mut() {
            if key != pressed {
                continue;
            }
            for handler in handlers.iter_mut() {
                handler(self);
            }
        }
        self.events.key_pressed.restore(map);
    }

    fn dispatch_click(&mut self, pos: Vec2) {
        let mut map = self.events.clicks.take();
        for (id, handlers) in map.iter_mut() {
            let hit = self
                .world
                .get(id)
                .is_some_and(|s| s.is_alive() && s.rect.contains_point(pos));
            if !hit {
                continue;
            }
            for handler in handlers.iter_mut() {
                handler(self);
            }
        }
        self.events.clicks.restore(map);
    }

    fn dispatch_update(&mut self, dt: f32) {
        let mut handlers = std::mem::take(&mut self.events.update);
        for handler in handlers.iter_mut() {
            handler(self, dt);
        }
        restore(&mut self.events.update, handlers);
    }

    fn dispatch_late_update(&mut self) {
        let mut handlers = std::mem::take(&mut self.events.late_update);
        for handler in handlers.iter_mut() {
            handler(self);
        }
        restore(&mut self.events.late_update, handlers);
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Run at launch and after every restart
    pub fn on_start(&mut self, f: impl FnMut(&mut Game) + 'static) {
        self.events.on_start.push(Box::new(f));
    }

    /// Run every frame while `key` is down
    pub fn on_key_held(&mut self, key: Key, f: impl FnMut(&mut Game) + 'static) {
        self.events.key_held.push(key, Box::new(f));
    }

    /// Run once each time `key` goes down
    pub fn on_key_pressed(&mut self, key: Key, f: impl FnMut(&mut Game) + 'static) {
        self.events.key_pressed.push(key, Box::new(f));
    }

    /// Run when a mouse button goes down inside `sprite`
    pub fn on_click(&mut self, sprite: SpriteId, f: impl FnMut(&mut Game) + 'static) {
        self.events.clicks.push(sprite, Box::new(f));
    }

    /// Run every frame before physics, with the frame's `dt` in seconds
    pub fn on_update(&mut self, f: impl FnMut(&mut Game, f32) + 'static) {
        self.events.update.push(Box::new(f));
    }

    /// Run every frame after physics and overlap checks
    pub fn on_late_update(&mut self, f: impl FnMut(&mut Game) + 'static) {
        self.events.late_update.push(Box::new(f));
    }

    /// Run every frame that `a` and `b` overlap
    pub fn on_overlap(
        &mut self,
        a: SpriteId,
        b: SpriteId,
        f: impl FnMut(&mut Game, SpriteId, SpriteId) + 'static,
    ) {
        self.events.overlaps.push(OverlapTriple {
            a,
            b,
            handler: Box::new(f),
        });
    }

    // ========================================================================
    // Sprites
    // ========================================================================

    /// Add a sprite on top of the draw order. An image that fails to load
    /// is logged and replaced by a rectangle filled with `desc.color`.
    pub fn create_sprite(&mut self, desc: SpriteDesc) -> SpriteId {
        let visual = match &desc.image {
            Some(path) => {
                let (w, h) = (desc.rect.w.round() as u32, desc.rect.h.round() as u32);
                match self.images.get_or_load(self.gfx.as_mut(), path, w, h) {
                    Ok(image) => Visual::Image(image),
                    Err(e) => {
                        log::warn!(
                            "can't load sprite image {}: {}; drawing a filled rectangle instead",
                            path.display(),
                            e
                        );
                        Visual::Fill(desc.color)
                    }
                }
            }
            None => Visual::Fill(desc.color),
        };

        let mut sprite = Sprite::new(visual, desc.rect);
        sprite.velocity = desc.velocity;
        sprite.lifetime = desc.lifetime;
        self.world.spawn(sprite)
    }

    /// Static gray landing surface for gravity sprites
    pub fn platform(&mut self, x: f32, y: f32, width: f32, height: f32) -> SpriteId {
        self.colored_platform(x, y, width, height, Color::GRAY)
    }

    pub fn colored_platform(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: impl Into<Color>,
    ) -> SpriteId {
        let id = self.create_sprite(SpriteDesc::new(x, y, width, height).color(color));
        self.world.add_platform(id);
        id
    }

    /// Pull `id` down at `gravity` px/s² and let it land on platforms
    pub fn enable_gravity(&mut self, id: SpriteId, gravity: f32) {
        if let Some(sprite) = self.world.get_mut(id) {
            sprite.gravity = Some(gravity);
            sprite.on_ground = false;
        }
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.world.get(id)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.world.get_mut(id)
    }

    pub fn is_alive(&self, id: SpriteId) -> bool {
        self.world.is_alive(id)
    }

    /// Mark `id` for removal at the next physics step
    pub fn destroy(&mut self, id: SpriteId) {
        if let Some(sprite) = self.world.get_mut(id) {
            sprite.destroy();
        }
    }

    pub fn set_velocity(&mut self, id: SpriteId, vx: f32, vy: f32) {
        if let Some(sprite) = self.world.get_mut(id) {
            sprite.set_velocity(vx, vy);
        }
    }

    /// Steer `id` toward `target`'s center at `speed` px/s
    pub fn follow(&mut self, id: SpriteId, target: SpriteId, speed: f32) {
        if let Some(sprite) = self.world.get_mut(id) {
            sprite.follow(target, speed);
        }
    }

    pub fn set_bounce(&mut self, id: SpriteId, enable: bool) {
        if let Some(sprite) = self.world.get_mut(id) {
            sprite.set_bounce(enable);
        }
    }

    /// Every registered sprite in draw order, including ones awaiting removal
    pub fn sprite_ids(&self) -> &[SpriteId] {
        self.world.ids()
    }

    pub fn sprite_count(&self) -> usize {
        self.world.len()
    }

    // ========================================================================
    // Game state
    // ========================================================================

    /// End the round. Simulation stops from the next frame on and the
    /// overlay shows `message` until the restart key is pressed.
    pub fn game_over(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("game over: {}", message);
        self.state.declare_game_over(message);
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn game_over_message(&self) -> &str {
        self.state.message()
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Solid color, or an image stretched or tiled over the window
    pub fn set_background(&mut self, image: Option<&Path>, color: impl Into<Color>, mode: BackgroundMode) {
        let size = self.window_size();
        self.background
            .set(self.gfx.as_mut(), image, color.into(), mode, size);
    }

    pub fn set_background_color(&mut self, color: impl Into<Color>) {
        self.set_background(None, color, BackgroundMode::default());
    }

    /// White circle for this frame only
    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands.circle(Vec2::new(x, y), radius, Color::WHITE);
    }

    /// White text with its top-left corner at (x, y), for this frame only
    pub fn write(&mut self, text: impl Into<String>, x: f32, y: f32, size: Option<f32>) {
        let size = size.unwrap_or(DEFAULT_TEXT_SIZE);
        self.commands.text(text, Vec2::new(x, y), size, Color::WHITE);
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn is_key_held(&self, key: Key) -> bool {
        self.input.is_key_held(key)
    }
}

/// Game on the recording backend, with handles to its draw log and input.
#[cfg(test)]
pub(crate) fn headless_game() -> (Game, crate::backend::DrawLog, crate::backend::InputHandle) {
    headless_game_with(crate::backend::HeadlessGraphics::new())
}

#[cfg(test)]
pub(crate) fn headless_game_with(
    gfx: crate::backend::HeadlessGraphics,
) -> (Game, crate::backend::DrawLog, crate::backend::InputHandle) {
    let input = crate::backend::HeadlessInput::new();
    let (log, handle) = (gfx.log(), input.handle());
    let game = Game::new(GameConfig::default(), Box::new(gfx), Box::new(input));
    (game, log, handle)
}
