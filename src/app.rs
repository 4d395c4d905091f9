//! Window and main loop
//!
//! `start` opens a macroquad window and drives `Game::frame` once per
//! display frame with the measured wall-clock `dt`, pacing to the
//! configured FPS limit.

#[cfg(target_arch = "wasm32")]
use crate::backend::macroquad::ASSET_MANIFEST;
use crate::backend::{MacroquadGraphics, MacroquadInput};
use crate::config::{ConfigError, GameConfig};
use crate::game::{FpsLimit, FrameOutcome, Game};
use macroquad::prelude::*;

fn window_conf(config: &GameConfig) -> Conf {
    Conf {
        window_title: config.title.clone(),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: false,
        high_dpi: config.high_dpi,
        ..Default::default()
    }
}

/// Open the window, let `setup` register sprites and listeners, then run
/// until the window is closed. Fails only on an unusable config.
pub fn start(config: GameConfig, setup: impl FnOnce(&mut Game) + 'static) -> Result<(), ConfigError> {
    config.validate()?;
    log::info!(
        "starting \"{}\" at {}x{}, fps limit {}",
        config.title,
        config.width,
        config.height,
        config.fps_limit.label()
    );

    let conf = window_conf(&config);
    macroquad::Window::from_config(conf, run(config, setup));
    Ok(())
}

async fn run(config: GameConfig, setup: impl FnOnce(&mut Game)) {
    let fps_limit = config.fps_limit;

    #[allow(unused_mut)]
    let mut graphics = MacroquadGraphics::new();
    // No filesystem on the web: fetch image files before setup asks for them
    #[cfg(target_arch = "wasm32")]
    graphics.preload_manifest(ASSET_MANIFEST).await;

    let mut game = Game::new(config, Box::new(graphics), Box::new(MacroquadInput::new()));
    setup(&mut game);
    game.launch();

    let mut last_frame = get_time();
    loop {
        let frame_start = get_time();
        let dt = (frame_start - last_frame) as f32;
        last_frame = frame_start;

        if game.frame(dt) == FrameOutcome::Quit {
            log::info!("window closed");
            break;
        }

        limit_fps(fps_limit, frame_start);
        next_frame().await;
    }
}

/// Wait out the rest of the frame budget
fn limit_fps(fps_limit: FpsLimit, frame_start: f64) {
    let Some(target_frame_time) = fps_limit.frame_time() else {
        return;
    };
    if get_time() - frame_start >= target_frame_time {
        return;
    }

    // Native: use sleep for bulk, then spin-wait for precision
    #[cfg(not(target_arch = "wasm32"))]
    {
        let spin_margin = 0.002;
        while get_time() - frame_start + spin_margin < target_frame_time {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        while get_time() - frame_start < target_frame_time {
            std::hint::spin_loop();
        }
    }
    // WASM: the browser paces frames
}
