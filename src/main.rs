//! Space Rocks: a first space game
//!
//! Arrows move, Space shoots. Rocks fall once a second; shoot them for
//! points and don't let one hit you.

use macroquad::rand::gen_range;
use pixelkit::{Bounds, Color, Game, GameConfig, Key, ProjectileDesc, SpriteDesc, SpriteId};
use std::cell::RefCell;
use std::rc::Rc;

/// Optional settings file in the working directory
const CONFIG_PATH: &str = "space-rocks.ron";

/// Seconds between rocks
const ROCK_INTERVAL: f32 = 1.0;

/// Per-round state shared by the listeners
#[derive(Default)]
struct Round {
    player: SpriteId,
    bullets: Vec<SpriteId>,
    rocks: Vec<SpriteId>,
    score: u32,
    timer: f32,
}

fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    pixelkit::logging::init();

    let config = if std::path::Path::new(CONFIG_PATH).exists() {
        GameConfig::load_or_default(CONFIG_PATH)
    } else {
        GameConfig::new(640, 480, "Space Rocks")
    };

    if let Err(e) = pixelkit::start(config, setup) {
        log::error!("can't start: {}", e);
        std::process::exit(1);
    }
}

fn setup(game: &mut Game) {
    macroquad::rand::srand(macroquad::miniquad::date::now() as u64);
    game.set_background_color(Color::BLACK);

    let round = Rc::new(RefCell::new(Round::default()));

    let r = round.clone();
    game.on_start(move |game| {
        let (width, height) = game.screen_size();
        let player = game.create_sprite(
            SpriteDesc::new(300.0, height - 50.0, 40.0, 40.0).color((0, 200, 255)),
        );
        game.attach_arrow_control(player, 220.0, Some(Bounds::screen(width, height)));
        *r.borrow_mut() = Round {
            player,
            ..Default::default()
        };
    });

    let r = round.clone();
    game.on_key_pressed(Key::Space, move |game| {
        let player = r.borrow().player;
        let bullet = ProjectileDesc::default().size(6.0, 14.0).color((255, 255, 0));
        if let Some(id) = game.projectile_from(player, 0.0, -450.0, bullet) {
            r.borrow_mut().bullets.push(id);
        }
    });

    game.on_update(move |game, dt| {
        let mut guard = round.borrow_mut();
        let round = &mut *guard;

        round.timer += dt;
        if round.timer >= ROCK_INTERVAL {
            round.timer = 0.0;
            let x = gen_range(0.0, game.screen_size().0 - 20.0);
            let rock = game.create_sprite(
                SpriteDesc::new(x, -30.0, 26.0, 26.0)
                    .color((180, 180, 180))
                    .velocity(0.0, 170.0)
                    .lifetime(6.0),
            );
            round.rocks.push(rock);
        }

        // Forget sprites that have been reaped
        round.rocks.retain(|&id| game.sprite(id).is_some());
        round.bullets.retain(|&id| game.sprite(id).is_some());

        let player = game.sprite(round.player).map(|s| s.rect);
        for &rock in &round.rocks {
            let Some(rock_rect) = game.sprite(rock).filter(|s| s.is_alive()).map(|s| s.rect) else {
                continue;
            };
            if player.is_some_and(|p| p.overlaps(&rock_rect)) {
                game.game_over("You Lose!");
            }
            for &bullet in &round.bullets {
                let hit = game
                    .sprite(bullet)
                    .is_some_and(|b| b.is_alive() && b.rect.overlaps(&rock_rect));
                if hit {
                    round.score += 1;
                    game.destroy(rock);
                    game.destroy(bullet);
                    break;
                }
            }
        }

        game.write(format!("Score: {}", round.score), 10.0, 10.0, Some(24.0));
    });
}
