//! Overlap notifier
//!
//! Level-triggered: every registered pair whose rectangles intersect fires
//! once per frame for as long as the overlap lasts. Pairs are checked in
//! registration order and liveness is re-read before each check, so a
//! callback that destroys a sprite silences later pairs in the same frame.

use super::event::restore;
use super::runtime::Game;

/// Check every overlap pair once. Returns how many callbacks fired.
pub fn notify(game: &mut Game) -> usize {
    let mut triples = std::mem::take(&mut game.events.overlaps);
    let mut fired = 0;

    for triple in triples.iter_mut() {
        let hit = match (game.world.get(triple.a), game.world.get(triple.b)) {
            (Some(a), Some(b)) => a.is_alive() && b.is_alive() && a.rect.overlaps(&b.rect),
            _ => false,
        };
        if hit {
            (triple.handler)(game, triple.a, triple.b);
            fired += 1;
        }
    }

    restore(&mut game.events.overlaps, triples);
    fired
}
