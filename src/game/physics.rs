//! Physics step
//!
//! Runs once per frame over every registered sprite, in this order:
//! 1. Reap sprites marked dead (they take no part in the rest)
//! 2. Follow: move straight toward the target's center at `speed * dt`
//! 3. Gravity: `velocity.y += gravity * dt`
//! 4. Integrate: `position += velocity * dt`
//! 5. Edge bounce: flip the velocity component and clamp back inside
//! 6. Platform landing (gravity sprites moving down): first overlapping
//!    platform in registration order wins
//! 7. Age, and expire sprites whose lifetime is used up
//!
//! Everything is scaled by `dt`, never by frame count.

use super::entity::SpriteId;
use super::sprite::Sprite;
use super::world::World;
use crate::math::{clamp_span, Rect, Vec2};

/// Advance the world by `dt` seconds inside a window covering `screen`.
/// Returns the number of sprites reaped.
pub fn step(world: &mut World, dt: f32, screen: Rect) -> usize {
    let reaped = world.reap();
    if reaped > 0 {
        log::debug!("reaped {} sprites", reaped);
    }

    let ids: Vec<SpriteId> = world.ids().to_vec();
    for id in ids {
        step_sprite(world, id, dt, screen);
    }
    reaped
}

fn step_sprite(world: &mut World, id: SpriteId, dt: f32, screen: Rect) {
    let follow = follow_delta(world, id, dt);

    let Some(sprite) = world.get_mut(id) else { return };

    if let Some(delta) = follow {
        sprite.rect.translate(delta);
    }

    if let Some(gravity) = sprite.gravity {
        sprite.velocity.y += gravity * dt;
    }

    let velocity = sprite.velocity;
    sprite.rect.translate(velocity * dt);

    if sprite.bounce {
        bounce_off_edges(sprite, screen);
    }

    // Only gravity sprites moving down can land
    let falling_rect = if sprite.gravity.is_some() {
        sprite.on_ground = false;
        (sprite.velocity.y >= 0.0).then_some(sprite.rect)
    } else {
        None
    };

    if let Some(rect) = falling_rect {
        if let Some(top) = landing_surface(world, id, &rect) {
            if let Some(sprite) = world.get_mut(id) {
                sprite.rect.set_bottom(top);
                sprite.velocity.y = 0.0;
                sprite.on_ground = true;
            }
        }
    }

    if let Some(sprite) = world.get_mut(id) {
        sprite.tick_age(dt);
    }
}

/// Position delta for a following sprite, or None when it isn't following
/// a live target or is already centered on it.
fn follow_delta(world: &World, id: SpriteId, dt: f32) -> Option<Vec2> {
    let sprite = world.get(id)?;
    let follow = sprite.follow?;
    let target = world.get(follow.target).filter(|t| t.is_alive())?;

    let dir = target.center() - sprite.center();
    if dir.length() == 0.0 {
        return None;
    }
    Some(dir.normalize() * (follow.speed * dt))
}

/// Reflect off the window edges, each axis independently.
fn bounce_off_edges(sprite: &mut Sprite, screen: Rect) {
    let r = sprite.rect;
    if r.left() < screen.left() || r.right() > screen.right() {
        sprite.velocity.x = -sprite.velocity.x;
        sprite.rect.x = clamp_span(r.x, r.w, screen.left(), screen.right());
    }
    if r.top() < screen.top() || r.bottom() > screen.bottom() {
        sprite.velocity.y = -sprite.velocity.y;
        sprite.rect.y = clamp_span(r.y, r.h, screen.top(), screen.bottom());
    }
}

/// Top edge of the first live platform (other than `id`) overlapping `rect`.
fn landing_surface(world: &World, id: SpriteId, rect: &Rect) -> Option<f32> {
    world
        .platforms()
        .iter()
        .filter(|&&p| p != id)
        .filter_map(|&p| world.get(p))
        .filter(|p| p.is_alive())
        .find(|p| p.rect.overlaps(rect))
        .map(|p| p.rect.top())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::game::sprite::Visual;
    use proptest::prelude::*;

    fn sprite(x: f32, y: f32, w: f32, h: f32) -> Sprite {
        Sprite::new(Visual::Fill(Color::WHITE), Rect::new(x, y, w, h))
    }

    fn screen() -> Rect {
        Rect::screen(640.0, 480.0)
    }

    #[test]
    fn test_integration_moves_by_velocity_times_dt() {
        let mut world = World::new();
        let mut s = sprite(10.0, 10.0, 5.0, 5.0);
        s.set_velocity(100.0, -50.0);
        let id = world.spawn(s);

        step(&mut world, 0.5, screen());
        let s = world.get(id).unwrap();
        assert_eq!(s.rect.x, 60.0);
        assert_eq!(s.rect.y, -15.0);
    }

    #[test]
    fn test_bounce_scenario_right_edge() {
        let mut world = World::new();
        let mut s = sprite(0.0, 0.0, 10.0, 10.0);
        s.set_velocity(100.0, 0.0);
        s.set_bounce(true);
        let id = world.spawn(s);

        step(&mut world, 1.0, Rect::screen(50.0, 50.0));
        let s = world.get(id).unwrap();
        assert_eq!(s.velocity.x, -100.0);
        assert_eq!(s.rect.x, 40.0);
        assert_eq!(s.velocity.y, 0.0);
    }

    #[test]
    fn test_bounce_both_axes_same_frame() {
        let mut world = World::new();
        let mut s = sprite(5.0, 5.0, 10.0, 10.0);
        s.set_velocity(-100.0, -100.0);
        s.set_bounce(true);
        let id = world.spawn(s);

        step(&mut world, 0.1, screen());
        let s = world.get(id).unwrap();
        assert_eq!(s.velocity, Vec2::new(100.0, 100.0));
        assert_eq!(s.rect.position(), Vec2::ZERO);
    }

    #[test]
    fn test_no_bounce_leaves_window() {
        let mut world = World::new();
        let mut s = sprite(0.0, 0.0, 10.0, 10.0);
        s.set_velocity(-100.0, 0.0);
        let id = world.spawn(s);

        step(&mut world, 1.0, screen());
        assert_eq!(world.get(id).unwrap().rect.x, -100.0);
    }

    #[test]
    fn test_follow_moves_toward_target_without_touching_velocity() {
        let mut world = World::new();
        let target = world.spawn(sprite(100.0, 0.0, 10.0, 10.0));
        let mut s = sprite(0.0, 0.0, 10.0, 10.0);
        s.follow(target, 50.0);
        let id = world.spawn(s);

        step(&mut world, 1.0, screen());
        let s = world.get(id).unwrap();
        assert!((s.rect.x - 50.0).abs() < 1e-4);
        assert_eq!(s.rect.y, 0.0);
        assert_eq!(s.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_follow_dead_target_is_ignored() {
        let mut world = World::new();
        let target = world.spawn(sprite(100.0, 0.0, 10.0, 10.0));
        let mut s = sprite(0.0, 0.0, 10.0, 10.0);
        s.follow(target, 50.0);
        let id = world.spawn(s);

        world.get_mut(target).unwrap().destroy();
        step(&mut world, 1.0, screen());
        assert_eq!(world.get(id).unwrap().rect.x, 0.0);
    }

    #[test]
    fn test_gravity_accumulates_into_velocity() {
        let mut world = World::new();
        let mut s = sprite(0.0, 0.0, 10.0, 10.0);
        s.gravity = Some(800.0);
        let id = world.spawn(s);

        step(&mut world, 0.5, screen());
        let s = world.get(id).unwrap();
        assert_eq!(s.velocity.y, 400.0);
        assert_eq!(s.rect.y, 200.0);
        assert!(!s.on_ground);
    }

    #[test]
    fn test_landing_first_platform_wins() {
        let mut world = World::new();
        let low = world.spawn(sprite(0.0, 105.0, 100.0, 20.0));
        let high = world.spawn(sprite(0.0, 100.0, 100.0, 20.0));
        world.add_platform(low);
        world.add_platform(high);

        let mut s = sprite(10.0, 90.0, 10.0, 10.0);
        s.gravity = Some(800.0);
        s.set_velocity(0.0, 600.0);
        let id = world.spawn(s);

        step(&mut world, 1.0 / 60.0, screen());
        let s = world.get(id).unwrap();
        // Overlaps both; the one registered first decides
        assert_eq!(s.rect.bottom(), 105.0);
        assert_eq!(s.velocity.y, 0.0);
        assert!(s.on_ground);
    }

    #[test]
    fn test_landing_exact_for_fractional_top_and_height() {
        for i in 0..100 {
            for j in 0..118 {
                let top = 100.0 + i as f32 * 0.37;
                let height = j as f32 * 0.7 + 0.1;

                let mut world = World::new();
                let p = world.spawn(sprite(0.0, top, 1000.0, 200.0));
                world.add_platform(p);
                let mut s = sprite(10.0, top - height + 0.5, 20.0, height);
                s.gravity = Some(800.0);
                let id = world.spawn(s);

                step(&mut world, 1.0 / 60.0, Rect::screen(2000.0, 2000.0));
                let s = world.get(id).unwrap();
                assert!(s.on_ground, "top {} h {}", top, height);
                assert_eq!(s.rect.bottom(), top, "top {} h {}", top, height);
            }
        }
    }

    #[test]
    fn test_rising_sprite_passes_through_platform() {
        let mut world = World::new();
        let p = world.spawn(sprite(0.0, 100.0, 100.0, 20.0));
        world.add_platform(p);

        let mut s = sprite(10.0, 105.0, 10.0, 10.0);
        s.gravity = Some(800.0);
        s.on_ground = true;
        s.set_velocity(0.0, -600.0);
        let id = world.spawn(s);

        step(&mut world, 1.0 / 60.0, screen());
        let s = world.get(id).unwrap();
        assert!(s.velocity.y < 0.0);
        assert!(!s.on_ground);
    }

    #[test]
    fn test_platform_with_gravity_ignores_itself() {
        let mut world = World::new();
        let mut p = sprite(0.0, 100.0, 100.0, 20.0);
        p.gravity = Some(800.0);
        let id = world.spawn(p);
        world.add_platform(id);

        step(&mut world, 0.1, screen());
        let p = world.get(id).unwrap();
        assert!(!p.on_ground);
        assert!(p.rect.y > 100.0);
    }

    #[test]
    fn test_dead_platform_is_not_landed_on() {
        let mut world = World::new();
        let p = world.spawn(sprite(0.0, 100.0, 100.0, 20.0));
        world.add_platform(p);
        world.get_mut(p).unwrap().destroy();

        let mut s = sprite(10.0, 95.0, 10.0, 10.0);
        s.gravity = Some(800.0);
        let id = world.spawn(s);

        step(&mut world, 1.0 / 60.0, screen());
        assert!(!world.get(id).unwrap().on_ground);
    }

    #[test]
    fn test_expired_sprite_reaped_next_step() {
        let mut world = World::new();
        let mut s = sprite(0.0, 0.0, 10.0, 10.0);
        s.lifetime = Some(0.5);
        let id = world.spawn(s);

        step(&mut world, 0.5, screen());
        // Still registered (drawable once more), but dead
        assert!(world.contains(id));
        assert!(!world.is_alive(id));

        assert_eq!(step(&mut world, 0.1, screen()), 1);
        assert!(!world.contains(id));
    }

    #[test]
    fn test_age_advances_without_lifetime() {
        let mut world = World::new();
        let id = world.spawn(sprite(0.0, 0.0, 1.0, 1.0));
        step(&mut world, 0.25, screen());
        step(&mut world, 0.25, screen());
        assert_eq!(world.get(id).unwrap().age(), 0.5);
        assert!(world.is_alive(id));
    }

    /// Number of steps until a sprite with `lifetime` is marked dead.
    fn frames_to_expire(lifetime: f32, dt: f32) -> u32 {
        let mut world = World::new();
        let mut s = sprite(0.0, 0.0, 1.0, 1.0);
        s.lifetime = Some(lifetime);
        let id = world.spawn(s);

        let mut frames = 0;
        while world.is_alive(id) {
            let age_before = world.get(id).unwrap().age();
            assert!(age_before < lifetime);
            step(&mut world, dt, screen());
            frames += 1;
        }
        assert!(world.get(id).unwrap().age() >= lifetime);
        frames
    }

    proptest! {
        #[test]
        fn prop_lifetime_crossing_is_frame_rate_independent(lifetime in 0.05f32..5.0) {
            let coarse = 1.0 / 30.0;
            let fine = 1.0 / 120.0;
            let t_coarse = frames_to_expire(lifetime, coarse) as f32 * coarse;
            let t_fine = frames_to_expire(lifetime, fine) as f32 * fine;

            prop_assert!((t_coarse - lifetime).abs() <= coarse + 1e-3);
            prop_assert!((t_fine - lifetime).abs() <= fine + 1e-3);
            prop_assert!((t_coarse - t_fine).abs() <= coarse + 1e-3);
        }

        #[test]
        fn prop_landing_snaps_exactly_to_platform_top(
            speed in 0.0f32..2000.0,
            top in 100.0f32..400.0,
            height in 0.1f32..60.0,
        ) {
            let mut world = World::new();
            let p = world.spawn(sprite(0.0, top, 1000.0, 10_000.0));
            world.add_platform(p);

            let mut s = sprite(10.0, top - height - 50.0, 20.0, height);
            s.gravity = Some(800.0);
            s.set_velocity(0.0, speed);
            let id = world.spawn(s);

            let mut landed = false;
            for _ in 0..600 {
                step(&mut world, 1.0 / 60.0, Rect::screen(2000.0, 20_000.0));
                if world.get(id).unwrap().on_ground {
                    landed = true;
                    break;
                }
            }
            prop_assert!(landed);
            let s = world.get(id).unwrap();
            prop_assert_eq!(s.rect.bottom(), top);
            prop_assert_eq!(s.velocity.y, 0.0);

            // Resting frames keep it there
            step(&mut world, 1.0 / 60.0, Rect::screen(2000.0, 20_000.0));
            let s = world.get(id).unwrap();
            prop_assert!(s.on_ground);
            prop_assert_eq!(s.rect.bottom(), top);
        }

        #[test]
        fn prop_bounce_clamps_left_edge_to_zero(
            x in 0.0f32..5.0,
            width in 1.0f32..20.0,
            vx in -600.0f32..-10.0,
        ) {
            let dt = 1.0 / 60.0;
            prop_assume!(x + vx * dt < 0.0);

            let mut world = World::new();
            let mut s = sprite(x, 100.0, width, 10.0);
            s.set_velocity(vx, 0.0);
            s.set_bounce(true);
            let id = world.spawn(s);

            step(&mut world, dt, screen());
            let s = world.get(id).unwrap();
            prop_assert_eq!(s.velocity.x, -vx);
            prop_assert_eq!(s.rect.left(), 0.0);
        }
    }
}
