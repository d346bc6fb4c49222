use bevy::math::Vec2;
use rand::Rng;

use super::ArenaBounds;
use crate::{MAX_SPAWN_SPEED, SPAWN_MARGIN, SPRITE_SIZE};

/// One bouncing monkey: position and velocity in display-pixel space.
///
/// Velocity is expressed in pixels per tick; components are only ever negated
/// (wall bounce) or exchanged wholesale (overlap resolution), never rescaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Body {
    /// Spawn at a random position inside the screen margins with a random
    /// velocity per axis.
    pub fn random(rng: &mut impl Rng, bounds: &ArenaBounds) -> Self {
        let pos = Vec2::new(
            random_coord(rng, bounds.width),
            random_coord(rng, bounds.height),
        );
        Self::at(pos, rng)
    }

    /// Spawn at an explicit position with a random velocity.
    pub fn at(pos: Vec2, rng: &mut impl Rng) -> Self {
        let vel = Vec2::new(
            rng.gen_range(-MAX_SPAWN_SPEED..=MAX_SPAWN_SPEED),
            rng.gen_range(-MAX_SPAWN_SPEED..=MAX_SPAWN_SPEED),
        );
        Self { pos, vel }
    }

    /// Euler advance by one tick.
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Bounce off the arena walls, per axis independently: negate the
    /// offending axis's velocity and clamp the position back into range.
    /// The other axis is untouched.
    pub fn bounce_walls(&mut self, bounds: &ArenaBounds) {
        let half = SPRITE_SIZE / 2.0;
        if self.pos.x <= half || self.pos.x >= bounds.width - half {
            self.vel.x = -self.vel.x;
            self.pos.x = self.pos.x.clamp(half, bounds.width - half);
        }
        if self.pos.y <= half || self.pos.y >= bounds.height - half {
            self.vel.y = -self.vel.y;
            self.pos.y = self.pos.y.clamp(half, bounds.height - half);
        }
    }

    fn clamp_into(&mut self, bounds: &ArenaBounds) {
        let half = SPRITE_SIZE / 2.0;
        self.pos.x = self.pos.x.clamp(half, bounds.width - half);
        self.pos.y = self.pos.y.clamp(half, bounds.height - half);
    }
}

/// Resolve an overlapping pair: push both bodies apart by half the overlap
/// each along the center-to-center angle, then exchange their full velocity
/// vectors. Returns whether the pair was overlapping.
///
/// The velocity exchange is a deliberate simplification of an elastic
/// collision: it ignores approach direction and does not conserve momentum in
/// general. It is what this program has always done and its bounces look
/// different from the physically correct ones, so it stays.
pub fn resolve_collision(a: &mut Body, b: &mut Body, bounds: &ArenaBounds) -> bool {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    if distance >= SPRITE_SIZE {
        return false;
    }

    let angle = delta.y.atan2(delta.x);
    let push = Vec2::new(angle.cos(), angle.sin()) * ((SPRITE_SIZE - distance) / 2.0);
    a.pos -= push;
    b.pos += push;
    // Keep the in-bounds invariant even when a pair resolves against a wall.
    a.clamp_into(bounds);
    b.clamp_into(bounds);

    std::mem::swap(&mut a.vel, &mut b.vel);
    true
}

fn random_coord(rng: &mut impl Rng, extent: f32) -> f32 {
    let lo = SPAWN_MARGIN;
    let hi = extent - 2.0 * SPAWN_MARGIN;
    if hi <= lo {
        // Screen too small for the margins; fall back to the center.
        return extent / 2.0;
    }
    rng.gen_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const BOUNDS: ArenaBounds = ArenaBounds {
        width: 200.0,
        height: 200.0,
    };

    #[test]
    fn advance_moves_by_velocity() {
        let mut body = Body {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(5.0, 0.0),
        };
        body.advance();
        assert_eq!(body.pos, Vec2::new(105.0, 100.0));
    }

    #[test]
    fn walks_into_right_wall_then_flips_and_clamps() {
        let mut body = Body {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(5.0, 0.0),
        };
        // 15 ticks reach x = 175 = width - size/2, the bounce threshold.
        for _ in 0..15 {
            body.advance();
            body.bounce_walls(&BOUNDS);
        }
        assert_eq!(body.pos.x, 175.0);
        assert_eq!(body.vel, Vec2::new(-5.0, 0.0));
        assert_eq!(body.pos.y, 100.0);

        body.advance();
        body.bounce_walls(&BOUNDS);
        assert_eq!(body.pos, Vec2::new(170.0, 100.0));
    }

    #[test]
    fn bounce_flips_only_the_offending_axis() {
        let mut body = Body {
            pos: Vec2::new(20.0, 100.0),
            vel: Vec2::new(-4.0, 2.5),
        };
        body.bounce_walls(&BOUNDS);
        assert_eq!(body.pos, Vec2::new(25.0, 100.0));
        assert_eq!(body.vel, Vec2::new(4.0, 2.5));
    }

    #[test]
    fn corner_hit_flips_both_axes() {
        let mut body = Body {
            pos: Vec2::new(10.0, 195.0),
            vel: Vec2::new(-1.0, 3.0),
        };
        body.bounce_walls(&BOUNDS);
        assert_eq!(body.pos, Vec2::new(25.0, 175.0));
        assert_eq!(body.vel, Vec2::new(1.0, -3.0));
    }

    #[test]
    fn collision_swaps_velocities_and_separates_evenly() {
        let bounds = ArenaBounds {
            width: 800.0,
            height: 600.0,
        };
        let mut a = Body {
            pos: Vec2::new(290.0, 300.0),
            vel: Vec2::new(1.0, 2.0),
        };
        let mut b = Body {
            pos: Vec2::new(320.0, 300.0),
            vel: Vec2::new(-3.0, 0.5),
        };

        assert!(resolve_collision(&mut a, &mut b, &bounds));

        // Full velocity vectors are exchanged.
        assert_eq!(a.vel, Vec2::new(-3.0, 0.5));
        assert_eq!(b.vel, Vec2::new(1.0, 2.0));
        // Centers end exactly one sprite apart, pushed half the overlap each.
        assert!((b.pos.distance(a.pos) - SPRITE_SIZE).abs() < 1e-4);
        assert_eq!(a.pos, Vec2::new(280.0, 300.0));
        assert_eq!(b.pos, Vec2::new(330.0, 300.0));
    }

    #[test]
    fn touching_pair_is_not_a_collision() {
        let bounds = ArenaBounds {
            width: 800.0,
            height: 600.0,
        };
        let mut a = Body {
            pos: Vec2::new(300.0, 300.0),
            vel: Vec2::new(1.0, 0.0),
        };
        let mut b = Body {
            pos: Vec2::new(350.0, 300.0),
            vel: Vec2::new(-1.0, 0.0),
        };
        assert!(!resolve_collision(&mut a, &mut b, &bounds));
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
        assert_eq!(b.vel, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn random_spawn_respects_margins_and_speed_range() {
        let bounds = ArenaBounds {
            width: 800.0,
            height: 600.0,
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let body = Body::random(&mut rng, &bounds);
            assert!(body.pos.x >= SPAWN_MARGIN && body.pos.x <= bounds.width - 2.0 * SPAWN_MARGIN);
            assert!(body.pos.y >= SPAWN_MARGIN && body.pos.y <= bounds.height - 2.0 * SPAWN_MARGIN);
            assert!(body.vel.x.abs() <= MAX_SPAWN_SPEED);
            assert!(body.vel.y.abs() <= MAX_SPAWN_SPEED);
        }
    }

    #[test]
    fn tiny_screen_spawns_at_center() {
        let bounds = ArenaBounds {
            width: 120.0,
            height: 120.0,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let body = Body::random(&mut rng, &bounds);
        assert_eq!(body.pos, Vec2::new(60.0, 60.0));
    }
}
