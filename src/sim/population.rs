use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use super::ArenaBounds;
use super::body::{Body, resolve_collision};

/// The monkey population, in insertion order.
///
/// All tick-time mutation goes through index-based access into the vector so
/// the pairwise pass can write to two bodies at once without invalidating the
/// iteration. Bodies are never removed; the vector only grows, and only by
/// exact doubling.
#[derive(Resource, Debug, Default)]
pub struct Population {
    pub bodies: Vec<Body>,
}

impl Population {
    pub fn new(first: Body) -> Self {
        Self {
            bodies: vec![first],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Advance every body by one tick, in insertion order: Euler move, wall
    /// bounce, then (when enabled) the overlap pass against every other body.
    ///
    /// The pass is O(n²) with no spatial partitioning, which is fine for the
    /// few hundred sprites this toy is meant to reach.
    pub fn tick(&mut self, bounds: &ArenaBounds, collisions: bool) {
        for i in 0..self.bodies.len() {
            self.bodies[i].advance();
            self.bodies[i].bounce_walls(bounds);
            if collisions {
                self.collide_with_peers(i, bounds);
            }
        }
    }

    /// Resolve overlaps between body `i` and every other body. A resolved
    /// pair ends exactly one sprite apart, so the mirrored visit from the
    /// peer's own pass only acts again if the peer has moved back into
    /// overlap by then.
    fn collide_with_peers(&mut self, i: usize, bounds: &ArenaBounds) {
        for j in 0..self.bodies.len() {
            if j == i {
                continue;
            }
            let (a, b) = if i < j {
                let (head, tail) = self.bodies.split_at_mut(j);
                (&mut head[i], &mut tail[0])
            } else {
                let (head, tail) = self.bodies.split_at_mut(i);
                (&mut tail[0], &mut head[j])
            };
            resolve_collision(a, b, bounds);
        }
    }

    /// Double the population: append exactly `len` freshly randomized bodies
    /// at the end, leaving every existing body untouched. Returns the number
    /// added. Callers invoke this between tick passes, never mid-iteration.
    pub fn double(&mut self, rng: &mut impl Rng, bounds: &ArenaBounds) -> usize {
        let added = self.bodies.len();
        for _ in 0..added {
            self.bodies.push(Body::random(rng, bounds));
        }
        added
    }
}

/// Repeating wall-clock timer driving population doublings.
///
/// Excess elapsed time is discarded when the timer fires, so a stalled frame
/// produces at most one doubling and the next one is a full interval away.
#[derive(Resource, Debug)]
pub struct DoublingTimer(Timer);

impl DoublingTimer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self(Timer::new(interval, TimerMode::Repeating))
    }

    /// Advance by `delta`; returns true when the interval has elapsed.
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.0.tick(delta);
        if self.0.just_finished() {
            self.0.reset();
            true
        } else {
            false
        }
    }
}
