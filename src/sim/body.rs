//! Shared physics integrator for every mobile entity
//!
//! One integration step plus at most one collision-resolution pass mutates a
//! body per tick. Coordinates are screen-down: positive `y` is lower, gravity
//! is positive, jumps are negative `vy`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::terrain::TerrainField;
use crate::approach;
use crate::consts::KILL_ZONE_DEPTH;

/// How close feet must be to the ground line before snapping
const GROUND_SNAP: f32 = 5.0;
/// Squash/stretch relaxation rate toward (1, 1)
const SCALE_RELAX: f32 = 0.15;

/// Position, velocity and grounding state shared by player and creatures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    /// Orientation, interpolated toward the ground slope while grounded
    pub angle: f32,
    /// Non-uniform visual scale; always relaxes toward (1, 1)
    pub scale: Vec2,
    pub grounded: bool,
    /// True while the body is over a pit with no ground beneath it
    pub in_pit: bool,
    pub gravity: f32,
    pub friction: f32,
}

impl Body {
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            width,
            height,
            angle: 0.0,
            scale: Vec2::ONE,
            grounded: false,
            in_pit: false,
            gravity: 0.28,
            friction: 0.94,
        }
    }

    /// Apply gravity and friction, then integrate position by one tick
    pub fn integrate(&mut self) {
        self.vel.y += self.gravity;
        self.vel.x *= self.friction;
        self.pos += self.vel;
    }

    /// Clamp against the terrain and update grounding state
    ///
    /// `slope_rate` controls how quickly orientation follows the local slope;
    /// players turn slower than simple bodies. Hole detection wins over any
    /// transient ground reading so nothing rests on a phantom floor.
    pub fn settle(&mut self, terrain: &TerrainField, slope_rate: f32) {
        let ground = terrain.height(self.pos.x);

        if terrain.is_pit(ground) {
            self.in_pit = true;
            self.grounded = false;
        } else {
            self.in_pit = false;
            let feet = self.pos.y + self.height / 2.0;
            if feet >= ground - GROUND_SNAP {
                self.pos.y = ground - self.height / 2.0;
                if self.vel.y > 0.0 {
                    self.vel.y = 0.0;
                }
                self.grounded = true;
                let slope = terrain.slope(self.pos.x);
                self.angle = approach(self.angle, slope, slope_rate);
            } else {
                self.grounded = false;
            }
        }

        self.scale.x = approach(self.scale.x, 1.0, SCALE_RELAX);
        self.scale.y = approach(self.scale.y, 1.0, SCALE_RELAX);
    }

    /// Set a squash/stretch pop that will relax back to (1, 1)
    pub fn squash(&mut self, sx: f32, sy: f32) {
        self.scale = Vec2::new(sx, sy);
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            center: self.pos,
            half: Vec2::new(self.width / 2.0, self.height / 2.0),
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }

    /// Whether the body has fallen past the point of no return
    #[inline]
    pub fn past_kill_zone(&self, terrain: &TerrainField) -> bool {
        self.pos.y > terrain.rest_height + KILL_ZONE_DEPTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::FRAC_PI_2;

    fn flat_terrain() -> (TerrainField, f32) {
        let mut rng = Pcg32::seed_from_u64(5);
        let t = TerrainField::new(620.0, &mut rng);
        // Middle of a guaranteed-flat rest zone
        let x = FRAC_PI_2 / 0.0004;
        (t, x)
    }

    #[test]
    fn test_integrate_applies_gravity_and_friction() {
        let mut b = Body::new(Vec2::new(0.0, 0.0), 32.0, 52.0);
        b.vel = Vec2::new(10.0, 0.0);
        b.integrate();
        assert!((b.vel.x - 10.0 * 0.94).abs() < 1e-5);
        assert!((b.vel.y - 0.28).abs() < 1e-5);
        assert!((b.pos.x - b.vel.x).abs() < 1e-5);
    }

    #[test]
    fn test_settle_snaps_to_ground() {
        let (t, x) = flat_terrain();
        let mut b = Body::new(Vec2::new(x, 600.0), 32.0, 52.0);
        b.vel.y = 8.0;
        b.settle(&t, 0.1);
        assert!(b.grounded);
        assert_eq!(b.vel.y, 0.0);
        assert!((b.bottom() - t.rest_height).abs() < 1e-3);
    }

    #[test]
    fn test_grounding_invariant_after_settle() {
        let (t, _) = flat_terrain();
        for i in 0..200 {
            let x = i as f32 * 57.0;
            let mut b = Body::new(Vec2::new(x, t.height(x) - 20.0), 30.0, 45.0);
            b.vel.y = 12.0;
            b.integrate();
            b.settle(&t, 0.1);
            if !b.in_pit {
                assert!(
                    b.bottom() <= t.height(b.pos.x) + 1e-3,
                    "body below ground at x={x}"
                );
            }
        }
    }

    #[test]
    fn test_pit_detection_beats_phantom_floor() {
        let (mut t, x) = flat_terrain();
        t.add_hole(x - 50.0, 100.0);
        let mut b = Body::new(Vec2::new(x, t.rest_height - 26.0), 32.0, 52.0);
        b.settle(&t, 0.1);
        assert!(b.in_pit);
        assert!(!b.grounded);
    }

    #[test]
    fn test_airborne_body_is_not_grounded() {
        let (t, x) = flat_terrain();
        let mut b = Body::new(Vec2::new(x, t.rest_height - 300.0), 32.0, 52.0);
        b.settle(&t, 0.1);
        assert!(!b.grounded);
        assert!(!b.in_pit);
    }

    #[test]
    fn test_scale_relaxes_toward_one() {
        let (t, x) = flat_terrain();
        let mut b = Body::new(Vec2::new(x, 600.0), 32.0, 52.0);
        b.squash(0.7, 1.4);
        for _ in 0..120 {
            b.settle(&t, 0.1);
        }
        assert!((b.scale.x - 1.0).abs() < 1e-3);
        assert!((b.scale.y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_kill_zone() {
        let (t, x) = flat_terrain();
        let mut b = Body::new(Vec2::new(x, t.rest_height + 600.0), 32.0, 52.0);
        assert!(b.past_kill_zone(&t));
        b.pos.y = t.rest_height - 10.0;
        assert!(!b.past_kill_zone(&t));
    }
}
