//! AABB overlap resolution between moving bodies and static obstacles
//!
//! Resolution picks the smaller overlap as the separation axis (minimum
//! translation vector). Vertical separation is only a landing when the mover
//! is coming down onto the obstacle from above; every other vertical case
//! falls back to a horizontal push so a jumping body never teleports through
//! a corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::obstacle::Obstacle;

/// Axis-aligned box as center + half extents
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Per-axis penetration depth against `other`; any component <= 0 is a miss
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        let d = (self.center - other.center).abs();
        self.half + other.half - d
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        let o = self.overlap(other);
        o.x > 0.0 && o.y > 0.0
    }
}

/// What a collision pass did to the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Pushed out sideways, horizontal velocity zeroed
    Side,
    /// Landed on top: pushed up, vertical velocity zeroed, grounded
    Landed,
}

/// Resolve one body against one static obstacle; applied once per obstacle
/// per body per tick, no iterative relaxation
pub fn resolve_obstacle(body: &mut Body, obstacle: &Obstacle) -> Option<Contact> {
    let a = body.aabb();
    let b = obstacle.aabb();
    let overlap = a.overlap(&b);
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return None;
    }

    let landing = overlap.y <= overlap.x
        && body.vel.y >= 0.0
        && body.pos.y < obstacle.pos.y;

    if landing {
        body.pos.y = obstacle.top() - body.height / 2.0;
        body.vel.y = 0.0;
        body.grounded = true;
        Some(Contact::Landed)
    } else {
        let dir = if body.pos.x >= obstacle.pos.x { 1.0 } else { -1.0 };
        body.pos.x += dir * overlap.x;
        body.vel.x = 0.0;
        Some(Contact::Side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::ObstacleKind;

    fn player_body(x: f32, y: f32) -> Body {
        Body::new(Vec2::new(x, y), 32.0, 52.0)
    }

    #[test]
    fn test_no_overlap_is_a_miss() {
        let mut body = player_body(300.0, 0.0);
        let obstacle = Obstacle::new(Vec2::new(500.0, 0.0), ObstacleKind::Rock);
        assert!(resolve_obstacle(&mut body, &obstacle).is_none());
        assert_eq!(body.pos, Vec2::new(300.0, 0.0));
    }

    #[test]
    fn test_falling_body_lands_on_top() {
        // Rock is 70x60 centered at (500, 0); body drops onto its left
        // shoulder with a shallow vertical overlap
        let obstacle = Obstacle::new(Vec2::new(500.0, 0.0), ObstacleKind::Rock);
        let mut body = player_body(480.0, -50.0);
        body.vel = Vec2::new(2.0, 6.0);

        let contact = resolve_obstacle(&mut body, &obstacle);
        assert_eq!(contact, Some(Contact::Landed));
        assert!(body.grounded);
        assert_eq!(body.vel.y, 0.0);
        assert!((body.pos.y + body.height / 2.0 - obstacle.top()).abs() < 1e-4);
    }

    #[test]
    fn test_walking_into_side_pushes_out() {
        let obstacle = Obstacle::new(Vec2::new(500.0, 0.0), ObstacleKind::Rock);
        // Level with the obstacle, barely overlapping on x
        let mut body = player_body(462.0, 0.0);
        body.vel = Vec2::new(3.0, 0.0);

        let contact = resolve_obstacle(&mut body, &obstacle);
        assert_eq!(contact, Some(Contact::Side));
        assert_eq!(body.vel.x, 0.0);
        // Pushed back out to the left, no longer overlapping
        assert!(!body.aabb().intersects(&obstacle.aabb()));
        assert!(body.pos.x < 462.0 + 1e-4);
    }

    #[test]
    fn test_rising_body_is_not_a_landing() {
        let obstacle = Obstacle::new(Vec2::new(500.0, 0.0), ObstacleKind::Rock);
        // Jumping up through the corner: vertical overlap smaller but moving up
        let mut body = player_body(480.0, -50.0);
        body.vel = Vec2::new(2.0, -8.0);

        let contact = resolve_obstacle(&mut body, &obstacle);
        assert_eq!(contact, Some(Contact::Side));
        assert!(!body.grounded);
    }

    #[test]
    fn test_body_below_center_separates_sideways() {
        let obstacle = Obstacle::new(Vec2::new(500.0, 0.0), ObstacleKind::Rock);
        // Overlapping from below while falling: not a landing
        let mut body = player_body(480.0, 50.0);
        body.vel = Vec2::new(0.0, 2.0);

        let contact = resolve_obstacle(&mut body, &obstacle);
        assert_eq!(contact, Some(Contact::Side));
    }
}
