//! Grapple Run - a side-scrolling creature-wrangling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, physics, creature AI, economy)
//!
//! Rendering, audio and input plumbing live outside this crate: embedders read
//! entity state after each tick and drain the world's event queue for cosmetic
//! feedback (particles, screen shake, floating text).

pub mod sim;

pub use sim::{TickInput, World};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one frame per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Depth offset returned by the terrain inside a pit - "no ground here"
    pub const PIT_DEPTH: f32 = 350.0;
    /// Ground readings this far below the rest line count as open space
    pub const HOLE_MARGIN: f32 = 200.0;
    /// Bodies falling this far below the rest line are gone for good
    pub const KILL_ZONE_DEPTH: f32 = 500.0;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 52.0;
    /// Creature hitbox
    pub const CREATURE_WIDTH: f32 = 30.0;
    pub const CREATURE_HEIGHT: f32 = 45.0;

    /// Radius within which a flying harpoon snags a creature
    pub const CAPTURE_RADIUS: f32 = 40.0;
    /// Radius within which a captured creature counts as delivered
    pub const DELIVER_RADIUS: f32 = 50.0;

    /// How far behind the camera content is evicted
    pub const EVICT_BEHIND: f32 = 1000.0;
    /// How far outside the camera window a fleeing creature counts as gone
    pub const ESCAPE_MARGIN: f32 = 200.0;
}

/// Exponential approach: move `current` a fraction `rate` of the way to `target`
#[inline]
pub fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

/// Angle from `from` toward `to` in world space
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}
