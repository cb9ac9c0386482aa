//! Harpoon lifecycle: fire, flight, stick, retract, capture
//!
//! At most one harpoon is live per player; the world enforces that by making
//! fire a no-op while one exists. Capture checks live in the world's collision
//! pass; once a creature is snagged the harpoon's position is slaved to it
//! until delivery.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::TerrainField;

/// Per-tick horizontal damping during flight
const FLIGHT_DAMPING: f32 = 0.99;
/// Gravity applied during flight
const FLIGHT_GRAVITY: f32 = 0.28;
/// Ticks a stuck harpoon lingers in the ground before reeling back
const STUCK_LINGER: u32 = 30;
/// Constant reel-in speed toward the owner
const RETRACT_SPEED: f32 = 20.0;
/// Distance to the owner at which retraction completes
const RETRACT_DONE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    Flying,
    /// Tip buried in the ground, briefly held before retraction
    Stuck,
    /// Reeling back toward the owner, ignoring gravity
    Retracting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub state: ProjectileState,
    /// Flight ticks spent against the cable budget
    pub life: u32,
    /// Flight budget before forced retraction (from the cable upgrade)
    pub max_life: u32,
    /// Ticks spent stuck in the ground
    stuck_ticks: u32,
    /// Id of the snagged creature, set at most once
    pub captured: Option<u32>,
    pub active: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, angle: f32, power: f32, max_life: u32) -> Self {
        Self {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * power,
            angle,
            state: ProjectileState::Flying,
            life: 0,
            max_life,
            stuck_ticks: 0,
            captured: None,
            active: true,
        }
    }

    /// Advance one tick. While a creature is captured the world slaves this
    /// harpoon's position to it instead.
    pub fn update(&mut self, terrain: &TerrainField, owner_pos: Vec2) {
        if self.captured.is_some() {
            return;
        }

        match self.state {
            ProjectileState::Flying => {
                self.vel.x *= FLIGHT_DAMPING;
                self.vel.y += FLIGHT_GRAVITY;
                self.pos += self.vel;
                self.angle = self.vel.y.atan2(self.vel.x);

                let ground = terrain.height(self.pos.x);
                if !terrain.is_pit(ground) && self.pos.y >= ground {
                    self.pos.y = ground;
                    self.vel = Vec2::ZERO;
                    self.state = ProjectileState::Stuck;
                    return;
                }

                self.life += 1;
                if self.life > self.max_life {
                    self.state = ProjectileState::Retracting;
                }
            }
            ProjectileState::Stuck => {
                self.stuck_ticks += 1;
                if self.stuck_ticks > STUCK_LINGER {
                    self.state = ProjectileState::Retracting;
                }
            }
            ProjectileState::Retracting => {
                let to_owner = owner_pos - self.pos;
                if to_owner.length() < RETRACT_DONE {
                    self.active = false;
                    return;
                }
                self.vel = to_owner.normalize_or_zero() * RETRACT_SPEED;
                self.pos += self.vel;
                self.angle = self.vel.y.atan2(self.vel.x);
            }
        }
    }
}
