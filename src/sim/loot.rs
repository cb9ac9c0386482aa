//! Droppable and collectible objects: lures, coins, bonus crates, burrows

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::terrain::TerrainField;
use crate::consts::KILL_ZONE_DEPTH;

/// Ticks a dropped lure stays attractive before rotting away
pub const LURE_LIFE: u32 = 500;
/// Coin face value
pub const COIN_VALUE: i64 = 10;

/// Bait dropped by the player to draw concealed creatures out
///
/// Creatures hold the lure's id, not a reference: the lure may be consumed by
/// another creature first, so every use revalidates through the live list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lure {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub life: u32,
    pub active: bool,
    /// Set by the lure-all effect: attracts from any distance
    pub irresistible: bool,
}

impl Lure {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            life: LURE_LIFE,
            active: true,
            irresistible: false,
        }
    }

    pub fn update(&mut self, terrain: &TerrainField) {
        self.vel.x *= 0.8;
        self.vel.y += 0.5;
        self.pos += self.vel;

        let ground = terrain.height(self.pos.x);
        if self.pos.y + 10.0 > ground {
            self.pos.y = ground - 10.0;
            self.vel = Vec2::ZERO;
            self.angle = terrain.slope(self.pos.x);
        }

        self.life = self.life.saturating_sub(1);
        if self.life == 0 {
            self.active = false;
        }
    }
}

/// A bouncing reward coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub vel: Vec2,
    pub value: i64,
    pub active: bool,
}

impl Coin {
    /// Pop a coin with a randomized scatter velocity
    pub fn pop(pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 10.0,
                -5.0 - rng.random::<f32>() * 5.0,
            ),
            value: COIN_VALUE,
            active: true,
        }
    }

    pub fn update(&mut self, terrain: &TerrainField) {
        self.vel.y += 0.6;
        self.pos += self.vel;

        let ground = terrain.height(self.pos.x);
        if self.pos.y + 8.0 > ground {
            self.pos.y = ground - 8.0;
            self.vel.y *= -0.2;
            self.vel.x *= 0.9;
            if self.vel.y.abs() < 1.0 {
                self.vel.y = 0.0;
            }
        }

        // Coins that scatter into a pit are lost
        if self.pos.y > terrain.rest_height + KILL_ZONE_DEPTH {
            self.active = false;
        }
    }
}

/// A floating paid crate; opened in place with the interact action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusCrate {
    pub pos: Vec2,
    rest_y: f32,
    /// Bob phase, advanced per tick
    phase: f32,
    pub price: i64,
    pub opened: bool,
}

impl BonusCrate {
    /// Price starts at $50 and rises $1 per 250 world units traveled
    pub fn new(pos: Vec2, distance: f32, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            rest_y: pos.y,
            phase: rng.random::<f32>() * std::f32::consts::TAU,
            price: 50 + (distance / 250.0) as i64,
            opened: false,
        }
    }

    pub fn update(&mut self) {
        self.phase += 0.055;
        self.pos.y = self.rest_y + self.phase.sin() * 5.0;
    }
}

/// Static marker for a creature's hiding place; cosmetic, evicted with the
/// rest of the window
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Burrow {
    pub pos: Vec2,
}

/// Resolve a weak lure handle against the live list
///
/// Returns the index of the lure only if it still exists and is active; a
/// consumed or evicted lure simply fails the lookup.
pub fn lookup_lure(lures: &[Lure], id: Option<u32>) -> Option<usize> {
    let id = id?;
    lures.iter().position(|l| l.id == id && l.active)
}
