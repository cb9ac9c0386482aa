//! Forward content generation and rear eviction
//!
//! The streaming window is what makes an unbounded runner tractable: batches
//! of features are rolled in ahead of the camera as it advances, and anything
//! that falls far enough behind is dropped, so the live working set stays
//! bounded no matter how far the run goes.

use glam::Vec2;
use rand::Rng;

use super::creature::Creature;
use super::loot::{BonusCrate, Burrow};
use super::obstacle::{Obstacle, ObstacleKind};
use super::world::World;
use crate::consts::EVICT_BEHIND;

/// Features rolled per generation batch
const BATCH_FEATURES: u32 = 3;
/// Generate while the camera's leading edge is within this margin of the
/// last generated x
const GEN_MARGIN: f32 = 200.0;
/// Feature spacing: base plus jitter
const MIN_SPACING: f32 = 400.0;
const SPACING_JITTER: f32 = 400.0;
/// Bonus crates only appear past this distance from the start
const CRATE_MIN_DISTANCE: f32 = 3000.0;
/// Crate hover height above the ground
const CRATE_HOVER: f32 = 150.0;

/// Top up content ahead of the camera
pub fn generate_ahead(world: &mut World) {
    while world.camera_x + world.view_width > world.last_generated_x - GEN_MARGIN {
        generate_batch(world);
    }
}

fn generate_batch(world: &mut World) {
    let mut x = world.last_generated_x.max(world.start_x + 100.0);
    for _ in 0..BATCH_FEATURES {
        x += MIN_SPACING + world.rng().random::<f32>() * SPACING_JITTER;
        spawn_feature(world, x);
    }
    world.last_generated_x = x;
    log::debug!("streamed content up to x={x:.0}");
}

fn spawn_feature(world: &mut World, x: f32) {
    let roll = world.rng().random::<f32>();

    if roll < 0.78 {
        if roll < 0.55 {
            spawn_burrow(world, x);
        } else {
            let kind = match world.rng().random_range(0..3u32) {
                0 => ObstacleKind::Stump,
                1 => ObstacleKind::Rock,
                _ => ObstacleKind::Log,
            };
            let ground = world.terrain.height(x);
            let pos = Vec2::new(x, ground - kind.size().y / 2.0);
            world.obstacles.push(Obstacle::new(pos, kind));
        }
    } else if roll < 0.90 {
        let width = 90.0 + world.rng().random::<f32>() * 80.0;
        world.terrain.add_hole(x, width);
    } else if x - world.start_x > CRATE_MIN_DISTANCE {
        let ground = world.terrain.height(x);
        let pos = Vec2::new(x, ground - CRATE_HOVER);
        let distance = x - world.start_x;
        let rng = world.rng();
        let bonus = BonusCrate::new(pos, distance, rng);
        world.crates.push(bonus);
    } else {
        // Too early for a crate; seed another creature instead
        spawn_burrow(world, x);
    }
}

/// A burrow marker with a concealed creature waiting under it
fn spawn_burrow(world: &mut World, x: f32) {
    let ground = world.terrain.height(x);
    world.burrows.push(Burrow {
        pos: Vec2::new(x, ground),
    });
    let id = world.next_entity_id();
    let pos = Vec2::new(x, ground + 50.0);
    let rng = world.rng();
    let creature = Creature::new(id, pos, rng);
    world.creatures.push(creature);
}

/// Drop everything that fell behind the trailing threshold, plus anything
/// already flagged inactive
pub fn evict_behind(world: &mut World) {
    let threshold = world.camera_x - EVICT_BEHIND;
    world
        .creatures
        .retain(|c| c.active && c.body.pos.x > threshold);
    world.obstacles.retain(|o| o.pos.x > threshold);
    world.burrows.retain(|b| b.pos.x > threshold);
    world.coins.retain(|c| c.active && c.pos.x > threshold);
    world.lures.retain(|l| l.active && l.pos.x > threshold);
    world.crates.retain(|b| b.pos.x > threshold);
    world
        .projectiles
        .retain(|p| p.active && p.pos.x > threshold);
}
