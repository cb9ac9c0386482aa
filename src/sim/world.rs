//! World state and the per-tick orchestration
//!
//! One `tick` advances every entity once in a fixed component order:
//! streaming, player and simple-body integration, creature AI, collision and
//! capture resolution, economy deltas, eviction. Shared collections are owned
//! here and passed by reference into each component call; no component keeps
//! cross-tick ownership of another's list.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, resolve_obstacle};
use super::creature::{Creature, CreatureCtx, CreatureState};
use super::economy::{LURE_ALL_COST, MEDKIT_COST, StatKind};
use super::loot::{BonusCrate, Burrow, Coin, Lure};
use super::obstacle::Obstacle;
use super::player::Player;
use super::projectile::{Projectile, ProjectileState};
use super::stream;
use super::terrain::TerrainField;
use crate::consts::CAPTURE_RADIUS;

/// Extracting creatures despawn above this y (well off the top of the view)
const DESPAWN_ABOVE: f32 = -200.0;
/// Coins spawned when an extraction pays out
const EXTRACT_COINS: u32 = 5;
/// Escape penalty taken from the wallet
const ESCAPE_PENALTY: i64 = 10;
/// Contact radius for picking up a coin
const COIN_PICKUP_RADIUS: f32 = 30.0;
/// Magnet acceleration toward the player
const MAGNET_PULL: f32 = 0.9;
/// Reach of the interact action on a bonus crate
const CRATE_REACH: f32 = 80.0;
/// Ticks of the cosmetic post-lure-all reset flag
const LURE_ALL_RESET_TICKS: u32 = 120;

/// Color palette indices for floating text, resolved by the renderer
pub mod text_color {
    pub const REWARD: u32 = 0;
    pub const PENALTY: u32 = 1;
    pub const WARNING: u32 = 2;
}

/// Cosmetic particle flavors the embedder knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Jetpack,
    Slime,
    Dust,
    Spark,
}

/// Fire-and-forget feedback for cosmetic subsystems, drained after each tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    SpawnParticles {
        pos: Vec2,
        kind: ParticleKind,
        count: u32,
    },
    ScreenShake {
        intensity: f32,
    },
    FloatingText {
        text: String,
        pos: Vec2,
        color: u32,
    },
}

/// Current run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    GameOver,
}

/// Input snapshot for a single tick; the core never registers listeners
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump / jetpack held
    pub jump: bool,
    /// Aim target in world coordinates
    pub aim: Vec2,
    /// Primary action held (charge, release to fire)
    pub fire_held: bool,
    /// One-shot edge: drop a lure
    pub drop_lure: bool,
    /// One-shot edge: open a nearby bonus crate
    pub interact: bool,
}

/// Complete simulation state for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub seed: u64,
    rng: Pcg32,
    pub terrain: TerrainField,
    pub player: Player,
    pub creatures: Vec<Creature>,
    pub projectiles: Vec<Projectile>,
    pub lures: Vec<Lure>,
    pub coins: Vec<Coin>,
    pub obstacles: Vec<Obstacle>,
    pub burrows: Vec<Burrow>,
    pub crates: Vec<BonusCrate>,
    pub camera_x: f32,
    pub view_width: f32,
    pub view_height: f32,
    /// Rightmost x content has been generated up to
    pub last_generated_x: f32,
    /// Where the run began, for distance-gated features
    pub start_x: f32,
    pub tick_count: u64,
    pub phase: GamePhase,
    /// Raised when lives hit zero, consumed on the next tick
    game_over_pending: bool,
    /// Cosmetic countdown after a lure-all purchase
    pub lure_all_reset: u32,
    next_id: u32,
    /// Per-tick event queue, drained by the embedder
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl World {
    /// Build a fresh run from a seed and the viewport size. Resizing the
    /// viewport later only affects camera framing, never simulation state.
    pub fn new(seed: u64, view_width: f32, view_height: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = TerrainField::new(view_height - 100.0, &mut rng);
        let start_x = 200.0;
        let player = Player::new(Vec2::new(start_x, terrain.height(start_x) - 50.0));

        let mut world = Self {
            seed,
            rng,
            terrain,
            player,
            creatures: Vec::new(),
            projectiles: Vec::new(),
            lures: Vec::new(),
            coins: Vec::new(),
            obstacles: Vec::new(),
            burrows: Vec::new(),
            crates: Vec::new(),
            camera_x: 0.0,
            view_width,
            view_height,
            last_generated_x: 0.0,
            start_x,
            tick_count: 0,
            phase: GamePhase::Playing,
            game_over_pending: false,
            lure_all_reset: 0,
            next_id: 1,
            events: Vec::new(),
        };
        stream::generate_ahead(&mut world);
        world
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, input: &TickInput) {
        self.events.clear();

        if self.phase == GamePhase::GameOver {
            return;
        }
        if self.game_over_pending {
            self.game_over_pending = false;
            self.phase = GamePhase::GameOver;
            log::info!(
                "game over at tick {} after {:.0} units",
                self.tick_count,
                self.player.body.pos.x - self.start_x
            );
            return;
        }

        self.tick_count += 1;
        if self.lure_all_reset > 0 {
            self.lure_all_reset -= 1;
        }

        // Camera follows the player forward, never backward
        let target = self.player.body.pos.x - self.view_width * 0.3;
        if target > self.camera_x {
            self.camera_x = crate::approach(self.camera_x, target, 0.1);
        }

        stream::generate_ahead(self);

        // Player integration and intents
        let actions = self
            .player
            .update(input, &self.terrain, self.camera_x, &mut self.events);
        if let Some(cmd) = actions.fire {
            // One live harpoon per player: firing while one exists is a no-op
            if self.projectiles.is_empty() {
                self.projectiles
                    .push(Projectile::new(cmd.pos, cmd.angle, cmd.power, cmd.max_life));
            }
        }
        if actions.drop_lure {
            let id = self.next_entity_id();
            self.lures.push(Lure::new(id, self.player.body.pos));
            self.events.push(GameEvent::SpawnParticles {
                pos: self.player.body.pos,
                kind: ParticleKind::Dust,
                count: 4,
            });
        }

        // Simple bodies
        let player_pos = self.player.body.pos;
        for projectile in &mut self.projectiles {
            projectile.update(&self.terrain, player_pos);
        }
        for lure in &mut self.lures {
            lure.update(&self.terrain);
        }
        for coin in &mut self.coins {
            coin.update(&self.terrain);
        }
        for bonus in &mut self.crates {
            bonus.update();
        }

        // Creature AI
        let player_vel = self.player.body.vel;
        let pull_speed = self.player.upgrades.pull_speed();
        let mut player_was_hit = false;
        let mut rewards: Vec<Vec2> = Vec::new();
        for creature in &mut self.creatures {
            let mut ctx = CreatureCtx {
                terrain: &self.terrain,
                lures: &mut self.lures,
                obstacles: &self.obstacles,
                player_pos,
                player_vel,
                pull_speed,
                camera_x: self.camera_x,
                view_width: self.view_width,
                despawn_y: DESPAWN_ABOVE,
            };
            let signals = creature.update(&mut ctx, &mut self.rng);
            player_was_hit |= signals.stunned_player;
            if let Some(pos) = signals.reward_at {
                rewards.push(pos);
            }
        }
        if player_was_hit && self.player.invincibility == 0 {
            self.player.stun();
            self.events.push(GameEvent::FloatingText {
                text: "STUN!".into(),
                pos: player_pos - Vec2::new(0.0, 80.0),
                color: text_color::WARNING,
            });
            self.events.push(GameEvent::ScreenShake { intensity: 0.5 });
        }
        for pos in rewards {
            for _ in 0..EXTRACT_COINS {
                let coin = Coin::pop(pos, &mut self.rng);
                self.coins.push(coin);
            }
            self.events.push(GameEvent::SpawnParticles {
                pos,
                kind: ParticleKind::Spark,
                count: 12,
            });
        }

        self.resolve_collisions();
        self.apply_economy(input);

        stream::evict_behind(self);
    }

    /// Obstacle resolution, harpoon captures and delivery bookkeeping
    fn resolve_collisions(&mut self) {
        for obstacle in &self.obstacles {
            resolve_obstacle(&mut self.player.body, obstacle);
        }

        for creature in &mut self.creatures {
            if !matches!(
                creature.state,
                CreatureState::Eating | CreatureState::Attacking | CreatureState::Fleeing
            ) {
                continue;
            }
            for obstacle in &self.obstacles {
                let was_grounded = creature.body.grounded;
                if let Some(Contact::Side) = resolve_obstacle(&mut creature.body, obstacle) {
                    if was_grounded {
                        // The clumsy path: hop over it or trip
                        creature.on_obstacle_bump(&mut self.rng);
                    }
                }
            }
        }

        // Captures: one creature per harpoon, ever
        for projectile in &mut self.projectiles {
            if projectile.state != ProjectileState::Flying || projectile.captured.is_some() {
                continue;
            }
            if let Some(creature) = self.creatures.iter_mut().find(|c| {
                c.active
                    && c.capturable()
                    && (c.body.pos - projectile.pos).length() < CAPTURE_RADIUS
            }) {
                projectile.captured = Some(creature.id);
                creature.capture();
                log::debug!("captured creature {}", creature.id);
                self.events.push(GameEvent::ScreenShake { intensity: 0.3 });
            }
        }

        // Slave captured harpoons to their creature; release on delivery or
        // if the creature is gone
        for projectile in &mut self.projectiles {
            let Some(id) = projectile.captured else {
                continue;
            };
            match self.creatures.iter().find(|c| c.id == id && c.active) {
                Some(creature) if creature.state == CreatureState::Captured => {
                    projectile.pos = creature.body.pos;
                }
                Some(_) | None => {
                    projectile.active = false;
                }
            }
        }
    }

    /// Currency and life deltas, pickups and interact purchases
    fn apply_economy(&mut self, input: &TickInput) {
        let player_pos = self.player.body.pos;
        let magnet_radius = self.player.upgrades.magnet_radius();

        // Coin magnetism and pickup
        let mut collected: i64 = 0;
        for coin in &mut self.coins {
            if !coin.active {
                continue;
            }
            let to_player = player_pos - coin.pos;
            let dist = to_player.length();
            if dist < COIN_PICKUP_RADIUS {
                coin.active = false;
                collected += coin.value;
            } else if dist < magnet_radius {
                coin.vel += to_player.normalize_or_zero() * MAGNET_PULL;
            }
        }
        if collected > 0 {
            self.player.money += collected;
            self.events.push(GameEvent::FloatingText {
                text: format!("+${collected}"),
                pos: player_pos - Vec2::new(0.0, 50.0),
                color: text_color::REWARD,
            });
            self.events.push(GameEvent::SpawnParticles {
                pos: player_pos,
                kind: ParticleKind::Spark,
                count: 3,
            });
        }

        // Escaped creatures cost money
        for creature in &mut self.creatures {
            if creature.has_escaped && creature.active {
                creature.active = false;
                self.player.money -= ESCAPE_PENALTY;
                self.events.push(GameEvent::FloatingText {
                    text: format!("-${ESCAPE_PENALTY}"),
                    pos: player_pos - Vec2::new(0.0, 50.0),
                    color: text_color::PENALTY,
                });
            }
            // Creatures that fell into a pit are simply gone
            if creature.active
                && creature.state != CreatureState::Extracting
                && creature.body.past_kill_zone(&self.terrain)
            {
                creature.active = false;
            }
        }

        // Bonus crates opened in place
        if input.interact {
            let money = self.player.money;
            if let Some(bonus) = self.crates.iter_mut().find(|b| {
                !b.opened && (b.pos - player_pos).length() < CRATE_REACH && money >= b.price
            }) {
                bonus.opened = true;
                self.player.money -= bonus.price;
                // Pays out ~1.5x the price in coins
                let count = (bonus.price * 3 / 2) / super::loot::COIN_VALUE;
                let pos = bonus.pos;
                let price = bonus.price;
                for _ in 0..count {
                    let coin = Coin::pop(pos, &mut self.rng);
                    self.coins.push(coin);
                }
                self.events.push(GameEvent::FloatingText {
                    text: format!("-${price}"),
                    pos,
                    color: text_color::PENALTY,
                });
                self.events.push(GameEvent::ScreenShake { intensity: 0.2 });
                log::debug!("opened bonus crate for ${price}");
            }
        }

        // Kill zone: pure free fall, no cushioned catch
        if self.player.body.past_kill_zone(&self.terrain) {
            self.player.lose_life();
            self.events.push(GameEvent::ScreenShake { intensity: 0.8 });
            if self.player.lives == 0 {
                self.game_over_pending = true;
            } else {
                self.respawn_player();
            }
        }
    }

    fn respawn_player(&mut self) {
        let x = self.camera_x + self.view_width * 0.3;
        self.player.body.pos = Vec2::new(x, self.terrain.rest_height - 200.0);
        self.player.body.vel = Vec2::ZERO;
        self.player.body.in_pit = false;
        log::info!("respawn at x={x:.0}, {} lives left", self.player.lives);
    }

    // Upgrade-panel entry points, called by the embedding UI between ticks.

    /// Buy one level of a stat; false when unaffordable or maxed
    pub fn buy_stat(&mut self, kind: StatKind) -> bool {
        let money = &mut self.player.money;
        self.player.upgrades.buy(kind, money)
    }

    /// Restore one life for a flat price
    pub fn buy_medkit(&mut self) -> bool {
        if self.player.money < MEDKIT_COST || self.player.lives >= self.player.max_lives {
            return false;
        }
        self.player.money -= MEDKIT_COST;
        self.player.lives += 1;
        self.events.push(GameEvent::FloatingText {
            text: "+1 LIFE".into(),
            pos: self.player.body.pos - Vec2::new(0.0, 80.0),
            color: text_color::REWARD,
        });
        true
    }

    /// Plant an irresistible lure at the player that wakes every concealed
    /// creature in the window
    pub fn buy_lure_all(&mut self) -> bool {
        if self.player.money < LURE_ALL_COST {
            return false;
        }
        self.player.money -= LURE_ALL_COST;
        let id = self.next_entity_id();
        let mut lure = Lure::new(id, self.player.body.pos);
        lure.irresistible = true;
        self.lures.push(lure);
        self.lure_all_reset = LURE_ALL_RESET_TICKS;
        self.events.push(GameEvent::FloatingText {
            text: "LURE ALL!".into(),
            pos: self.player.body.pos - Vec2::new(0.0, 80.0),
            color: text_color::REWARD,
        });
        true
    }

    /// Distance traveled in display meters
    pub fn distance_m(&self) -> u64 {
        ((self.player.body.pos.x - self.start_x).max(0.0) / 100.0) as u64
    }
}
