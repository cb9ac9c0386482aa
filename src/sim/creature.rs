//! Per-creature behavior machine
//!
//! Creatures hide under the terrain, peek out when a lure is near and the
//! player keeps its distance, eat the lure, then flee (or turn on the player).
//! A harpoon hit drags them back for extraction. Personality is rolled once at
//! creation and modulates the numbers, not the structure.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::loot::{Lure, lookup_lure};
use super::obstacle::Obstacle;
use super::terrain::TerrainField;
use crate::consts::{CREATURE_HEIGHT, CREATURE_WIDTH, DELIVER_RADIUS, ESCAPE_MARGIN};

/// Horizontal range within which a lure wakes a concealed creature
const LURE_RANGE: f32 = 220.0;
/// Rise rate while emerging from the ground
const EMERGE_RATE: f32 = 1.2;
/// Ticks spent chewing before the lure is consumed
const EAT_TICKS: u32 = 80;
/// Walk speed toward a lure
const EAT_SPEED: f32 = 1.8;
/// Base flee speed, scaled by personality
const FLEE_SPEED: f32 = 6.0;
/// Base charge speed while attacking
const ATTACK_SPEED: f32 = 7.5;
/// Contact range for a successful attack
const ATTACK_RANGE: f32 = 35.0;
/// Beyond this distance an attacker gives up
const ATTACK_GIVE_UP: f32 = 600.0;
/// Player alert distance while eating
const ALERT_RANGE: f32 = 180.0;
/// Sustained off-screen ticks before a fleeing creature counts as escaped
const ESCAPE_TICKS: u32 = 90;
/// Forward probe distance for obstacle/ledge checks
const LOOKAHEAD: f32 = 45.0;
/// Upward acceleration during extraction
const EXTRACT_ACCEL: f32 = 0.35;
/// Height above the rest line at which extraction pays out
const REWARD_ALTITUDE: f32 = 250.0;
/// Ticks a stunned creature stays put
const STUN_TICKS: u32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatureState {
    /// Locked below the ground line, waiting for a lure
    Hidden,
    /// Head above ground, counting down to a full emerge
    Peeking,
    /// Rising to the surface
    Emerging,
    /// Walking to and consuming the target lure
    Eating,
    /// Charging the player
    Attacking,
    /// Running away; terminal once off-screen long enough
    Fleeing,
    /// Snagged by a harpoon, dragged toward the player
    Captured,
    /// Delivered; rising off-screen for the payout
    Extracting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Personality {
    Coward,
    Aggressive,
    Crazy,
}

impl Personality {
    /// Roll a personality with the fixed 50/30/20 split
    pub fn roll(rng: &mut impl Rng) -> Self {
        let r = rng.random::<f32>();
        if r < 0.5 {
            Self::Coward
        } else if r < 0.8 {
            Self::Aggressive
        } else {
            Self::Crazy
        }
    }

    fn speed_mult(self) -> f32 {
        match self {
            Self::Coward => 1.1,
            Self::Aggressive => 1.0,
            Self::Crazy => 1.25,
        }
    }

    /// Probability an obstacle check is skipped outright
    fn clumsiness(self) -> f32 {
        match self {
            Self::Coward => 0.1,
            Self::Aggressive => 0.2,
            Self::Crazy => 0.45,
        }
    }

    /// Players closer than this keep the creature in hiding; aggressive
    /// creatures tolerate closer company
    fn detect_distance(self) -> f32 {
        match self {
            Self::Coward => 350.0,
            Self::Aggressive => 220.0,
            Self::Crazy => 300.0,
        }
    }

    /// Peek duration before emerging; impulsive personalities surface sooner
    fn peek_threshold(self) -> u32 {
        match self {
            Self::Coward => 100,
            Self::Aggressive => 80,
            Self::Crazy => 55,
        }
    }

    /// Chance to turn on the player instead of fleeing when alerted
    fn attack_chance(self) -> f32 {
        match self {
            Self::Aggressive => 0.55,
            _ => 0.0,
        }
    }
}

/// Read-only world view plus the mutable lure list a creature may consume from
pub struct CreatureCtx<'a> {
    pub terrain: &'a TerrainField,
    pub lures: &'a mut [Lure],
    pub obstacles: &'a [Obstacle],
    pub player_pos: Vec2,
    pub player_vel: Vec2,
    /// Reel speed applied while captured (from the player's pull upgrade)
    pub pull_speed: f32,
    pub camera_x: f32,
    pub view_width: f32,
    /// Extracting creatures despawn above this y
    pub despawn_y: f32,
}

/// What a creature did this tick that the world must act on
#[derive(Debug, Default)]
pub struct CreatureSignals {
    /// Landed an attack; the world stuns the player
    pub stunned_player: bool,
    /// Extraction payout point reached; spawn reward coins here
    pub reward_at: Option<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub body: Body,
    pub state: CreatureState,
    pub personality: Personality,
    /// Per-instance jitter on top of the personality's base speed
    pub speed_mult: f32,
    pub jump_force: f32,
    pub clumsiness: f32,
    pub detect_distance: f32,
    pub peek_threshold: u32,
    attack_chance: f32,
    stealth_timer: u32,
    eating_timer: u32,
    off_screen_timer: u32,
    pub stun_timer: u32,
    /// Weak handle into the live lure list; revalidated on every use
    pub target_lure: Option<u32>,
    spawned_reward: bool,
    pub active: bool,
    pub has_escaped: bool,
    /// Animation clock for the renderer
    pub anim: f32,
}

impl Creature {
    pub fn new(id: u32, pos: Vec2, rng: &mut impl Rng) -> Self {
        let personality = Personality::roll(rng);
        Self {
            id,
            body: Body::new(pos, CREATURE_WIDTH, CREATURE_HEIGHT),
            state: CreatureState::Hidden,
            personality,
            speed_mult: personality.speed_mult() * (0.85 + rng.random::<f32>() * 0.3),
            jump_force: -9.2 * (0.9 + rng.random::<f32>() * 0.2),
            clumsiness: personality.clumsiness(),
            detect_distance: personality.detect_distance(),
            peek_threshold: personality.peek_threshold(),
            attack_chance: personality.attack_chance(),
            stealth_timer: 0,
            eating_timer: 0,
            off_screen_timer: 0,
            stun_timer: 0,
            target_lure: None,
            spawned_reward: false,
            active: true,
            has_escaped: false,
            anim: 0.0,
        }
    }

    /// Whether a harpoon may snag this creature
    pub fn capturable(&self) -> bool {
        !matches!(
            self.state,
            CreatureState::Hidden
                | CreatureState::Peeking
                | CreatureState::Captured
                | CreatureState::Extracting
        )
    }

    /// Snag by a harpoon; only valid from a capturable state
    pub fn capture(&mut self) {
        debug_assert!(self.capturable());
        self.state = CreatureState::Captured;
        self.stun_timer = 0;
    }

    /// Grounded bump into an obstacle: hop over it or trip and stall
    pub fn on_obstacle_bump(&mut self, rng: &mut impl Rng) {
        if rng.random::<f32>() < 0.5 {
            self.body.vel.y = self.jump_force;
            self.body.grounded = false;
        } else {
            self.stun_timer = STUN_TICKS;
            self.body.squash(1.3, 0.7);
        }
    }

    pub fn update(&mut self, ctx: &mut CreatureCtx, rng: &mut impl Rng) -> CreatureSignals {
        let mut signals = CreatureSignals::default();

        let to_player = ctx.player_pos - self.body.pos;
        let dist_to_player = to_player.length();
        let ground = ctx.terrain.height(self.body.pos.x);
        let player_moving = ctx.player_vel.x.abs() > 0.4 || ctx.player_vel.y.abs() > 0.5;
        let player_visible = dist_to_player < self.detect_distance && player_moving;

        self.anim += 0.1;

        // A tripped creature stays put for a moment
        if self.stun_timer > 0
            && matches!(
                self.state,
                CreatureState::Eating | CreatureState::Attacking | CreatureState::Fleeing
            )
        {
            self.stun_timer -= 1;
            self.body.vel.x = 0.0;
            self.body.integrate();
            self.body.settle(ctx.terrain, 0.1);
            return signals;
        }

        if !matches!(
            self.state,
            CreatureState::Hidden | CreatureState::Captured | CreatureState::Extracting
        ) {
            self.probe_ahead(ctx, rng);
        }

        // An irresistible lure (the lure-all effect) overrides fear of the
        // player entirely
        let fearless = lookup_lure(ctx.lures, self.target_lure)
            .is_some_and(|idx| ctx.lures[idx].irresistible);
        let spooked = player_visible && !fearless;

        match self.state {
            CreatureState::Hidden => {
                // Held below the ground line, no physics
                let target_y = ground + 50.0;
                self.body.pos.y += (target_y - self.body.pos.y) * 0.1;

                let near_lure = ctx.lures.iter().find(|l| {
                    l.active
                        && (l.irresistible || (l.pos.x - self.body.pos.x).abs() < LURE_RANGE)
                });
                if let Some(lure) = near_lure {
                    if !player_visible || lure.irresistible {
                        self.target_lure = Some(lure.id);
                        self.stealth_timer = 0;
                        self.state = CreatureState::Peeking;
                    }
                }
            }

            CreatureState::Peeking => {
                let target_y = ground - 10.0;
                self.body.pos.y += (target_y - self.body.pos.y) * 0.1;

                if spooked {
                    self.state = CreatureState::Hidden;
                    self.stealth_timer = 0;
                } else {
                    self.stealth_timer += 1;
                    if self.stealth_timer > self.peek_threshold {
                        self.stealth_timer = 0;
                        self.state = CreatureState::Emerging;
                    }
                }
            }

            CreatureState::Emerging => {
                self.body.pos.y -= EMERGE_RATE;
                // Wobble on the way up
                self.body.angle = (self.anim * 2.0).sin() * 0.08;

                if spooked {
                    self.state = CreatureState::Hidden;
                } else if self.body.pos.y <= ground - self.body.height / 2.0 {
                    self.state = CreatureState::Eating;
                }
            }

            CreatureState::Eating => {
                match lookup_lure(ctx.lures, self.target_lure) {
                    Some(idx) => {
                        let lure_x = ctx.lures[idx].pos.x;
                        let dx = lure_x - self.body.pos.x;
                        self.body.vel.x = dx.signum() * EAT_SPEED * self.speed_mult;
                        if dx.abs() < 15.0 {
                            self.body.vel.x = 0.0;
                            self.eating_timer += 1;
                            if self.eating_timer > EAT_TICKS {
                                ctx.lures[idx].active = false;
                                self.eating_timer = 0;
                                self.decide_next_move(rng);
                            }
                        }
                    }
                    // Lure consumed or expired under us: default escape
                    None => self.state = CreatureState::Fleeing,
                }

                if dist_to_player < ALERT_RANGE && player_moving {
                    self.decide_next_move(rng);
                }

                self.body.integrate();
                self.body.settle(ctx.terrain, 0.1);
            }

            CreatureState::Attacking => {
                self.body.vel.x = to_player.x.signum() * ATTACK_SPEED * self.speed_mult;
                self.body.integrate();
                self.body.settle(ctx.terrain, 0.1);

                if dist_to_player < ATTACK_RANGE {
                    signals.stunned_player = true;
                    self.state = CreatureState::Fleeing;
                } else if dist_to_player > ATTACK_GIVE_UP {
                    self.state = CreatureState::Fleeing;
                }
            }

            CreatureState::Fleeing => {
                self.body.vel.x = -to_player.x.signum() * FLEE_SPEED * self.speed_mult;
                self.body.integrate();
                self.body.settle(ctx.terrain, 0.1);

                let off_screen = self.body.pos.x < ctx.camera_x - ESCAPE_MARGIN
                    || self.body.pos.x > ctx.camera_x + ctx.view_width + ESCAPE_MARGIN;
                if off_screen {
                    self.off_screen_timer += 1;
                    if self.off_screen_timer > ESCAPE_TICKS {
                        self.has_escaped = true;
                    }
                } else {
                    self.off_screen_timer = 0;
                }
            }

            CreatureState::Captured => {
                let dir = to_player.normalize_or_zero();
                self.body.vel = dir * ctx.pull_speed;
                self.body.pos += self.body.vel;
                self.body.angle += 0.4;

                if dist_to_player < DELIVER_RADIUS {
                    self.body.vel = Vec2::ZERO;
                    self.state = CreatureState::Extracting;
                }
            }

            CreatureState::Extracting => {
                self.body.vel.y -= EXTRACT_ACCEL;
                self.body.pos.y += self.body.vel.y;
                self.body.angle += 0.3;

                if !self.spawned_reward
                    && self.body.pos.y < ctx.terrain.rest_height - REWARD_ALTITUDE
                {
                    self.spawned_reward = true;
                    signals.reward_at = Some(self.body.pos);
                }
                if self.body.pos.y < ctx.despawn_y {
                    self.active = false;
                }
            }
        }

        signals
    }

    fn decide_next_move(&mut self, rng: &mut impl Rng) {
        if rng.random::<f32>() < self.attack_chance {
            self.state = CreatureState::Attacking;
        } else {
            self.state = CreatureState::Fleeing;
        }
    }

    /// Grounded lookahead: hop terrain steps and obstacles, leap pit edges.
    /// The clumsiness roll can suppress the whole check, leaving the creature
    /// to blunder into whatever is ahead.
    fn probe_ahead(&mut self, ctx: &CreatureCtx, rng: &mut impl Rng) {
        if !self.body.grounded {
            return;
        }

        let mut dir = self.body.vel.x.signum();
        if self.body.vel.x.abs() < 0.1 {
            dir = match self.state {
                CreatureState::Fleeing => -(ctx.player_pos.x - self.body.pos.x).signum(),
                CreatureState::Attacking => (ctx.player_pos.x - self.body.pos.x).signum(),
                _ => match lookup_lure(ctx.lures, self.target_lure) {
                    Some(idx) => (ctx.lures[idx].pos.x - self.body.pos.x).signum(),
                    None => 0.0,
                },
            };
        }
        if dir == 0.0 {
            return;
        }

        if rng.random::<f32>() < self.clumsiness {
            return;
        }

        let probe_x = self.body.pos.x + dir * LOOKAHEAD;
        let next_ground = ctx.terrain.height(probe_x);

        let step_up = next_ground < self.body.pos.y - 15.0
            && next_ground < ctx.terrain.rest_height + 100.0;
        let pit_ahead = ctx.terrain.is_pit(next_ground);

        if step_up {
            self.body.vel.y = self.jump_force;
            self.body.grounded = false;
        } else if pit_ahead {
            // Leap the gap, or balk at the edge
            if rng.random::<f32>() < 0.5 {
                self.body.vel.y = -11.0;
                self.body.vel.x = dir * 8.0;
                self.body.grounded = false;
            }
        } else {
            // Obstacle at similar height dead ahead
            let probe = super::collision::Aabb::new(
                Vec2::new(probe_x, self.body.pos.y),
                Vec2::new(self.body.width / 2.0, self.body.height / 2.0),
            );
            if ctx
                .obstacles
                .iter()
                .any(|o| probe.intersects(&o.aabb()))
            {
                self.body.vel.y = self.jump_force;
                self.body.grounded = false;
            }
        }
    }
}
