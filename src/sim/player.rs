//! The player: movement, jetpack, harpoon charging, lives and wallet

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::economy::Upgrades;
use super::terrain::TerrainField;
use super::world::{GameEvent, ParticleKind, TickInput};
use crate::aim_angle;
use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};

/// Ground jump impulse
const JUMP_FORCE: f32 = -10.0;
/// Jetpack thrust per tick while held airborne
const JETPACK_THRUST: f32 = -0.58;
/// Fuel burned per jetpack tick
const FUEL_BURN: f32 = 0.6;
/// Fuel regained per grounded tick
const FUEL_REGEN: f32 = 0.8;
/// Extra air control while thrusting
const AIR_CONTROL: f32 = 0.25;
/// Charge cap for a shot
const CHARGE_MAX: f32 = 30.0;
/// Power added to every shot on top of the charge
const FIRE_BASE_POWER: f32 = 12.0;
/// Ticks between lure drops
const LURE_COOLDOWN: u32 = 120;
/// Ticks of lost input after a creature lands a hit
pub const STUN_DURATION: u32 = 60;
/// Ticks of post-respawn grace
pub const INVINCIBILITY_TICKS: u32 = 120;
/// Lives granted at the start and the cap for medkits
pub const START_LIVES: u32 = 3;
pub const MAX_LIVES: u32 = 5;

/// A shot released this tick, to be turned into a projectile by the world
#[derive(Debug, Clone, Copy)]
pub struct FireCommand {
    pub pos: Vec2,
    pub angle: f32,
    pub power: f32,
    pub max_life: u32,
}

/// Side effects of a player tick the world must apply
#[derive(Debug, Default)]
pub struct PlayerActions {
    pub fire: Option<FireCommand>,
    pub drop_lure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Harpoon aim, from the input's world-space target
    pub arm_angle: f32,
    pub charge: f32,
    pub charging: bool,
    pub fuel: f32,
    pub money: i64,
    pub lives: u32,
    pub max_lives: u32,
    pub invincibility: u32,
    pub stun_timer: u32,
    pub upgrades: Upgrades,
    lure_cooldown: u32,
    was_jump_held: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, PLAYER_WIDTH, PLAYER_HEIGHT),
            arm_angle: 0.0,
            charge: 0.0,
            charging: false,
            fuel: 100.0,
            money: 0,
            lives: START_LIVES,
            max_lives: MAX_LIVES,
            invincibility: 0,
            stun_timer: 0,
            upgrades: Upgrades::default(),
            lure_cooldown: 0,
            was_jump_held: false,
        }
    }

    pub fn update(
        &mut self,
        input: &TickInput,
        terrain: &TerrainField,
        camera_x: f32,
        events: &mut Vec<GameEvent>,
    ) -> PlayerActions {
        let mut actions = PlayerActions::default();

        if self.invincibility > 0 {
            self.invincibility -= 1;
        }
        let stunned = self.stun_timer > 0;
        if stunned {
            self.stun_timer -= 1;
        }

        let max_fuel = self.upgrades.max_fuel();
        let speed = self.upgrades.move_speed();

        if !stunned {
            if input.move_left {
                self.body.vel.x -= speed;
            }
            if input.move_right {
                self.body.vel.x += speed;
            }

            if input.jump {
                if self.body.grounded && !self.was_jump_held {
                    self.body.vel.y = JUMP_FORCE;
                    self.body.grounded = false;
                    self.body.squash(0.7, 1.4);
                } else if !self.body.grounded && self.fuel > 0.0 {
                    self.body.vel.y += JETPACK_THRUST;
                    self.fuel -= FUEL_BURN;
                    if input.move_left {
                        self.body.vel.x -= AIR_CONTROL;
                    }
                    if input.move_right {
                        self.body.vel.x += AIR_CONTROL;
                    }
                    events.push(GameEvent::SpawnParticles {
                        pos: self.body.pos + Vec2::new(0.0, 20.0),
                        kind: ParticleKind::Jetpack,
                        count: 1,
                    });
                }
                self.was_jump_held = true;
            } else {
                self.was_jump_held = false;
            }
        }

        if !input.jump && self.body.grounded && self.fuel < max_fuel {
            self.fuel = (self.fuel + FUEL_REGEN).min(max_fuel);
        }
        self.fuel = self.fuel.min(max_fuel);

        if self.lure_cooldown > 0 {
            self.lure_cooldown -= 1;
        }
        if input.drop_lure && self.lure_cooldown == 0 && self.body.grounded && !stunned {
            actions.drop_lure = true;
            self.lure_cooldown = LURE_COOLDOWN;
        }

        self.arm_angle = aim_angle(self.body.pos, input.aim);

        // Charge while held, release to fire
        if input.fire_held && !stunned {
            self.charging = true;
            if self.charge < CHARGE_MAX {
                self.charge = (self.charge + self.upgrades.charge_rate()).min(CHARGE_MAX);
            }
        } else if self.charging {
            actions.fire = Some(FireCommand {
                pos: self.body.pos + Vec2::new(0.0, -10.0),
                angle: self.arm_angle,
                power: self.charge + FIRE_BASE_POWER,
                max_life: self.upgrades.cable_life(),
            });
            self.charging = false;
            self.charge = 0.0;
        }

        // The trailing camera edge shoves the player forward
        if self.body.pos.x < camera_x + 10.0 {
            self.body.pos.x = camera_x + 10.0;
            self.body.vel.x = 8.0;
        }

        self.body.integrate();
        self.body.settle(terrain, 0.1);

        // Lean into the air while airborne
        if !self.body.grounded {
            let target = self.body.vel.x * 0.03;
            self.body.angle = crate::approach(self.body.angle, target, 0.05);
        }

        actions
    }

    /// A creature landed a hit
    pub fn stun(&mut self) {
        if self.invincibility == 0 {
            self.stun_timer = STUN_DURATION;
        }
    }

    /// Fell past the kill zone: burn a life and grant respawn grace
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.invincibility = INVINCIBILITY_TICKS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::FRAC_PI_2;

    fn flat_terrain() -> (TerrainField, f32) {
        let mut rng = Pcg32::seed_from_u64(31);
        let t = TerrainField::new(620.0, &mut rng);
        (t, FRAC_PI_2 / 0.0004)
    }

    fn grounded_player(t: &TerrainField, x: f32) -> Player {
        let mut p = Player::new(Vec2::new(x, t.rest_height - 26.0));
        let mut events = Vec::new();
        p.update(&TickInput::default(), t, x - 600.0, &mut events);
        assert!(p.body.grounded);
        p
    }

    #[test]
    fn test_jump_only_on_fresh_press() {
        let (t, x) = flat_terrain();
        let mut p = grounded_player(&t, x);
        let mut events = Vec::new();

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        p.update(&jump, &t, x - 600.0, &mut events);
        assert!(p.body.vel.y < 0.0, "fresh press must jump");

        // Land again, keep holding: no second ground jump without release
        for _ in 0..300 {
            p.update(&jump, &t, x - 600.0, &mut events);
        }
        assert!(p.body.grounded || p.fuel <= 0.0);
    }

    #[test]
    fn test_jetpack_burns_fuel_and_thrusts() {
        let (t, x) = flat_terrain();
        let mut p = grounded_player(&t, x);
        p.body.grounded = false;
        p.body.pos.y = t.rest_height - 300.0;
        let fuel_before = p.fuel;
        let mut events = Vec::new();

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        // First tick is the edge; second is sustained thrust
        p.update(&jump, &t, x - 600.0, &mut events);
        p.update(&jump, &t, x - 600.0, &mut events);
        assert!(p.fuel < fuel_before);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::SpawnParticles { .. }))
        );
    }

    #[test]
    fn test_fuel_regenerates_on_ground() {
        let (t, x) = flat_terrain();
        let mut p = grounded_player(&t, x);
        p.fuel = 10.0;
        let mut events = Vec::new();
        for _ in 0..200 {
            p.update(&TickInput::default(), &t, x - 600.0, &mut events);
        }
        assert_eq!(p.fuel, p.upgrades.max_fuel());
    }

    #[test]
    fn test_charge_caps_and_fires_on_release() {
        let (t, x) = flat_terrain();
        let mut p = grounded_player(&t, x);
        let mut events = Vec::new();

        let hold = TickInput {
            fire_held: true,
            aim: Vec2::new(x + 500.0, 0.0),
            ..Default::default()
        };
        for _ in 0..200 {
            let actions = p.update(&hold, &t, x - 600.0, &mut events);
            assert!(actions.fire.is_none(), "no fire while held");
        }
        assert_eq!(p.charge, CHARGE_MAX);

        let release = TickInput {
            aim: Vec2::new(x + 500.0, 0.0),
            ..Default::default()
        };
        let actions = p.update(&release, &t, x - 600.0, &mut events);
        let cmd = actions.fire.expect("release must fire");
        assert_eq!(cmd.power, CHARGE_MAX + FIRE_BASE_POWER);
        assert_eq!(cmd.max_life, p.upgrades.cable_life());
        assert_eq!(p.charge, 0.0);
        assert!(!p.charging);
    }

    #[test]
    fn test_lure_drop_has_cooldown() {
        let (t, x) = flat_terrain();
        let mut p = grounded_player(&t, x);
        let mut events = Vec::new();

        let drop = TickInput {
            drop_lure: true,
            ..Default::default()
        };
        let first = p.update(&drop, &t, x - 600.0, &mut events);
        assert!(first.drop_lure);
        let second = p.update(&drop, &t, x - 600.0, &mut events);
        assert!(!second.drop_lure, "cooldown must block immediate re-drop");

        for _ in 0..LURE_COOLDOWN {
            p.update(&TickInput::default(), &t, x - 600.0, &mut events);
        }
        let third = p.update(&drop, &t, x - 600.0, &mut events);
        assert!(third.drop_lure);
    }

    #[test]
    fn test_stun_blocks_movement_input() {
        let (t, x) = flat_terrain();
        let mut p = grounded_player(&t, x);
        p.stun();
        let mut events = Vec::new();

        let run = TickInput {
            move_right: true,
            ..Default::default()
        };
        p.update(&run, &t, x - 600.0, &mut events);
        assert!(p.body.vel.x.abs() < 0.01, "stunned player must not run");
    }

    #[test]
    fn test_trailing_edge_shoves_player_forward() {
        let (t, x) = flat_terrain();
        let mut p = grounded_player(&t, x);
        let mut events = Vec::new();
        // Camera well ahead of the player
        p.update(&TickInput::default(), &t, x + 200.0, &mut events);
        assert!(p.body.pos.x >= x + 200.0 + 10.0 - 1e-3);
    }

    #[test]
    fn test_lose_life_grants_invincibility() {
        let mut p = Player::new(Vec2::ZERO);
        assert_eq!(p.lives, START_LIVES);
        p.lose_life();
        assert_eq!(p.lives, START_LIVES - 1);
        assert_eq!(p.invincibility, INVINCIBILITY_TICKS);
        // Grace also shrugs off stuns
        p.stun();
        assert_eq!(p.stun_timer, 0);
    }
}
