//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one frame per tick)
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Embedders construct a [`World`], feed it a [`TickInput`] snapshot per tick,
//! then read entity state and drain [`GameEvent`]s for cosmetic feedback.

pub mod body;
pub mod collision;
pub mod creature;
pub mod economy;
pub mod loot;
pub mod noise;
pub mod obstacle;
pub mod player;
pub mod projectile;
pub mod stream;
pub mod terrain;
pub mod world;

pub use body::Body;
pub use collision::{Aabb, Contact, resolve_obstacle};
pub use creature::{Creature, CreatureState, Personality};
pub use economy::{StatKind, UpgradeStat, Upgrades};
pub use loot::{BonusCrate, Burrow, Coin, Lure};
pub use noise::NoiseField;
pub use obstacle::{Obstacle, ObstacleKind};
pub use player::Player;
pub use projectile::{Projectile, ProjectileState};
pub use terrain::TerrainField;
pub use world::{GameEvent, GamePhase, ParticleKind, TickInput, World};
