//! Static obstacles scattered along the trail

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Obstacle flavor; selects box dimensions only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Stump,
    Rock,
    Log,
}

impl ObstacleKind {
    /// Width and height of the obstacle's box
    pub fn size(self) -> Vec2 {
        match self {
            Self::Stump => Vec2::new(45.0, 40.0),
            Self::Rock => Vec2::new(70.0, 60.0),
            Self::Log => Vec2::new(120.0, 40.0),
        }
    }
}

/// An axis-aligned static box; immutable after creation, removed only by
/// rear eviction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(pos: Vec2, kind: ObstacleKind) -> Self {
        Self { pos, kind }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            center: self.pos,
            half: self.kind.size() / 2.0,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.kind.size().y / 2.0
    }
}
