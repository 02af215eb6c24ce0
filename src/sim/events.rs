//! Notifications emitted by the simulation for rendering and audio.
//!
//! Events are queued during a tick and handed out by `GameState::drain_events`;
//! the presentation layer never has to diff state to learn what happened.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind};

/// Why an entity left the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    /// Hit by a projectile
    Shot,
    /// Body-to-body contact (or a projectile that struck something)
    Collision,
    /// TTL ran out
    Expired,
    /// Removed by a round reset
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    EntityCreated {
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
    },
    EntityDestroyed {
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
        cause: DestroyCause,
    },
    ScoreChanged {
        score: u64,
        delta: u64,
    },
    LifeLost {
        lives_remaining: u8,
    },
    /// Ship used hyperspace
    ShipJumped {
        id: EntityId,
        from: Vec2,
        to: Vec2,
    },
    RoundStarted,
    WaveStarted {
        wave: u32,
        asteroids: u32,
    },
    WaveCleared {
        wave: u32,
    },
    GameOver {
        score: u64,
        wave: u32,
    },
}
