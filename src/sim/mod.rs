//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed frame step only
//! - One seeded RNG stream, consumed in a fixed order
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or device dependencies

pub mod arena;
pub mod collision;
pub mod entity;
pub mod events;
pub mod progression;
pub mod saucer;
pub mod ship;
pub mod spawn;
pub mod split;
pub mod state;
pub mod tick;
pub mod timer;

pub use arena::Arena;
pub use collision::{CollisionReport, Interaction, interaction_between, resolve_collisions};
pub use entity::{AsteroidSize, Body, Entity, EntityId, EntityKind, SaucerKind};
pub use events::{DestroyCause, GameEvent};
pub use progression::{GamePhase, Progression};
pub use spawn::{SpawnPlanner, large_asteroids_for_wave, wave_budget};
pub use split::split_asteroid;
pub use state::GameState;
pub use tick::{TickInput, tick};
pub use timer::Countdown;
