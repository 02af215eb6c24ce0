//! Fixed-step simulation tick
//!
//! One call advances the game by one frame. Stage order within a frame:
//! progression timers, entity updates, wraparound, collisions, reap/commit,
//! wave-clear detection.

use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::entity::{EntityKind, UpdateContext};
use super::progression::GamePhase;
use super::state::GameState;
use crate::{heading_delta, vector_heading};

/// Autopilot thrusts toward targets further than this
const AUTOPILOT_APPROACH_DISTANCE: f32 = 260.0;
/// Autopilot fires when the target is within this many degrees of the nose
const AUTOPILOT_FIRE_CONE: f32 = 8.0;
/// Frames of straight-line motion the autopilot projects when looking for impacts
const AUTOPILOT_LOOKAHEAD: f32 = 10.0;

/// Player intents for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub thrust: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Level-triggered; the ship's cooldown and bullet cap limit the rate
    pub fire: bool,
    pub hyperspace: bool,
    /// Start/restart, edge-triggered on the title and game-over screens
    pub start: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        input.clone()
    };

    let start = state.progression.start_edge(input.start);
    let phase = state.phase();
    if phase.awaits_start() && start {
        state.start_round();
        return;
    }
    if phase == GamePhase::Title {
        return;
    }

    state.frame += 1;

    if phase.in_round() {
        advance_timers(state);
    }

    update_entities(state, &input);
    state.arena.wrap_all();

    let report = resolve_collisions(
        &mut state.arena,
        &mut state.progression,
        &mut state.rng,
        &state.config,
        &mut state.events,
    );
    if report.ship_destroyed {
        log::debug!("Frame {}: ship destroyed", state.frame);
    }

    state.arena.reap();
    state.arena.commit();

    let asteroids = state.arena.count(EntityKind::Asteroid);
    state.progression.check_wave_cleared(asteroids, &mut state.events);
}

/// Respawn, next wave and saucer schedule
fn advance_timers(state: &mut GameState) {
    let expiry = state.progression.tick_timers();
    if expiry.respawn && state.arena.ship().is_none() {
        state.spawn_ship();
    }
    if expiry.next_wave {
        state.spawn_wave();
    }
    state.advance_saucer_schedule();
}

/// Every live entity integrates one frame in id order. Anything fired is
/// queued and becomes visible at the end of the frame.
fn update_entities(state: &mut GameState, input: &TickInput) {
    let ship_pos = state.arena.ship().map(|s| s.pos);
    let player_bullets = state.arena.count(EntityKind::PlayerBullet);
    let mut spawned = Vec::new();

    let GameState {
        config,
        rng,
        arena,
        events,
        ..
    } = state;
    let mut ctx = UpdateContext {
        config,
        input,
        rng,
        ship_pos,
        player_bullets,
        spawned: &mut spawned,
        events: &mut *events,
    };
    for entity in arena.slots_mut() {
        entity.update(&mut ctx);
    }

    for entity in spawned {
        arena.introduce(entity, events);
    }
}

/// Synthesize inputs for demo play: restart when idle, turn toward and shoot
/// the nearest target, close distance, and jump away from an imminent impact.
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();

    if state.phase().awaits_start() {
        // Alternate so the start edge registers
        input.start = !state.progression.start_held;
        return input;
    }

    let Some(ship) = state.arena.ship() else {
        return input;
    };
    let Some(data) = ship.as_ship() else {
        return input;
    };
    let config = &state.config;

    let target = state
        .arena
        .nearest(ship.pos, EntityKind::Saucer)
        .or_else(|| state.arena.nearest(ship.pos, EntityKind::Asteroid));
    if let Some(target) = target {
        let desired = vector_heading(target.pos - ship.pos);
        let delta = heading_delta(data.heading, desired);
        let deadband = config.ship_turn_rate / 2.0;
        input.turn_left = delta < -deadband;
        input.turn_right = delta > deadband;
        input.fire = delta.abs() <= AUTOPILOT_FIRE_CONE;
        input.thrust = ship.pos.distance(target.pos) > AUTOPILOT_APPROACH_DISTANCE
            && ship.vel.length() < config.ship_max_speed * 0.5;
    }

    let projected = ship.pos + ship.vel * AUTOPILOT_LOOKAHEAD;
    input.hyperspace = !ship.is_invulnerable()
        && state.arena.iter_kind(EntityKind::Asteroid).any(|rock| {
            let rock_next = rock.pos + rock.vel * AUTOPILOT_LOOKAHEAD;
            rock_next.distance(projected) <= rock.radius + ship.radius
        });

    input
}
