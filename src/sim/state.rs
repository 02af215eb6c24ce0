//! Game state and round setup
//!
//! Everything a frame reads or writes lives here: config, the single RNG
//! stream, the arena, progression and the outgoing event queue.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::entity::{AsteroidSize, Entity, EntityId, EntityKind, SaucerKind};
use super::events::{DestroyCause, GameEvent};
use super::progression::{GamePhase, Progression};
use super::spawn::{SpawnPlanner, large_asteroids_for_wave};
use super::timer::Countdown;
use crate::config::GameConfig;

/// Complete simulation state (deterministic for a given seed and input script)
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    /// Shared by every spawn, split and aim decision
    pub rng: Pcg32,
    pub arena: Arena,
    pub progression: Progression,
    /// Simulated frames since creation (Title frames excluded)
    pub frame: u64,
    /// Notifications not yet drained
    pub events: Vec<GameEvent>,
    /// Frames until the scheduled saucer appears
    pub saucer_timer: Countdown,
}

impl GameState {
    /// New state on the title screen. The config is sanitized first.
    pub fn new(seed: u64, config: GameConfig) -> Self {
        let config = config.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena: Arena::new(config.arena_width, config.arena_height),
            progression: Progression::new(&config),
            frame: 0,
            events: Vec::new(),
            saucer_timer: Countdown::idle(),
            config,
        }
    }

    /// Default balance
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, GameConfig::default())
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.progression.phase
    }

    pub fn planner(&self) -> SpawnPlanner {
        SpawnPlanner::from_config(&self.config)
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset score, lives and wave, clear the field, then spawn the ship and wave 1
    pub fn start_round(&mut self) {
        for entity in self.arena.clear() {
            self.events.push(GameEvent::EntityDestroyed {
                id: entity.id,
                kind: entity.kind(),
                pos: entity.pos,
                cause: DestroyCause::Cleared,
            });
        }
        self.progression.reset();
        self.saucer_timer.cancel();
        log::info!("Round started (seed {})", self.seed);
        self.events.push(GameEvent::RoundStarted);

        self.spawn_ship();
        self.spawn_wave();
    }

    /// Advance the wave counter and spawn its large asteroids away from the ship.
    /// Returns how many were spawned.
    pub fn spawn_wave(&mut self) -> u32 {
        let wave = self.progression.advance_wave();
        let count = large_asteroids_for_wave(wave, &self.config);
        let planner = self.planner();
        let ship = self.arena.ship().map(|s| s.pos);

        for _ in 0..count {
            let pos = planner.asteroid_position(&mut self.rng, ship);
            let rock = Entity::random_asteroid(AsteroidSize::Large, pos, &mut self.rng, &self.config);
            self.arena.introduce(rock, &mut self.events);
        }
        self.arena.commit();

        log::info!("Wave {}: {} large asteroids", wave, count);
        self.events.push(GameEvent::WaveStarted { wave, asteroids: count });
        count
    }

    /// Place a fresh, invulnerable ship clear of the asteroids. `None` if one
    /// already exists.
    pub fn spawn_ship(&mut self) -> Option<EntityId> {
        if self.arena.count_including_pending(EntityKind::Ship) > 0 {
            return None;
        }
        let asteroids: Vec<Vec2> = self.arena.iter_kind(EntityKind::Asteroid).map(|e| e.pos).collect();
        let pos = self.planner().ship_position(&mut self.rng, &asteroids);
        let id = self.arena.introduce(Entity::ship(pos, &self.config), &mut self.events);
        self.arena.commit();
        Some(id)
    }

    /// Send a saucer across the field. `None` if one is already out.
    pub fn spawn_saucer(&mut self, kind: SaucerKind, accuracy: f32) -> Option<EntityId> {
        if self.arena.count_including_pending(EntityKind::Saucer) > 0 {
            return None;
        }
        let saucer = self.planner().saucer(kind, accuracy, &mut self.rng, &self.config);
        let id = self.arena.introduce(saucer, &mut self.events);
        self.arena.commit();
        log::info!("{:?} saucer {} entered on wave {}", kind, id, self.progression.wave);
        Some(id)
    }

    /// Scheduled saucers: one at a time while playing, after a random interval
    pub(super) fn advance_saucer_schedule(&mut self) {
        let schedule = &self.config.saucer_schedule;
        if !schedule.enabled
            || self.progression.phase != GamePhase::Playing
            || self.arena.count(EntityKind::Saucer) > 0
        {
            return;
        }
        let (lo, hi) = schedule.interval_frames;
        let small_from_wave = schedule.small_from_wave;
        let accuracy = schedule.accuracy;

        if !self.saucer_timer.is_running() {
            self.saucer_timer.start(self.rng.random_range(lo..=hi));
            return;
        }
        if self.saucer_timer.tick() {
            let kind = if self.progression.wave >= small_from_wave {
                SaucerKind::Small
            } else {
                SaucerKind::Large
            };
            self.spawn_saucer(kind, accuracy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaucerSchedule;

    #[test]
    fn test_new_state_waits_on_title() {
        let state = GameState::with_seed(1);
        assert_eq!(state.phase(), GamePhase::Title);
        assert!(state.arena.is_empty());
    }

    #[test]
    fn test_start_round_spawns_ship_and_first_wave() {
        let mut state = GameState::with_seed(7);
        state.start_round();

        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.progression.wave, 1);
        assert_eq!(state.arena.count(EntityKind::Ship), 1);
        assert_eq!(state.arena.count(EntityKind::Asteroid), 5);

        let ship = state.arena.ship().unwrap();
        assert_eq!(ship.pos, state.arena.center());
        assert!(ship.is_invulnerable());
        for rock in state.arena.iter_kind(EntityKind::Asteroid) {
            assert!(rock.pos.distance(ship.pos) >= state.config.safe_spawn_radius);
            assert_eq!(rock.as_asteroid().unwrap().size, AsteroidSize::Large);
        }

        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::RoundStarted);
        assert!(events.contains(&GameEvent::WaveStarted { wave: 1, asteroids: 5 }));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_restart_clears_field() {
        let mut state = GameState::with_seed(7);
        state.start_round();
        state.progression.score = 500;
        state.drain_events();

        state.start_round();
        assert_eq!(state.progression.score, 0);
        assert_eq!(state.arena.count(EntityKind::Asteroid), 5);
        let cleared = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::EntityDestroyed { cause: DestroyCause::Cleared, .. }))
            .count();
        assert_eq!(cleared, 6);
    }

    #[test]
    fn test_only_one_ship_and_saucer() {
        let mut state = GameState::with_seed(3);
        state.start_round();
        assert!(state.spawn_ship().is_none());
        assert!(state.spawn_saucer(SaucerKind::Large, 0.5).is_some());
        assert!(state.spawn_saucer(SaucerKind::Small, 0.5).is_none());
    }

    #[test]
    fn test_minimum_three_large_asteroids() {
        let config = GameConfig {
            base_large_count: 1,
            ..Default::default()
        };
        let mut state = GameState::new(5, config);
        state.start_round();
        assert_eq!(state.arena.count(EntityKind::Asteroid), 3);
    }

    #[test]
    fn test_saucer_schedule() {
        let config = GameConfig {
            saucer_schedule: SaucerSchedule {
                enabled: true,
                interval_frames: (5, 5),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut state = GameState::new(9, config);
        state.start_round();

        // One frame arms the timer, five more run it down
        for _ in 0..5 {
            state.advance_saucer_schedule();
            assert_eq!(state.arena.count(EntityKind::Saucer), 0);
        }
        state.advance_saucer_schedule();
        let saucer = state.arena.iter_kind(EntityKind::Saucer).next().unwrap();
        assert_eq!(saucer.as_saucer().unwrap().kind, SaucerKind::Large);
    }
}
