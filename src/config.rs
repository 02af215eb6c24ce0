//! Game balance configuration
//!
//! Every tunable the simulation reads lives here. Partial JSON files are accepted;
//! missing fields fall back to the classic arcade values.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Optional periodic saucer spawning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaucerSchedule {
    /// Spawn saucers automatically while a wave is in play
    pub enabled: bool,
    /// Frames between saucer appearances (min, max inclusive)
    pub interval_frames: (u32, u32),
    /// First wave on which the small (accurate) saucer appears
    pub small_from_wave: u32,
    /// Accuracy given to scheduled saucers (0..=1)
    pub accuracy: f32,
}

impl Default for SaucerSchedule {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_frames: (600, 1200),
            small_from_wave: 3,
            accuracy: 0.5,
        }
    }
}

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Waves ===
    /// Large asteroids in wave 1 before the minimum of three is applied
    pub base_large_count: u32,
    /// Geometric growth of the wave budget
    pub wave_growth: f32,
    /// Minimum distance between a new asteroid and the ship
    pub safe_spawn_radius: f32,
    /// Pause between clearing a wave and spawning the next (frames)
    pub wave_clear_delay: u32,

    // === Lives ===
    pub initial_lives: u8,
    /// Frames between losing a ship and the respawn
    pub respawn_delay: u32,
    /// Invulnerability after (re)spawn (frames)
    pub invulnerability_frames: u32,

    // === Ship ===
    /// Acceleration per frame while thrusting (px/frame²)
    pub ship_thrust: f32,
    /// Velocity multiplier applied every frame
    pub ship_drag: f32,
    pub ship_max_speed: f32,
    /// Degrees per frame
    pub ship_turn_rate: f32,
    pub fire_cooldown: u32,
    pub max_player_bullets: usize,
    pub hyperspace_cooldown: u32,
    /// Invulnerability granted by a hyperspace jump (frames)
    pub hyperspace_invulnerability: u32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_ttl: u32,
    /// Frames after firing during which a bullet collides with nothing
    pub bullet_grace_frames: u32,
    pub enemy_bullet_speed: f32,
    pub enemy_bullet_ttl: u32,

    // === Asteroid splitting ===
    /// Separation impulse along the impact direction
    pub split_impulse: f32,
    /// Fraction of the parent velocity inherited by each child
    pub split_inheritance: f32,
    /// Spin is drawn from ±this (degrees per frame)
    pub asteroid_spin_max: f32,
    /// Minimum absolute spin (degrees per frame)
    pub asteroid_spin_floor: f32,

    // === Saucer ===
    pub saucer_speed: f32,
    /// Maximum vertical drift (px/frame)
    pub saucer_drift: f32,
    pub saucer_ttl: u32,
    /// Frames between saucer shots (min, max inclusive)
    pub saucer_fire_interval: (u32, u32),
    /// Angular noise at zero accuracy, large saucer (degrees)
    pub saucer_noise_large: f32,
    /// Angular noise at zero accuracy, small saucer (degrees)
    pub saucer_noise_small: f32,
    pub saucer_schedule: SaucerSchedule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: 900.0,
            arena_height: 700.0,

            base_large_count: 5,
            wave_growth: 1.25,
            safe_spawn_radius: 140.0,
            wave_clear_delay: 60,

            initial_lives: 3,
            respawn_delay: 45,
            invulnerability_frames: 120,

            ship_thrust: 0.35,
            ship_drag: 0.992,
            ship_max_speed: 8.5,
            ship_turn_rate: 4.0,
            fire_cooldown: 15,
            max_player_bullets: 4,
            hyperspace_cooldown: 120,
            hyperspace_invulnerability: 24,

            bullet_speed: 12.0,
            bullet_ttl: 72,
            bullet_grace_frames: 6,
            enemy_bullet_speed: 7.0,
            enemy_bullet_ttl: 120,

            split_impulse: 1.2,
            split_inheritance: 0.2,
            asteroid_spin_max: 2.0,
            asteroid_spin_floor: 0.2,

            saucer_speed: 3.0,
            saucer_drift: 0.8,
            saucer_ttl: 12 * 60,
            saucer_fire_interval: (45, 95),
            saucer_noise_large: 25.0,
            saucer_noise_small: 8.0,
            saucer_schedule: SaucerSchedule::default(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<GameConfig>(json).map(GameConfig::sanitized)
    }

    pub fn to_json(&self) -> String {
        // Plain data with no maps keyed by non-strings; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load a config file, falling back to defaults when missing or malformed
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Malformed config {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read config {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path.as_ref(), self.to_json())?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Clamp values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.arena_width > 0.0) || !(self.arena_height > 0.0) {
            log::warn!(
                "Arena {}x{} is not positive, using {}x{}",
                self.arena_width,
                self.arena_height,
                defaults.arena_width,
                defaults.arena_height
            );
            self.arena_width = defaults.arena_width;
            self.arena_height = defaults.arena_height;
        }
        if !(self.wave_growth >= 1.0) {
            log::warn!("Wave growth {} below 1.0, clamping", self.wave_growth);
            self.wave_growth = 1.0;
        }
        if self.safe_spawn_radius < 0.0 {
            log::warn!("Negative safe spawn radius, clamping to 0");
            self.safe_spawn_radius = 0.0;
        }
        if self.initial_lives == 0 {
            log::warn!("Zero initial lives, using 1");
            self.initial_lives = 1;
        }
        if !(0.0..=1.0).contains(&self.ship_drag) {
            log::warn!("Ship drag {} outside 0..=1, using default", self.ship_drag);
            self.ship_drag = defaults.ship_drag;
        }
        if self.max_player_bullets == 0 {
            log::warn!("Zero player bullets allowed, using 1");
            self.max_player_bullets = 1;
        }
        if self.bullet_ttl == 0 {
            self.bullet_ttl = 1;
        }
        if self.enemy_bullet_ttl == 0 {
            self.enemy_bullet_ttl = 1;
        }
        if self.asteroid_spin_floor > self.asteroid_spin_max {
            log::warn!("Spin floor above spin max, swapping");
            std::mem::swap(&mut self.asteroid_spin_floor, &mut self.asteroid_spin_max);
        }
        self.saucer_fire_interval = ordered_range(self.saucer_fire_interval, "saucer fire interval");
        let schedule = &mut self.saucer_schedule;
        schedule.interval_frames = ordered_range(schedule.interval_frames, "saucer interval");
        schedule.accuracy = schedule.accuracy.clamp(0.0, 1.0);

        self
    }
}

/// Swap an inverted (min, max) pair and keep min at least one frame
fn ordered_range((lo, hi): (u32, u32), what: &str) -> (u32, u32) {
    let (lo, hi) = if lo > hi {
        log::warn!("Inverted {} {}..{}, swapping", what, lo, hi);
        (hi, lo)
    } else {
        (lo, hi)
    };
    (lo.max(1), hi.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "base_large_count": 7 }"#).unwrap();
        assert_eq!(config.base_large_count, 7);
        assert_eq!(config.respawn_delay, 45);
        assert_eq!(config.arena_width, 900.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(GameConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_sanitized_clamps_bad_values() {
        let config = GameConfig {
            arena_width: -5.0,
            wave_growth: 0.5,
            initial_lives: 0,
            saucer_fire_interval: (90, 40),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.arena_width, 900.0);
        assert_eq!(config.wave_growth, 1.0);
        assert_eq!(config.initial_lives, 1);
        assert_eq!(config.saucer_fire_interval, (40, 90));
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let config = GameConfig::default();
        let parsed = GameConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = GameConfig::load("/definitely/not/here.json");
        assert_eq!(config, GameConfig::default());
    }
}
