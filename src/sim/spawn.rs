//! Wave budgets and safe placement
//!
//! Placement is best-effort: a search that finds nothing safe returns the last
//! position it tried instead of blocking the frame.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Entity, SaucerKind};
use super::saucer::roll_fire_interval;
use crate::config::GameConfig;
use crate::consts::*;
use crate::random_in;

/// Large asteroids allotted to `wave` before the per-wave minimum:
/// `max(1, round(base * growth^(wave - 1)))`
pub fn wave_budget(wave: u32, base_large: u32, growth: f32) -> u32 {
    let exponent = wave.saturating_sub(1).min(i32::MAX as u32) as i32;
    let scaled = base_large as f32 * growth.powi(exponent);
    // `as` saturates on overflow and maps NaN to 0
    (scaled.round() as u32).max(1)
}

/// Large asteroids actually spawned for `wave`
pub fn large_asteroids_for_wave(wave: u32, config: &GameConfig) -> u32 {
    wave_budget(wave, config.base_large_count, config.wave_growth).max(MIN_LARGE_PER_WAVE)
}

/// Finds spawn positions in the arena
#[derive(Debug, Clone, Copy)]
pub struct SpawnPlanner {
    width: f32,
    height: f32,
    safe_radius: f32,
}

impl SpawnPlanner {
    pub fn new(width: f32, height: f32, safe_radius: f32) -> Self {
        Self {
            width,
            height,
            safe_radius,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.arena_width, config.arena_height, config.safe_spawn_radius)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// At least `safe_radius` from `threat`; anything is safe with no threat
    pub fn is_safe(&self, pos: Vec2, threat: Option<Vec2>) -> bool {
        match threat {
            Some(threat) => pos.distance_squared(threat) >= self.safe_radius * self.safe_radius,
            None => true,
        }
    }

    fn random_point(&self, rng: &mut Pcg32) -> Vec2 {
        Vec2::new(random_in(rng, 0.0, self.width), random_in(rng, 0.0, self.height))
    }

    /// Position for a new asteroid, away from the ship.
    ///
    /// Tries a random point on each of the four edges plus one random interior
    /// point, then falls back to a random search.
    pub fn asteroid_position(&self, rng: &mut Pcg32, ship: Option<Vec2>) -> Vec2 {
        let candidates = [
            Vec2::new(random_in(rng, 0.0, self.width), 0.0),
            Vec2::new(random_in(rng, 0.0, self.width), self.height - 1.0),
            Vec2::new(0.0, random_in(rng, 0.0, self.height)),
            Vec2::new(self.width - 1.0, random_in(rng, 0.0, self.height)),
            self.random_point(rng),
        ];
        if let Some(&pos) = candidates.iter().find(|&&c| self.is_safe(c, ship)) {
            return pos;
        }
        self.random_search(rng, |p| self.is_safe(p, ship))
    }

    /// Position for the ship: the center when no asteroid is within the safe
    /// radius, otherwise a random search for such a spot
    pub fn ship_position(&self, rng: &mut Pcg32, asteroids: &[Vec2]) -> Vec2 {
        let clear = |p: Vec2| asteroids.iter().all(|&a| self.is_safe(p, Some(a)));
        let center = self.center();
        if clear(center) {
            return center;
        }
        self.random_search(rng, clear)
    }

    /// Up to `SAFE_SPAWN_ATTEMPTS` uniform samples; the first safe one wins,
    /// otherwise the last one tried
    pub fn random_search(&self, rng: &mut Pcg32, is_safe: impl Fn(Vec2) -> bool) -> Vec2 {
        let mut last = self.center();
        for _ in 0..SAFE_SPAWN_ATTEMPTS {
            let pos = self.random_point(rng);
            if is_safe(pos) {
                return pos;
            }
            last = pos;
        }
        log::warn!("No safe spawn position after {} samples, using {:?}", SAFE_SPAWN_ATTEMPTS, last);
        last
    }

    /// A saucer entering from a random side edge at a random height
    pub fn saucer(&self, kind: SaucerKind, accuracy: f32, rng: &mut Pcg32, config: &GameConfig) -> Entity {
        let left_to_right = rng.random_bool(0.5);
        let x = if left_to_right { 1.0 } else { self.width - 2.0 };
        let margin = SAUCER_ENTRY_MARGIN.min(self.height / 2.0);
        let y = random_in(rng, margin, self.height - margin);
        let vx = if left_to_right { config.saucer_speed } else { -config.saucer_speed };
        let vy = random_in(rng, -config.saucer_drift, config.saucer_drift);
        let fire_in = roll_fire_interval(rng, config);
        Entity::saucer(kind, accuracy, Vec2::new(x, y), Vec2::new(vx, vy), fire_in, config.saucer_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_first_wave_budget() {
        let config = GameConfig::default();
        assert_eq!(large_asteroids_for_wave(1, &config), 5);

        let sparse = GameConfig {
            base_large_count: 1,
            ..Default::default()
        };
        assert_eq!(large_asteroids_for_wave(1, &sparse), 3);
    }

    #[test]
    fn test_budget_grows_geometrically() {
        // 5 * 1.25^n rounded
        assert_eq!(wave_budget(1, 5, 1.25), 5);
        assert_eq!(wave_budget(2, 5, 1.25), 6);
        assert_eq!(wave_budget(3, 5, 1.25), 8);
        assert_eq!(wave_budget(4, 5, 1.25), 10);
        assert_eq!(wave_budget(1, 0, 1.25), 1);
    }

    #[test]
    fn test_asteroids_avoid_ship() {
        let planner = SpawnPlanner::from_config(&GameConfig::default());
        let mut rng = Pcg32::seed_from_u64(4);
        let ship = planner.center();
        for _ in 0..100 {
            let pos = planner.asteroid_position(&mut rng, Some(ship));
            assert!(pos.distance(ship) >= 140.0);
        }
    }

    #[test]
    fn test_search_is_best_effort() {
        // Safe radius larger than the arena: nothing qualifies, but a position comes back
        let planner = SpawnPlanner::new(100.0, 100.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(4);
        let pos = planner.asteroid_position(&mut rng, Some(Vec2::new(50.0, 50.0)));
        assert!(pos.x >= 0.0 && pos.x < 100.0);
        assert!(pos.y >= 0.0 && pos.y < 100.0);
    }

    #[test]
    fn test_ship_prefers_center() {
        let planner = SpawnPlanner::from_config(&GameConfig::default());
        let mut rng = Pcg32::seed_from_u64(4);
        assert_eq!(planner.ship_position(&mut rng, &[]), planner.center());

        let crowded = [planner.center() + Vec2::new(10.0, 0.0)];
        let pos = planner.ship_position(&mut rng, &crowded);
        assert!(pos.distance(crowded[0]) >= 140.0);
    }

    #[test]
    fn test_saucer_enters_from_side() {
        let config = GameConfig::default();
        let planner = SpawnPlanner::from_config(&config);
        let mut rng = Pcg32::seed_from_u64(12);
        for _ in 0..20 {
            let saucer = planner.saucer(SaucerKind::Large, 0.5, &mut rng, &config);
            let data = saucer.as_saucer().unwrap();
            if data.left_to_right {
                assert!(saucer.pos.x < 2.0 && saucer.vel.x > 0.0);
            } else {
                assert!(saucer.pos.x > 897.0 && saucer.vel.x < 0.0);
            }
            assert!(saucer.pos.y >= 40.0 && saucer.pos.y <= 660.0);
        }
    }

    proptest! {
        #[test]
        fn prop_budget_non_decreasing(wave in 1u32..40, base in 0u32..20, growth in 1.0f32..2.0) {
            prop_assert!(wave_budget(wave + 1, base, growth) >= wave_budget(wave, base, growth));
        }
    }
}
