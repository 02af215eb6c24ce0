//! Asteroid fragmentation
//!
//! A destroyed LARGE or MEDIUM asteroid breaks into two fragments of the next
//! size down, placed at the parent's last position. Each fragment gets:
//! - a fresh random velocity from its own size's speed range,
//! - a separation impulse along the impact direction (opposite signs, so the pair diverges),
//! - a share of the parent's velocity,
//! - its own random spin, never slower than the configured floor.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::entity::{random_spin, random_velocity, Entity};
use crate::config::GameConfig;
use crate::consts::IMPACT_EPSILON;
use crate::{heading_vector, random_in};

/// Fragments produced per split
pub const FRAGMENTS_PER_SPLIT: usize = 2;

/// Unit impact direction from the impactor's velocity, or a random one when the
/// impactor is (nearly) at rest
pub fn impact_normal(impactor_vel: Vec2, rng: &mut Pcg32) -> Vec2 {
    let speed = impactor_vel.length();
    if speed > IMPACT_EPSILON {
        impactor_vel / speed
    } else {
        heading_vector(random_in(rng, 0.0, 360.0))
    }
}

/// Fragments of `parent`, empty for SMALL asteroids and non-asteroids
pub fn split_asteroid(parent: &Entity, impactor_vel: Vec2, rng: &mut Pcg32, config: &GameConfig) -> Vec<Entity> {
    let Some(child_size) = parent.as_asteroid().and_then(|a| a.size.child()) else {
        return Vec::new();
    };

    let normal = impact_normal(impactor_vel, rng);
    let inherited = parent.vel * config.split_inheritance;

    (0..FRAGMENTS_PER_SPLIT)
        .map(|i| {
            let base = random_velocity(rng, child_size.speed_range());
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            let separation = normal * config.split_impulse * sign;
            let spin = random_spin(rng, config);
            Entity::asteroid(child_size, parent.pos, base + separation + inherited, spin)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::AsteroidSize;
    use rand::SeedableRng;

    fn parent(size: AsteroidSize) -> Entity {
        Entity::asteroid(size, Vec2::new(300.0, 200.0), Vec2::new(2.0, 0.0), 1.0)
    }

    #[test]
    fn test_large_splits_into_two_mediums_at_parent() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let children = split_asteroid(&parent(AsteroidSize::Large), Vec2::new(0.0, -12.0), &mut rng, &config);
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.as_asteroid().unwrap().size, AsteroidSize::Medium);
            assert_eq!(child.pos, Vec2::new(300.0, 200.0));
            assert_eq!(child.radius, AsteroidSize::Medium.radius());
        }
    }

    #[test]
    fn test_medium_splits_into_smalls_and_small_vanishes() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let children = split_asteroid(&parent(AsteroidSize::Medium), Vec2::X, &mut rng, &config);
        assert!(children
            .iter()
            .all(|c| c.as_asteroid().unwrap().size == AsteroidSize::Small));
        assert_eq!(children.len(), 2);
        assert!(split_asteroid(&parent(AsteroidSize::Small), Vec2::X, &mut rng, &config).is_empty());
    }

    #[test]
    fn test_velocity_composition() {
        // Replay the same draws to recover each child's random component
        let config = GameConfig::default();
        let p = parent(AsteroidSize::Large);
        let impactor = Vec2::new(0.0, 12.0);

        let mut rng = Pcg32::seed_from_u64(7);
        let children = split_asteroid(&p, impactor, &mut rng, &config);

        let mut replay = Pcg32::seed_from_u64(7);
        let normal = impact_normal(impactor, &mut replay);
        assert_eq!(normal, Vec2::Y);
        for (i, child) in children.iter().enumerate() {
            let base = random_velocity(&mut replay, AsteroidSize::Medium.speed_range());
            let _spin = random_spin(&mut replay, &config);
            let sign = if i == 0 { 1.0 } else { -1.0 };
            let expected = base + Vec2::Y * config.split_impulse * sign + p.vel * config.split_inheritance;
            assert!((child.vel - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_stationary_impactor_uses_random_direction() {
        let mut rng = Pcg32::seed_from_u64(1);
        let n = impact_normal(Vec2::ZERO, &mut rng);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fragments_spin() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..50 {
            for child in split_asteroid(&parent(AsteroidSize::Large), Vec2::X, &mut rng, &config) {
                assert!(child.as_asteroid().unwrap().spin.abs() >= config.asteroid_spin_floor);
            }
        }
    }
}
