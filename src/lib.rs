//! Asteroid Field - simulation core of a toroidal arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, splits, waves, progression)
//! - `config`: Data-driven game balance
//!
//! Rendering, audio and device polling live outside this crate. The core consumes
//! [`sim::TickInput`] signals once per frame and emits [`sim::GameEvent`]s.

pub mod config;
pub mod sim;

pub use config::{GameConfig, SaucerSchedule};

use glam::Vec2;
use rand::Rng;

/// Physical constants per entity kind (pixels and frames)
pub mod consts {
    /// Asteroid collision radii
    pub const ASTEROID_RADIUS_LARGE: f32 = 46.0;
    pub const ASTEROID_RADIUS_MEDIUM: f32 = 28.0;
    pub const ASTEROID_RADIUS_SMALL: f32 = 16.0;

    /// Asteroid speed ranges (px/frame, min..max)
    pub const ASTEROID_SPEED_LARGE: (f32, f32) = (1.2, 2.0);
    pub const ASTEROID_SPEED_MEDIUM: (f32, f32) = (1.8, 2.8);
    pub const ASTEROID_SPEED_SMALL: (f32, f32) = (2.3, 3.5);

    /// Points awarded per asteroid size
    pub const ASTEROID_SCORE_LARGE: u64 = 20;
    pub const ASTEROID_SCORE_MEDIUM: u64 = 50;
    pub const ASTEROID_SCORE_SMALL: u64 = 100;

    /// Ship collision radius
    pub const SHIP_RADIUS: f32 = 16.0;
    /// Initial heading in degrees (270 = screen-up, y grows downward)
    pub const SHIP_START_HEADING: f32 = 270.0;
    /// Bullets appear this far past the hull along the heading
    pub const SHIP_MUZZLE_OFFSET: f32 = 10.0;
    /// Velocity kept across a hyperspace jump
    pub const HYPERSPACE_VELOCITY_KEEP: f32 = 0.3;

    pub const PLAYER_BULLET_RADIUS: f32 = 4.0;
    pub const ENEMY_BULLET_RADIUS: f32 = 3.0;

    /// Saucer radii and scores
    pub const SAUCER_RADIUS_LARGE: f32 = 20.0;
    pub const SAUCER_RADIUS_SMALL: f32 = 14.0;
    pub const SAUCER_SCORE_LARGE: u64 = 200;
    pub const SAUCER_SCORE_SMALL: u64 = 1000;
    /// Saucers reverse vertical drift this close to the top/bottom edge
    pub const SAUCER_EDGE_MARGIN: f32 = 20.0;
    /// Saucers enter at least this far from the top/bottom edge
    pub const SAUCER_ENTRY_MARGIN: f32 = 40.0;

    /// Below this speed an impactor gives no usable split direction
    pub const IMPACT_EPSILON: f32 = 1.0e-4;

    /// Random fallback samples for the safe-spawn search
    pub const SAFE_SPAWN_ATTEMPTS: u32 = 80;
    /// Minimum number of large asteroids in any wave
    pub const MIN_LARGE_PER_WAVE: u32 = 3;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(mut degrees: f32) -> f32 {
    while degrees >= 360.0 {
        degrees -= 360.0;
    }
    while degrees < 0.0 {
        degrees += 360.0;
    }
    degrees
}

/// Unit vector for a heading in degrees (0 = +x, 90 = +y)
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Heading in degrees of a vector, in [0, 360)
#[inline]
pub fn vector_heading(v: Vec2) -> f32 {
    normalize_degrees(v.y.atan2(v.x).to_degrees())
}

/// Signed smallest difference `to - from` in degrees, in [-180, 180)
#[inline]
pub fn heading_delta(from: f32, to: f32) -> f32 {
    normalize_degrees(to - from + 180.0) - 180.0
}

/// Uniform sample in [lo, hi); returns `lo` for an empty or inverted range
#[inline]
pub fn random_in<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    lo + rng.random::<f32>() * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-4.0), 356.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }

    #[test]
    fn test_heading_vector_screen_up() {
        let v = heading_vector(270.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_heading_delta_takes_short_way() {
        assert!((heading_delta(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((heading_delta(10.0, 350.0) + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_random_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let v = random_in(&mut rng, 2.0, 3.0);
            assert!((2.0..=3.0).contains(&v));
        }
        assert_eq!(random_in(&mut rng, 5.0, 5.0), 5.0);
    }
}
