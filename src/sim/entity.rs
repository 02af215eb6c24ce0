//! Simulated bodies
//!
//! Every object in the arena is an [`Entity`]: shared kinematics plus a [`Body`]
//! carrying the kind-specific state. Behaviour is dispatched on the body tag.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{DestroyCause, GameEvent};
use super::tick::TickInput;
use super::timer::Countdown;
use super::{saucer, ship};
use crate::config::GameConfig;
use crate::consts::*;
use crate::{heading_vector, normalize_degrees, random_in, vector_heading};

pub type EntityId = u32;

/// Entity kind tag, also the index into the interaction table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Asteroid,
    PlayerBullet,
    EnemyBullet,
    Saucer,
}

impl EntityKind {
    pub const COUNT: usize = 5;

    pub const ALL: [EntityKind; Self::COUNT] = [
        EntityKind::Ship,
        EntityKind::Asteroid,
        EntityKind::PlayerBullet,
        EntityKind::EnemyBullet,
        EntityKind::Saucer,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Asteroid size classes; splitting only ever moves down this list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub fn radius(self) -> f32 {
        match self {
            AsteroidSize::Large => ASTEROID_RADIUS_LARGE,
            AsteroidSize::Medium => ASTEROID_RADIUS_MEDIUM,
            AsteroidSize::Small => ASTEROID_RADIUS_SMALL,
        }
    }

    /// (min, max) speed in px/frame
    pub fn speed_range(self) -> (f32, f32) {
        match self {
            AsteroidSize::Large => ASTEROID_SPEED_LARGE,
            AsteroidSize::Medium => ASTEROID_SPEED_MEDIUM,
            AsteroidSize::Small => ASTEROID_SPEED_SMALL,
        }
    }

    pub fn score(self) -> u64 {
        match self {
            AsteroidSize::Large => ASTEROID_SCORE_LARGE,
            AsteroidSize::Medium => ASTEROID_SCORE_MEDIUM,
            AsteroidSize::Small => ASTEROID_SCORE_SMALL,
        }
    }

    /// Size of the fragments this asteroid breaks into, if any
    pub fn child(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaucerKind {
    Large,
    Small,
}

impl SaucerKind {
    pub fn radius(self) -> f32 {
        match self {
            SaucerKind::Large => SAUCER_RADIUS_LARGE,
            SaucerKind::Small => SAUCER_RADIUS_SMALL,
        }
    }

    pub fn score(self) -> u64 {
        match self {
            SaucerKind::Large => SAUCER_SCORE_LARGE,
            SaucerKind::Small => SAUCER_SCORE_SMALL,
        }
    }

    /// Aim noise in degrees at zero accuracy
    pub fn base_noise(self, config: &GameConfig) -> f32 {
        match self {
            SaucerKind::Large => config.saucer_noise_large,
            SaucerKind::Small => config.saucer_noise_small,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipData {
    /// Degrees, 0 = +x, clockwise on screen
    pub heading: f32,
    /// Thrust held this frame (for the flame sprite)
    pub thrusting: bool,
    pub fire_cooldown: Countdown,
    pub invulnerable: Countdown,
    pub hyperspace_cooldown: Countdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidData {
    pub size: AsteroidSize,
    /// Degrees per frame
    pub spin: f32,
    /// Visual rotation in degrees
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletData {
    pub ttl: Countdown,
    /// Entity that fired the bullet
    pub owner: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaucerData {
    pub kind: SaucerKind,
    /// 0 = widest spread, 1 = dead-on
    pub accuracy: f32,
    pub fire_cooldown: Countdown,
    pub ttl: Countdown,
    /// Entered from the left edge
    pub left_to_right: bool,
}

/// Kind-specific state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Body {
    Ship(ShipData),
    Asteroid(AsteroidData),
    PlayerBullet(BulletData),
    EnemyBullet(BulletData),
    Saucer(SaucerData),
}

/// A simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Assigned by the arena on spawn (0 until then)
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Frames lived
    pub age: u32,
    /// Cleared when the entity is destroyed; reaped at the end of the frame
    pub alive: bool,
    pub body: Body,
}

/// Everything an entity may read or produce while updating
pub struct UpdateContext<'a> {
    pub config: &'a GameConfig,
    pub input: &'a TickInput,
    pub rng: &'a mut Pcg32,
    /// Position of the live ship, if any
    pub ship_pos: Option<Vec2>,
    /// Live player bullets, including ones fired earlier this frame
    pub player_bullets: usize,
    /// Entities created during the update pass (registered after it)
    pub spawned: &'a mut Vec<Entity>,
    pub events: &'a mut Vec<GameEvent>,
}

impl Entity {
    fn with_body(pos: Vec2, vel: Vec2, radius: f32, body: Body) -> Self {
        Self {
            id: 0,
            pos,
            vel,
            radius,
            age: 0,
            alive: true,
            body,
        }
    }

    /// A fresh ship at rest, facing up, invulnerable for the configured window
    pub fn ship(pos: Vec2, config: &GameConfig) -> Self {
        Self::with_body(
            pos,
            Vec2::ZERO,
            SHIP_RADIUS,
            Body::Ship(ShipData {
                heading: SHIP_START_HEADING,
                thrusting: false,
                fire_cooldown: Countdown::idle(),
                invulnerable: Countdown::new(config.invulnerability_frames),
                hyperspace_cooldown: Countdown::idle(),
            }),
        )
    }

    pub fn asteroid(size: AsteroidSize, pos: Vec2, vel: Vec2, spin: f32) -> Self {
        Self::with_body(
            pos,
            vel,
            size.radius(),
            Body::Asteroid(AsteroidData {
                size,
                spin,
                rotation: vector_heading(vel),
            }),
        )
    }

    /// An asteroid with a random heading, a speed from its size range and a random spin
    pub fn random_asteroid(size: AsteroidSize, pos: Vec2, rng: &mut Pcg32, config: &GameConfig) -> Self {
        let vel = random_velocity(rng, size.speed_range());
        let spin = random_spin(rng, config);
        Self::asteroid(size, pos, vel, spin)
    }

    pub fn player_bullet(pos: Vec2, vel: Vec2, ttl: u32, owner: EntityId) -> Self {
        Self::with_body(
            pos,
            vel,
            PLAYER_BULLET_RADIUS,
            Body::PlayerBullet(BulletData {
                ttl: Countdown::new(ttl),
                owner,
            }),
        )
    }

    pub fn enemy_bullet(pos: Vec2, vel: Vec2, ttl: u32, owner: EntityId) -> Self {
        Self::with_body(
            pos,
            vel,
            ENEMY_BULLET_RADIUS,
            Body::EnemyBullet(BulletData {
                ttl: Countdown::new(ttl),
                owner,
            }),
        )
    }

    pub fn saucer(kind: SaucerKind, accuracy: f32, pos: Vec2, vel: Vec2, fire_in: u32, ttl: u32) -> Self {
        Self::with_body(
            pos,
            vel,
            kind.radius(),
            Body::Saucer(SaucerData {
                kind,
                accuracy: accuracy.clamp(0.0, 1.0),
                fire_cooldown: Countdown::new(fire_in),
                ttl: Countdown::new(ttl),
                left_to_right: vel.x >= 0.0,
            }),
        )
    }

    pub fn kind(&self) -> EntityKind {
        match self.body {
            Body::Ship(_) => EntityKind::Ship,
            Body::Asteroid(_) => EntityKind::Asteroid,
            Body::PlayerBullet(_) => EntityKind::PlayerBullet,
            Body::EnemyBullet(_) => EntityKind::EnemyBullet,
            Body::Saucer(_) => EntityKind::Saucer,
        }
    }

    /// Mark destroyed. Returns false if it already was (idempotent).
    pub fn mark_defunct(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }

    /// Circle overlap: center distance <= sum of radii
    #[inline]
    pub fn overlaps(&self, other: &Entity) -> bool {
        let reach = self.radius + other.radius;
        self.pos.distance_squared(other.pos) <= reach * reach
    }

    /// Bullets ignore all contacts for a few frames after leaving the muzzle
    pub fn in_muzzle_grace(&self, config: &GameConfig) -> bool {
        matches!(self.body, Body::PlayerBullet(_) | Body::EnemyBullet(_))
            && self.age <= config.bullet_grace_frames
    }

    /// Ship currently exempt from destructive contacts
    pub fn is_invulnerable(&self) -> bool {
        matches!(&self.body, Body::Ship(ship) if ship.invulnerable.is_running())
    }

    pub fn as_ship(&self) -> Option<&ShipData> {
        match &self.body {
            Body::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_ship_mut(&mut self) -> Option<&mut ShipData> {
        match &mut self.body {
            Body::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_asteroid(&self) -> Option<&AsteroidData> {
        match &self.body {
            Body::Asteroid(asteroid) => Some(asteroid),
            _ => None,
        }
    }

    pub fn as_saucer(&self) -> Option<&SaucerData> {
        match &self.body {
            Body::Saucer(saucer) => Some(saucer),
            _ => None,
        }
    }

    /// Integrate motion and age timers for one frame
    pub fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if !self.alive {
            return;
        }
        self.age = self.age.saturating_add(1);

        match self.kind() {
            EntityKind::Ship => ship::update(self, ctx),
            EntityKind::Saucer => saucer::update(self, ctx),
            EntityKind::Asteroid => self.drift(),
            EntityKind::PlayerBullet | EntityKind::EnemyBullet => self.fly(ctx.events),
        }
    }

    fn drift(&mut self) {
        self.pos += self.vel;
        if let Body::Asteroid(asteroid) = &mut self.body {
            asteroid.rotation = normalize_degrees(asteroid.rotation + asteroid.spin);
        }
    }

    fn fly(&mut self, events: &mut Vec<GameEvent>) {
        self.pos += self.vel;
        let expired = match &mut self.body {
            Body::PlayerBullet(bullet) | Body::EnemyBullet(bullet) => bullet.ttl.tick(),
            _ => false,
        };
        if expired {
            self.destroy(DestroyCause::Expired, events);
        }
    }

    /// Mark defunct and announce it. No-op (returns false) if already destroyed.
    pub fn destroy(&mut self, cause: DestroyCause, events: &mut Vec<GameEvent>) -> bool {
        if !self.mark_defunct() {
            return false;
        }
        log::debug!("{:?} {} destroyed ({:?})", self.kind(), self.id, cause);
        events.push(GameEvent::EntityDestroyed {
            id: self.id,
            kind: self.kind(),
            pos: self.pos,
            cause,
        });
        true
    }
}

/// Velocity with a uniformly random heading and a speed in `(min, max)`
pub fn random_velocity(rng: &mut Pcg32, (min, max): (f32, f32)) -> Vec2 {
    let speed = random_in(rng, min, max);
    let heading = random_in(rng, 0.0, 360.0);
    heading_vector(heading) * speed
}

/// Spin in ±`asteroid_spin_max`, pushed out to at least `asteroid_spin_floor` in magnitude
pub fn random_spin(rng: &mut Pcg32, config: &GameConfig) -> f32 {
    let spin = random_in(rng, -config.asteroid_spin_max, config.asteroid_spin_max);
    if spin.abs() < config.asteroid_spin_floor {
        if spin < 0.0 {
            -config.asteroid_spin_floor
        } else {
            config.asteroid_spin_floor
        }
    } else {
        spin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_size_ladder_strictly_shrinks() {
        assert_eq!(AsteroidSize::Large.child(), Some(AsteroidSize::Medium));
        assert_eq!(AsteroidSize::Medium.child(), Some(AsteroidSize::Small));
        assert_eq!(AsteroidSize::Small.child(), None);
        assert!(AsteroidSize::Large.radius() > AsteroidSize::Medium.radius());
        assert!(AsteroidSize::Medium.radius() > AsteroidSize::Small.radius());
    }

    #[test]
    fn test_mark_defunct_is_idempotent() {
        let mut rock = Entity::asteroid(AsteroidSize::Small, Vec2::ZERO, Vec2::X, 1.0);
        assert!(rock.mark_defunct());
        assert!(!rock.mark_defunct());
        assert!(!rock.alive);
    }

    #[test]
    fn test_destroy_announces_once() {
        let mut rock = Entity::asteroid(AsteroidSize::Large, Vec2::ZERO, Vec2::X, 1.0);
        let mut events = Vec::new();
        assert!(rock.destroy(DestroyCause::Shot, &mut events));
        assert!(!rock.destroy(DestroyCause::Collision, &mut events));
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            GameEvent::EntityDestroyed {
                cause: DestroyCause::Shot,
                ..
            }
        ));
    }

    #[test]
    fn test_bullet_expires_after_ttl() {
        let config = GameConfig::default();
        let input = TickInput::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawned = Vec::new();
        let mut events = Vec::new();
        let mut ctx = UpdateContext {
            config: &config,
            input: &input,
            rng: &mut rng,
            ship_pos: None,
            player_bullets: 0,
            spawned: &mut spawned,
            events: &mut events,
        };
        let mut bullet = Entity::player_bullet(Vec2::ZERO, Vec2::new(12.0, 0.0), 3, 1);
        bullet.update(&mut ctx);
        bullet.update(&mut ctx);
        assert!(bullet.alive);
        bullet.update(&mut ctx);
        assert!(!bullet.alive);
        assert_eq!(bullet.pos, Vec2::new(36.0, 0.0));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let a = Entity::asteroid(AsteroidSize::Small, Vec2::ZERO, Vec2::ZERO, 1.0);
        let b = Entity::player_bullet(Vec2::new(20.0, 0.0), Vec2::ZERO, 10, 1);
        // 16 + 4 == 20: touching counts
        assert!(a.overlaps(&b));
        let c = Entity::player_bullet(Vec2::new(20.5, 0.0), Vec2::ZERO, 10, 1);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_spin_respects_floor() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..500 {
            let spin = random_spin(&mut rng, &config);
            assert!(spin.abs() >= config.asteroid_spin_floor);
            assert!(spin.abs() <= config.asteroid_spin_max);
        }
    }

    #[test]
    fn test_random_velocity_within_speed_range() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let speed = random_velocity(&mut rng, ASTEROID_SPEED_MEDIUM).length();
            assert!(speed >= ASTEROID_SPEED_MEDIUM.0 - 1e-4);
            assert!(speed <= ASTEROID_SPEED_MEDIUM.1 + 1e-4);
        }
    }

    #[test]
    fn test_new_ship_is_invulnerable() {
        let config = GameConfig::default();
        let ship = Entity::ship(Vec2::new(450.0, 350.0), &config);
        assert!(ship.is_invulnerable());
        assert_eq!(ship.kind(), EntityKind::Ship);
    }
}
