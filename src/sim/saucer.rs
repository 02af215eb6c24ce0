//! Hostile saucer: lateral pass, vertical bounce, aimed fire

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Body, Entity, SaucerKind, UpdateContext};
use super::events::DestroyCause;
use crate::config::GameConfig;
use crate::consts::*;
use crate::{heading_vector, random_in, vector_heading};

pub(super) fn update(entity: &mut Entity, ctx: &mut UpdateContext<'_>) {
    let config = ctx.config;
    let Body::Saucer(saucer) = &mut entity.body else {
        return;
    };

    entity.pos += entity.vel;
    let low = SAUCER_EDGE_MARGIN;
    let high = config.arena_height - SAUCER_EDGE_MARGIN;
    if (entity.pos.y < low && entity.vel.y < 0.0) || (entity.pos.y > high && entity.vel.y > 0.0) {
        entity.vel.y = -entity.vel.y;
    }

    saucer.fire_cooldown.tick();
    if saucer.fire_cooldown.expired() {
        // No target, no shot; the cooldown still re-rolls
        if let Some(target) = ctx.ship_pos {
            let dir = aim_direction(entity.pos, target, saucer.kind, saucer.accuracy, config, ctx.rng);
            ctx.spawned.push(Entity::enemy_bullet(
                entity.pos,
                dir * config.enemy_bullet_speed,
                config.enemy_bullet_ttl,
                entity.id,
            ));
        }
        saucer.fire_cooldown.start(roll_fire_interval(ctx.rng, config));
    }

    if saucer.ttl.tick() {
        entity.destroy(DestroyCause::Expired, ctx.events);
    }
}

/// Angular noise half-width in degrees: base noise scaled by inaccuracy
pub fn aim_noise(kind: SaucerKind, accuracy: f32, config: &GameConfig) -> f32 {
    kind.base_noise(config) * (1.0 - accuracy.clamp(0.0, 1.0))
}

/// Unit direction from `from` toward `target`, perturbed by the saucer's aim noise
pub fn aim_direction(
    from: Vec2,
    target: Vec2,
    kind: SaucerKind,
    accuracy: f32,
    config: &GameConfig,
    rng: &mut Pcg32,
) -> Vec2 {
    let bearing = vector_heading(target - from);
    let noise = aim_noise(kind, accuracy, config);
    let offset = if noise > 0.0 {
        random_in(rng, -noise, noise)
    } else {
        0.0
    };
    heading_vector(bearing + offset)
}

/// Frames until the next shot, uniform in the configured inclusive range
pub fn roll_fire_interval(rng: &mut Pcg32, config: &GameConfig) -> u32 {
    let (lo, hi) = config.saucer_fire_interval;
    rng.random_range(lo.min(hi)..=hi.max(lo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::GameEvent;
    use crate::sim::tick::TickInput;
    use crate::sim::EntityKind;
    use rand::SeedableRng;

    fn run(saucer: &mut Entity, ship_pos: Option<Vec2>, rng: &mut Pcg32) -> (Vec<Entity>, Vec<GameEvent>) {
        let config = GameConfig::default();
        let input = TickInput::default();
        let mut spawned = Vec::new();
        let mut events = Vec::new();
        let mut ctx = UpdateContext {
            config: &config,
            input: &input,
            rng,
            ship_pos,
            player_bullets: 0,
            spawned: &mut spawned,
            events: &mut events,
        };
        saucer.update(&mut ctx);
        (spawned, events)
    }

    #[test]
    fn test_perfect_accuracy_has_no_noise() {
        let config = GameConfig::default();
        assert_eq!(aim_noise(SaucerKind::Small, 1.0, &config), 0.0);
        assert_eq!(aim_noise(SaucerKind::Large, 0.0, &config), 25.0);
        assert!((aim_noise(SaucerKind::Small, 0.5, &config) - 4.0).abs() < 1e-5);

        let mut rng = Pcg32::seed_from_u64(5);
        let dir = aim_direction(Vec2::ZERO, Vec2::new(0.0, 10.0), SaucerKind::Small, 1.0, &config, &mut rng);
        assert!(dir.x.abs() < 1e-5);
        assert!((dir.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_aim_stays_within_noise_cone() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..200 {
            let dir = aim_direction(Vec2::ZERO, Vec2::X * 100.0, SaucerKind::Large, 0.2, &config, &mut rng);
            let angle = dir.y.atan2(dir.x).to_degrees().abs();
            assert!(angle <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn test_fires_at_ship_when_cooldown_expires() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut saucer = Entity::saucer(SaucerKind::Large, 1.0, Vec2::new(100.0, 300.0), Vec2::new(3.0, 0.0), 1, 600);
        saucer.id = 7;
        let (spawned, _) = run(&mut saucer, Some(Vec2::new(400.0, 300.0)), &mut rng);
        assert_eq!(spawned.len(), 1);
        let bullet = &spawned[0];
        assert_eq!(bullet.kind(), EntityKind::EnemyBullet);
        assert!(bullet.vel.x > 0.0);
        assert!(saucer.as_saucer().unwrap().fire_cooldown.remaining() >= 45);
    }

    #[test]
    fn test_holds_fire_without_target() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut saucer = Entity::saucer(SaucerKind::Small, 0.5, Vec2::new(100.0, 300.0), Vec2::new(3.0, 0.0), 1, 600);
        let (spawned, _) = run(&mut saucer, None, &mut rng);
        assert!(spawned.is_empty());
    }

    #[test]
    fn test_bounces_off_top_margin() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut saucer = Entity::saucer(SaucerKind::Large, 0.5, Vec2::new(100.0, 19.5), Vec2::new(3.0, -0.8), 50, 600);
        run(&mut saucer, None, &mut rng);
        assert!(saucer.vel.y > 0.0);
    }

    #[test]
    fn test_expires_after_ttl() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut saucer = Entity::saucer(SaucerKind::Large, 0.5, Vec2::new(100.0, 300.0), Vec2::new(3.0, 0.0), 500, 2);
        run(&mut saucer, None, &mut rng);
        assert!(saucer.alive);
        let (_, events) = run(&mut saucer, None, &mut rng);
        assert!(!saucer.alive);
        assert!(matches!(events[0], GameEvent::EntityDestroyed { .. }));
    }
}
