//! Player ship control and inertial flight

use glam::Vec2;

use super::entity::{Body, Entity, UpdateContext};
use super::events::GameEvent;
use crate::consts::*;
use crate::{heading_vector, normalize_degrees, random_in};

/// One frame of ship behaviour: steer, thrust, fire, jump, then integrate.
pub(super) fn update(entity: &mut Entity, ctx: &mut UpdateContext<'_>) {
    let config = ctx.config;
    let input = ctx.input;
    let Body::Ship(ship) = &mut entity.body else {
        return;
    };

    if input.turn_left {
        ship.heading = normalize_degrees(ship.heading - config.ship_turn_rate);
    }
    if input.turn_right {
        ship.heading = normalize_degrees(ship.heading + config.ship_turn_rate);
    }

    let facing = heading_vector(ship.heading);
    ship.thrusting = input.thrust;
    if input.thrust {
        entity.vel += facing * config.ship_thrust;
    }

    // Fire from the nose, inheriting hull velocity
    ship.fire_cooldown.tick();
    if input.fire && ship.fire_cooldown.expired() && ctx.player_bullets < config.max_player_bullets {
        let muzzle = entity.pos + facing * (entity.radius + SHIP_MUZZLE_OFFSET);
        let vel = entity.vel + facing * config.bullet_speed;
        ctx.spawned.push(Entity::player_bullet(muzzle, vel, config.bullet_ttl, entity.id));
        ctx.player_bullets += 1;
        ship.fire_cooldown.start(config.fire_cooldown);
    }

    ship.hyperspace_cooldown.tick();
    if input.hyperspace && ship.hyperspace_cooldown.expired() {
        let from = entity.pos;
        entity.pos = Vec2::new(
            random_in(ctx.rng, 0.0, config.arena_width),
            random_in(ctx.rng, 0.0, config.arena_height),
        );
        entity.vel *= HYPERSPACE_VELOCITY_KEEP;
        ship.invulnerable.extend_to(config.hyperspace_invulnerability);
        ship.hyperspace_cooldown.start(config.hyperspace_cooldown);
        log::debug!("Ship {} jumped {:?} -> {:?}", entity.id, from, entity.pos);
        ctx.events.push(GameEvent::ShipJumped {
            id: entity.id,
            from,
            to: entity.pos,
        });
    }

    entity.vel *= config.ship_drag;
    entity.vel = entity.vel.clamp_length_max(config.ship_max_speed);
    entity.pos += entity.vel;

    ship.invulnerable.tick();
}
