//! Interaction rules and per-frame overlap resolution
//!
//! `RULES` is the only place that decides which kinds react to each other.
//! Contacts are gathered for the whole frame first, ordered by rule priority,
//! then applied; a contact whose participant already died this frame is dropped,
//! so no entity is destroyed twice.

use rand_pcg::Pcg32;

use super::arena::Arena;
use super::entity::{Entity, EntityKind};
use super::events::{DestroyCause, GameEvent};
use super::progression::Progression;
use super::split::split_asteroid;
use crate::config::GameConfig;

/// Legal interactions, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Interaction {
    /// Both destroyed, asteroid splits, asteroid score awarded
    PlayerBulletAsteroid,
    /// Both destroyed, saucer score awarded
    PlayerBulletSaucer,
    /// Both destroyed, life lost
    EnemyBulletShip,
    /// Ship destroyed, asteroid untouched, life lost
    AsteroidShip,
    /// Both destroyed, no split, no score
    AsteroidSaucer,
}

impl Interaction {
    /// Participant kinds in (first, second) role order
    pub const fn roles(self) -> (EntityKind, EntityKind) {
        match self {
            Interaction::PlayerBulletAsteroid => (EntityKind::PlayerBullet, EntityKind::Asteroid),
            Interaction::PlayerBulletSaucer => (EntityKind::PlayerBullet, EntityKind::Saucer),
            Interaction::EnemyBulletShip => (EntityKind::EnemyBullet, EntityKind::Ship),
            Interaction::AsteroidShip => (EntityKind::Asteroid, EntityKind::Ship),
            Interaction::AsteroidSaucer => (EntityKind::Asteroid, EntityKind::Saucer),
        }
    }

    /// Skipped while the ship is invulnerable
    pub const fn harms_ship(self) -> bool {
        matches!(self, Interaction::EnemyBulletShip | Interaction::AsteroidShip)
    }
}

const NO: Option<Interaction> = None;
const PB_AST: Option<Interaction> = Some(Interaction::PlayerBulletAsteroid);
const PB_SAU: Option<Interaction> = Some(Interaction::PlayerBulletSaucer);
const EB_SHIP: Option<Interaction> = Some(Interaction::EnemyBulletShip);
const AST_SHIP: Option<Interaction> = Some(Interaction::AsteroidShip);
const AST_SAU: Option<Interaction> = Some(Interaction::AsteroidSaucer);

/// Indexed by `EntityKind::index()` on both axes; symmetric
#[rustfmt::skip]
const RULES: [[Option<Interaction>; EntityKind::COUNT]; EntityKind::COUNT] = [
    //  Ship      Asteroid  PlayerBul EnemyBul  Saucer
    [   NO,       AST_SHIP, NO,       EB_SHIP,  NO      ], // Ship
    [   AST_SHIP, NO,       PB_AST,   NO,       AST_SAU ], // Asteroid
    [   NO,       PB_AST,   NO,       NO,       PB_SAU  ], // PlayerBullet
    [   EB_SHIP,  NO,       NO,       NO,       NO      ], // EnemyBullet
    [   NO,       AST_SAU,  PB_SAU,   NO,       NO      ], // Saucer
];

/// Rule governing a pair of kinds, in either order
#[inline]
pub fn interaction_between(a: EntityKind, b: EntityKind) -> Option<Interaction> {
    RULES[a.index()][b.index()]
}

/// An overlapping pair, indices into the arena slots in role order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub rule: Interaction,
    pub first: usize,
    pub second: usize,
}

/// What a resolution pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Contacts applied
    pub hits: usize,
    pub ship_destroyed: bool,
    pub fragments: usize,
}

/// All legal overlapping pairs among live entities, ordered by rule priority
/// (ties keep slot order)
pub fn find_contacts(entities: &[Entity], config: &GameConfig) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for (i, a) in entities.iter().enumerate() {
        if !a.alive || a.in_muzzle_grace(config) {
            continue;
        }
        for (j, b) in entities.iter().enumerate().skip(i + 1) {
            if !b.alive || b.in_muzzle_grace(config) {
                continue;
            }
            let Some(rule) = interaction_between(a.kind(), b.kind()) else {
                continue;
            };
            if !a.overlaps(b) {
                continue;
            }
            let (first, second) = if a.kind() == rule.roles().0 { (i, j) } else { (j, i) };
            if rule.harms_ship() && entities[second].is_invulnerable() {
                continue;
            }
            contacts.push(Contact { rule, first, second });
        }
    }
    contacts.sort_by_key(|c| c.rule);
    contacts
}

/// Apply every contact of the frame. Fragments are queued in the arena and
/// become live on the next commit.
pub fn resolve_collisions(
    arena: &mut Arena,
    progression: &mut Progression,
    rng: &mut Pcg32,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) -> CollisionReport {
    let contacts = find_contacts(arena.slots(), config);
    let mut report = CollisionReport::default();

    for Contact { rule, first, second } in contacts {
        let slots = arena.slots_mut();
        if !slots[first].alive || !slots[second].alive {
            continue;
        }
        report.hits += 1;

        match rule {
            Interaction::PlayerBulletAsteroid => {
                let impact = slots[first].vel;
                slots[first].destroy(DestroyCause::Collision, events);
                slots[second].destroy(DestroyCause::Shot, events);
                let parent = &slots[second];
                let points = parent.as_asteroid().map_or(0, |a| a.size.score());
                let fragments = split_asteroid(parent, impact, rng, config);
                progression.add_score(points, events);
                report.fragments += fragments.len();
                for fragment in fragments {
                    arena.introduce(fragment, events);
                }
            }
            Interaction::PlayerBulletSaucer => {
                slots[first].destroy(DestroyCause::Collision, events);
                slots[second].destroy(DestroyCause::Shot, events);
                let points = slots[second].as_saucer().map_or(0, |s| s.kind.score());
                progression.add_score(points, events);
            }
            Interaction::EnemyBulletShip => {
                slots[first].destroy(DestroyCause::Collision, events);
                slots[second].destroy(DestroyCause::Shot, events);
                report.ship_destroyed = true;
                progression.lose_life(events);
            }
            Interaction::AsteroidShip => {
                slots[second].destroy(DestroyCause::Collision, events);
                report.ship_destroyed = true;
                progression.lose_life(events);
            }
            Interaction::AsteroidSaucer => {
                slots[first].destroy(DestroyCause::Collision, events);
                slots[second].destroy(DestroyCause::Collision, events);
            }
        }
    }

    report
}
