//! Toroidal play field and live entity registry
//!
//! Removal is two-phase: `remove` only marks an entity defunct, `reap` deletes
//! defunct entities at the end of the frame. New entities go to a pending list
//! and become visible to queries on `commit`, so nothing appears or disappears
//! under an iteration in progress.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind};
use super::events::GameEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    width: f32,
    height: f32,
    /// Live entities, ascending id
    entities: Vec<Entity>,
    /// Spawned this frame, not yet visible
    pending: Vec<Entity>,
    next_id: EntityId,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            entities: Vec::new(),
            pending: Vec::new(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Map a position back into [0, width) x [0, height).
    ///
    /// Adds or subtracts the span at most once per axis: per-frame motion is
    /// assumed smaller than the arena.
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        Vec2::new(wrap_axis(pos.x, self.width), wrap_axis(pos.y, self.height))
    }

    /// Wrap every live entity
    pub fn wrap_all(&mut self) {
        let (width, height) = (self.width, self.height);
        for entity in self.entities.iter_mut().filter(|e| e.alive) {
            entity.pos = Vec2::new(wrap_axis(entity.pos.x, width), wrap_axis(entity.pos.y, height));
        }
    }

    /// Queue an entity; it is assigned an id now and becomes visible on `commit`
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        entity.id = self.next_id;
        self.next_id += 1;
        entity.pos = self.wrap(entity.pos);
        let id = entity.id;
        self.pending.push(entity);
        id
    }

    /// Spawn and queue an `EntityCreated` notification
    pub fn introduce(&mut self, entity: Entity, events: &mut Vec<GameEvent>) -> EntityId {
        let kind = entity.kind();
        let pos = self.wrap(entity.pos);
        let id = self.spawn(entity);
        log::debug!("{:?} {} spawned at ({:.1}, {:.1})", kind, id, pos.x, pos.y);
        events.push(GameEvent::EntityCreated { id, kind, pos });
        id
    }

    /// Move pending entities into the live set. Returns how many were added.
    pub fn commit(&mut self) -> usize {
        let added = self.pending.len();
        // Ids are allocated monotonically, so appending keeps the order sorted
        self.entities.append(&mut self.pending);
        added
    }

    /// Mark an entity defunct. Returns it if this call killed it; `None` if it was
    /// unknown or already dead.
    pub fn remove(&mut self, id: EntityId) -> Option<&Entity> {
        let entity = self.find_mut(id)?;
        if entity.mark_defunct() {
            Some(&*entity)
        } else {
            None
        }
    }

    /// Delete defunct entities. Returns how many were removed.
    pub fn reap(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| e.alive);
        before - self.entities.len()
    }

    /// Drop every live and pending entity, returning the live ones
    pub fn clear(&mut self) -> Vec<Entity> {
        self.pending.clear();
        let mut removed = std::mem::take(&mut self.entities);
        removed.retain(|e| e.alive);
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id && e.alive)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id && e.alive)
    }

    fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match self.entities.binary_search_by_key(&id, |e| e.id) {
            Ok(index) => Some(&mut self.entities[index]),
            Err(_) => self.pending.iter_mut().find(|e| e.id == id),
        }
    }

    /// Live entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.alive)
    }

    pub fn iter_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.iter().filter(move |e| e.kind() == kind)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.iter_kind(kind).count()
    }

    /// Live entities plus pending ones of `kind`
    pub fn count_including_pending(&self, kind: EntityKind) -> usize {
        self.count(kind) + self.pending.iter().filter(|e| e.alive && e.kind() == kind).count()
    }

    /// Total live entities
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ship(&self) -> Option<&Entity> {
        self.iter_kind(EntityKind::Ship).next()
    }

    pub fn ship_mut(&mut self) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| e.alive && e.kind() == EntityKind::Ship)
    }

    /// Any live entity of `kind` touching `entity` (excluding itself)
    pub fn query_overlapping(&self, entity: &Entity, kind: EntityKind) -> Option<&Entity> {
        self.iter_kind(kind)
            .find(|other| other.id != entity.id && entity.overlaps(other))
    }

    /// Nearest live entity of `kind` to `pos`
    pub fn nearest(&self, pos: Vec2, kind: EntityKind) -> Option<&Entity> {
        self.iter_kind(kind).min_by(|a, b| {
            a.pos
                .distance_squared(pos)
                .partial_cmp(&b.pos.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Raw slice including defunct entities, for index-based passes
    pub(crate) fn slots(&self) -> &[Entity] {
        &self.entities
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }
}

fn wrap_axis(value: f32, span: f32) -> f32 {
    if value < 0.0 {
        let wrapped = value + span;
        // A tiny negative can round up to exactly `span`
        if wrapped >= span { 0.0 } else { wrapped }
    } else if value >= span {
        value - span
    } else {
        value
    }
}
