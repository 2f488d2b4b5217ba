//! Fixed-capacity table of pooled entities with generation-checked handles.

use log::warn;
use prism_core::{rng::SimRng, EntityId, Event};
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    beam::Beam,
    controller::Controller,
    projectile::{Owner, Projectile, ProjectileKind},
};

/// Anything occupying a slot in the shared entity pool.
#[derive(Clone, Debug)]
pub(crate) enum Entity {
    Controller(Controller),
    Beam(Beam),
    Projectile(Projectile),
}

/// Failures raised when the pool cannot accept an entity.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub(crate) enum PoolError {
    /// Every slot is taken.
    #[error("entity pool is full ({capacity} slots)")]
    Exhausted {
        /// Capacity of the pool.
        capacity: usize,
    },
}

/// Shared pool holding controllers, beams, and projectiles.
///
/// Only projectiles are eligible for forced eviction; the weapon's own
/// controllers and beams are never evicted to make room.
#[derive(Clone, Debug)]
pub(crate) struct EntityPool {
    slots: SlotMap<EntityId, Entity>,
    capacity: usize,
}

impl EntityPool {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            capacity,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether fewer than `headroom` slots would remain free.
    pub(crate) fn is_near_capacity(&self, headroom: usize) -> bool {
        self.slots.len() + headroom >= self.capacity
    }

    pub(crate) fn insert(&mut self, entity: Entity) -> Result<EntityId, PoolError> {
        if self.slots.len() >= self.capacity {
            return Err(PoolError::Exhausted {
                capacity: self.capacity,
            });
        }
        Ok(self.slots.insert(entity))
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.slots.remove(id)
    }

    pub(crate) fn controller(&self, id: EntityId) -> Option<&Controller> {
        match self.slots.get(id) {
            Some(Entity::Controller(controller)) => Some(controller),
            _ => None,
        }
    }

    pub(crate) fn controller_mut(&mut self, id: EntityId) -> Option<&mut Controller> {
        match self.slots.get_mut(id) {
            Some(Entity::Controller(controller)) => Some(controller),
            _ => None,
        }
    }

    pub(crate) fn beam(&self, id: EntityId) -> Option<&Beam> {
        match self.slots.get(id) {
            Some(Entity::Beam(beam)) => Some(beam),
            _ => None,
        }
    }

    pub(crate) fn beam_mut(&mut self, id: EntityId) -> Option<&mut Beam> {
        match self.slots.get_mut(id) {
            Some(Entity::Beam(beam)) => Some(beam),
            _ => None,
        }
    }

    pub(crate) fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        match self.slots.get(id) {
            Some(Entity::Projectile(projectile)) => Some(projectile),
            _ => None,
        }
    }

    pub(crate) fn projectile_mut(&mut self, id: EntityId) -> Option<&mut Projectile> {
        match self.slots.get_mut(id) {
            Some(Entity::Projectile(projectile)) => Some(projectile),
            _ => None,
        }
    }

    /// Controllers in slot order.
    pub(crate) fn controller_ids(&self) -> Vec<EntityId> {
        self.ids_where(|entity| matches!(entity, Entity::Controller(_)))
    }

    /// Beams in slot order.
    pub(crate) fn beam_ids(&self) -> Vec<EntityId> {
        self.ids_where(|entity| matches!(entity, Entity::Beam(_)))
    }

    /// Projectiles in slot order.
    pub(crate) fn projectile_ids(&self) -> Vec<EntityId> {
        self.ids_where(|entity| matches!(entity, Entity::Projectile(_)))
    }

    fn ids_where(&self, keep: impl Fn(&Entity) -> bool) -> Vec<EntityId> {
        self.slots
            .iter()
            .filter(|(_, entity)| keep(entity))
            .map(|(id, _)| id)
            .collect()
    }

    /// Evicts up to `count` random projectiles, returning their handles.
    pub(crate) fn evict(&mut self, count: usize, rng: &mut SimRng) -> Vec<EntityId> {
        let mut candidates = self.projectile_ids();
        let mut evicted = Vec::with_capacity(count.min(candidates.len()));
        while evicted.len() < count && !candidates.is_empty() {
            let id = candidates.swap_remove(rng.below(candidates.len()));
            let _ = self.slots.remove(id);
            evicted.push(id);
        }
        evicted
    }

    /// Evicts `headroom` projectiles when fewer than `headroom` slots remain free.
    pub(crate) fn make_room(&mut self, headroom: usize, rng: &mut SimRng, out_events: &mut Vec<Event>) {
        if !self.is_near_capacity(headroom) {
            return;
        }
        let evicted = self.evict(headroom, rng);
        warn!(
            "entity pool near capacity ({}/{}), evicted {} projectiles",
            self.slots.len(),
            self.capacity,
            evicted.len()
        );
        out_events.extend(evicted.into_iter().map(|entity| Event::EntityEvicted { entity }));
    }

    /// Inserts `entity`, skipping the spawn when the pool is full.
    pub(crate) fn spawn(&mut self, entity: Entity, out_events: &mut Vec<Event>) -> Option<EntityId> {
        match self.insert(entity) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!("spawn skipped: {error}");
                out_events.push(Event::SpawnSkipped);
                None
            }
        }
    }

    /// Inserts an effect projectile and announces it.
    pub(crate) fn spawn_effect(
        &mut self,
        projectile: Projectile,
        out_events: &mut Vec<Event>,
    ) -> Option<EntityId> {
        let (kind, owner) = (projectile.kind, projectile.owner);
        let id = self.spawn(Entity::Projectile(projectile), out_events)?;
        if let (ProjectileKind::Effect(kind), Owner::Actor(actor)) = (kind, owner) {
            out_events.push(Event::EffectSpawned {
                projectile: id,
                kind,
                actor,
            });
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use prism_core::Vec2;

    use super::*;

    fn shot() -> Entity {
        Entity::Projectile(Projectile::hostile(
            1,
            Vec2::ZERO,
            Vec2::splat(8.0),
            Vec2::X,
            10,
        ))
    }

    #[test]
    fn insert_fails_once_full() {
        let mut pool = EntityPool::new(2);
        assert!(pool.insert(shot()).is_ok());
        assert!(pool.insert(shot()).is_ok());
        assert_eq!(
            pool.insert(shot()),
            Err(PoolError::Exhausted { capacity: 2 })
        );
    }

    #[test]
    fn spawn_reports_skips() {
        let mut pool = EntityPool::new(1);
        let mut events = Vec::new();
        assert!(pool.spawn(shot(), &mut events).is_some());
        assert!(pool.spawn(shot(), &mut events).is_none());
        assert_eq!(events, vec![Event::SpawnSkipped]);
    }

    #[test]
    fn removed_handles_are_invalidated() {
        let mut pool = EntityPool::new(4);
        let id = pool.insert(shot()).expect("room for one");
        assert!(pool.remove(id).is_some());
        let replacement = pool.insert(shot()).expect("room again");
        assert_ne!(id, replacement);
        assert!(pool.projectile(id).is_none());
        assert!(pool.projectile(replacement).is_some());
    }

    #[test]
    fn make_room_evicts_only_when_near_capacity() {
        let mut pool = EntityPool::new(10);
        let mut rng = SimRng::seeded(3);
        let mut events = Vec::new();
        for _ in 0..4 {
            let _ = pool.insert(shot()).expect("room");
        }
        pool.make_room(5, &mut rng, &mut events);
        assert_eq!(pool.len(), 4);
        assert!(events.is_empty());

        for _ in 0..4 {
            let _ = pool.insert(shot()).expect("room");
        }
        pool.make_room(5, &mut rng, &mut events);
        assert_eq!(pool.len(), 3);
        assert_eq!(events.len(), 5);
        assert!(events
            .iter()
            .all(|event| matches!(event, Event::EntityEvicted { .. })));
    }
}
