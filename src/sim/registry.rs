//! Entity registry
//!
//! Maps physics bodies to game entities. A body that is not registered here is
//! scenery (walls, floor) as far as the game rules are concerned.

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use super::physics::BodyHandle;
use super::tier::{self, Tier, TierIndex};

new_key_type! {
    /// Generational entity handle; a consumed id never aliases a later entity.
    pub struct EntityId;
}

/// Game-side state attached to an orb body
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub body: BodyHandle,
    pub tier: TierIndex,
    /// Released by the player (or produced by a merge)
    pub dropped: bool,
    /// Clock time (ms) the orb was first seen above the danger line.
    /// Owned by the danger monitor.
    pub danger_since: Option<f64>,
}

/// What a body is, from the game's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Entity(EntityId),
    Environment,
}

#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: SlotMap<EntityId, Entity>,
    by_body: HashMap<BodyHandle, EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly created orb body
    pub fn insert(&mut self, body: BodyHandle, tier: TierIndex, dropped: bool) -> EntityId {
        let id = self.entities.insert(Entity {
            body,
            tier,
            dropped,
            danger_since: None,
        });
        self.by_body.insert(body, id);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        self.by_body.remove(&entity.body);
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn classify(&self, body: BodyHandle) -> BodyKind {
        match self.by_body.get(&body) {
            Some(&id) => BodyKind::Entity(id),
            None => BodyKind::Environment,
        }
    }

    /// Tier data for a live entity
    pub fn tier_of(&self, id: EntityId) -> Option<&'static Tier> {
        self.entities.get(id).and_then(|e| tier::get(e.tier))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Forget every entity, returning their bodies so the caller can remove
    /// them from the physics world.
    pub fn clear(&mut self) -> Vec<BodyHandle> {
        let bodies = self.entities.values().map(|e| e.body).collect();
        self.entities.clear();
        self.by_body.clear();
        bodies
    }
}
