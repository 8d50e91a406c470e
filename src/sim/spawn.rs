//! Spawn controller
//!
//! Owns the held orb, the next-orb preview and the drop gate. A drop schedules
//! the following spawn after a cooldown so orbs never appear on top of each
//! other at the spawn point.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::physics::{PhysicsWorld, Shape};
use super::registry::{EntityId, EntityRegistry};
use super::tier::{self, SPAWNABLE_TIERS, TierIndex};
use crate::consts::FALLBACK_HOLD_RADIUS;
use crate::settings::Settings;

/// A spawn waiting for its cooldown to expire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSpawn {
    /// Session clock time (ms) at which the spawn fires
    pub due_ms: f64,
    /// Session generation that scheduled it
    pub generation: u32,
}

#[derive(Debug, Clone)]
pub struct SpawnController {
    rng: Pcg32,
    /// Orb currently held by the player (or just dropped)
    pub(crate) current: Option<EntityId>,
    /// Tier of the orb after the current one
    pub(crate) next: TierIndex,
    pub(crate) can_drop: bool,
    /// Last pointer x; future spawns appear here
    pointer_x: f32,
    pending: Option<PendingSpawn>,
}

impl SpawnController {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let next = rng.random_range(0..SPAWNABLE_TIERS);
        Self {
            rng,
            current: None,
            next,
            can_drop: true,
            pointer_x: settings.width / 2.0,
            pending: None,
        }
    }

    /// Uniform pick among the spawnable tiers; bigger orbs only come from merges
    pub fn pick_random_tier(&mut self) -> TierIndex {
        self.rng.random_range(0..SPAWNABLE_TIERS)
    }

    pub fn next_tier(&self) -> TierIndex {
        self.next
    }

    pub fn current(&self) -> Option<EntityId> {
        self.current
    }

    pub fn can_drop(&self) -> bool {
        self.can_drop
    }

    pub fn pointer_x(&self) -> f32 {
        self.pointer_x
    }

    pub fn pending(&self) -> Option<PendingSpawn> {
        self.pending
    }

    /// Held orb, if the player can still steer it
    fn held(&self, registry: &EntityRegistry) -> Option<EntityId> {
        self.current
            .filter(|&id| registry.get(id).is_some_and(|e| !e.dropped))
    }

    /// Create a pinned orb of the `next` tier at the pointer and draw a new `next`
    pub fn spawn<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        registry: &mut EntityRegistry,
        settings: &Settings,
    ) -> EntityId {
        let tier_index = self.next;
        let radius = tier::get(tier_index).map_or(FALLBACK_HOLD_RADIUS, |t| t.radius);
        let x = settings.clamp_hold_x(self.pointer_x, radius);
        let pos = Vec2::new(x, settings.spawn_y);

        let body = world.create_dynamic_body(Shape::Circle { radius }, pos, settings.orb_material());
        world.set_kinematic(body, true);
        world.add_to_world(body);
        let id = registry.insert(body, tier_index, false);

        self.current = Some(id);
        self.next = self.pick_random_tier();
        self.can_drop = true;
        id
    }

    /// Pin the held orb's x to the pointer, kept inside the walls
    pub fn follow_pointer<W: PhysicsWorld>(
        &mut self,
        x: f32,
        world: &mut W,
        registry: &EntityRegistry,
        settings: &Settings,
    ) {
        let held = self.held(registry);
        let radius = held
            .and_then(|id| registry.tier_of(id))
            .map_or(FALLBACK_HOLD_RADIUS, |t| t.radius);
        self.pointer_x = settings.clamp_hold_x(x, radius);

        let Some(entity) = held.and_then(|id| registry.get(id)) else {
            return;
        };
        if let Some(pos) = world.position(entity.body) {
            world.set_position(entity.body, Vec2::new(self.pointer_x, pos.y));
        }
    }

    /// Let the held orb fall and schedule the next spawn.
    ///
    /// Returns the dropped orb, or `None` if there was nothing droppable.
    pub fn release<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        registry: &mut EntityRegistry,
        now_ms: f64,
        generation: u32,
        settings: &Settings,
    ) -> Option<EntityId> {
        if !self.can_drop {
            return None;
        }
        let id = self.held(registry)?;
        let entity = registry.get_mut(id)?;

        entity.dropped = true;
        world.set_kinematic(entity.body, false);
        self.can_drop = false;
        self.pending = Some(PendingSpawn {
            due_ms: now_ms + settings.spawn_cooldown_ms,
            generation,
        });
        Some(id)
    }

    /// Consume the pending spawn if it is due. Spawns left over from an older
    /// generation are discarded without firing.
    pub fn take_due(&mut self, now_ms: f64, generation: u32) -> bool {
        match self.pending {
            Some(p) if p.generation != generation => {
                log::debug!("Discarding stale spawn from generation {}", p.generation);
                self.pending = None;
                false
            }
            Some(p) if now_ms >= p.due_ms => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// The orb with this id no longer exists.
    ///
    /// If it was still held, nothing is queued to replace it, so a spawn is
    /// scheduled after the usual cooldown and drops are blocked until then.
    pub fn forget(&mut self, id: EntityId, now_ms: f64, generation: u32, settings: &Settings) {
        if self.current != Some(id) {
            return;
        }
        self.current = None;
        if self.pending.is_none() {
            log::debug!("Held orb merged away, respawning");
            self.can_drop = false;
            self.pending = Some(PendingSpawn {
                due_ms: now_ms + settings.spawn_cooldown_ms,
                generation,
            });
        }
    }

    /// Block further drops (game over)
    pub fn lock(&mut self) {
        self.can_drop = false;
    }

    /// Clear the slot for a new game and redraw the preview
    pub fn reset(&mut self) {
        self.current = None;
        self.pending = None;
        self.can_drop = true;
        self.next = self.pick_random_tier();
    }
}
