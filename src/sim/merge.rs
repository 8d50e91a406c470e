//! Merge resolution
//!
//! Two orbs of the same tier that start touching become one orb of the next
//! tier at their midpoint. Pairs are handled in delivery order and both inputs
//! leave the registry and the world before the next pair is looked at, so a
//! consumed orb can never merge twice.

use glam::Vec2;

use super::physics::{BodyHandle, PhysicsWorld, Shape};
use super::registry::{BodyKind, EntityId, EntityRegistry};
use super::tier::{self, TierIndex};
use crate::settings::Settings;

/// One performed merge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOutcome {
    /// The two orbs that were consumed
    pub consumed: [EntityId; 2],
    /// The orb that replaced them
    pub product: EntityId,
    /// Tier of the product
    pub tier: TierIndex,
    pub position: Vec2,
    /// Score value of the product tier
    pub points: u64,
}

/// Handle a single collision-start event
pub fn on_collision<W: PhysicsWorld>(
    a: BodyHandle,
    b: BodyHandle,
    world: &mut W,
    registry: &mut EntityRegistry,
    settings: &Settings,
) -> Option<MergeOutcome> {
    // Walls, floor and already-consumed orbs all classify as environment
    let (BodyKind::Entity(id_a), BodyKind::Entity(id_b)) = (registry.classify(a), registry.classify(b))
    else {
        return None;
    };
    if id_a == id_b {
        return None;
    }

    let tier_a = registry.get(id_a)?.tier;
    let tier_b = registry.get(id_b)?.tier;
    if tier_a != tier_b {
        return None;
    }
    let product = tier::merge_product(tier_a)?;

    let position = (world.position(a)? + world.position(b)?) / 2.0;

    registry.remove(id_a);
    registry.remove(id_b);
    world.remove_from_world(a);
    world.remove_from_world(b);

    let body = world.create_dynamic_body(
        Shape::Circle {
            radius: product.radius,
        },
        position,
        settings.orb_material(),
    );
    world.add_to_world(body);
    world.set_velocity(body, Vec2::new(0.0, -settings.merge_pop_speed));
    let id = registry.insert(body, product.index, true);

    if product.index >= 8 {
        log::info!("Merged into {} at ({:.0}, {:.0})", product.name, position.x, position.y);
    } else {
        log::debug!("Merged into {} at ({:.0}, {:.0})", product.name, position.x, position.y);
    }

    Some(MergeOutcome {
        consumed: [id_a, id_b],
        product: id,
        tier: product.index,
        position,
        points: product.score,
    })
}

/// Handle one step's worth of collision-start events, in order
pub fn resolve_collisions<W: PhysicsWorld>(
    pairs: &[(BodyHandle, BodyHandle)],
    world: &mut W,
    registry: &mut EntityRegistry,
    settings: &Settings,
) -> Vec<MergeOutcome> {
    pairs
        .iter()
        .filter_map(|&(a, b)| on_collision(a, b, world, registry, settings))
        .collect()
}
