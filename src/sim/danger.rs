//! Overflow detection
//!
//! Orbs pass above the danger line all the time while bouncing after a drop or
//! a merge. Only an orb that stays above it for the whole grace period ends the
//! game. Dropping back below the line resets that orb's timer.

use glam::Vec2;

use super::physics::BodyHandle;
use super::registry::{BodyKind, EntityId, EntityRegistry};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerVerdict {
    Safe,
    /// This orb stayed above the line for the full grace period
    Overflowed(EntityId),
}

/// Inspect post-step positions and update every orb's danger timer.
///
/// Stops at the first overflowing orb; later orbs keep their timers untouched
/// for this step.
pub fn monitor(
    positions: &[(BodyHandle, Vec2)],
    registry: &mut EntityRegistry,
    now_ms: f64,
    settings: &Settings,
) -> DangerVerdict {
    for &(body, pos) in positions {
        let BodyKind::Entity(id) = registry.classify(body) else {
            continue;
        };
        let Some(entity) = registry.get_mut(id) else {
            continue;
        };

        if pos.y < settings.danger_line {
            match entity.danger_since {
                None => entity.danger_since = Some(now_ms),
                Some(since) if now_ms - since >= settings.danger_grace_ms => {
                    return DangerVerdict::Overflowed(id);
                }
                Some(_) => {}
            }
        } else {
            entity.danger_since = None;
        }
    }
    DangerVerdict::Safe
}
