//! Physics world adapter
//!
//! The game rules never integrate motion themselves. Everything physical goes
//! through [`PhysicsWorld`], so any 2D rigid-body engine can sit underneath.
//! Coordinates are screen space: +y points down, units are pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to a body owned by a physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned box
    Rect { half_extents: Vec2 },
}

/// Surface response of a dynamic body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
        }
    }
}

/// Everything a single simulation step produced
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Pairs that started touching this step, in a stable order
    pub collisions: Vec<(BodyHandle, BodyHandle)>,
    /// Position of every body in the world after the step
    pub positions: Vec<(BodyHandle, Vec2)>,
}

/// A 2D rigid-body simulation the game drives.
///
/// Bodies are created detached; they take part in the simulation only after
/// [`add_to_world`](PhysicsWorld::add_to_world). Removing a body is immediate:
/// it reports no further positions or collisions.
pub trait PhysicsWorld {
    /// Create an immovable body (walls, floor)
    fn create_static_body(&mut self, shape: Shape, pos: Vec2) -> BodyHandle;

    /// Create a body that is moved by gravity and contacts
    fn create_dynamic_body(&mut self, shape: Shape, pos: Vec2, material: Material) -> BodyHandle;

    fn add_to_world(&mut self, body: BodyHandle);

    fn remove_from_world(&mut self, body: BodyHandle);

    fn set_position(&mut self, body: BodyHandle, pos: Vec2);

    fn set_velocity(&mut self, body: BodyHandle, vel: Vec2);

    /// Pin a dynamic body in place (true) or hand it back to the solver (false)
    fn set_kinematic(&mut self, body: BodyHandle, kinematic: bool);

    /// Current position, or `None` if the body is not in the world
    fn position(&self, body: BodyHandle) -> Option<Vec2>;

    /// Advance the simulation by `dt_ms` milliseconds
    fn step(&mut self, dt_ms: f32) -> StepReport;
}
