//! Built-in physics world
//!
//! A small impulse solver for circles resting on static boxes. Good enough to
//! stack orbs in a box and to drive the game headless; swap in a full engine
//! through [`PhysicsWorld`] for anything fancier.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::collision::{CollisionResult, circle_circle_collision, circle_rect_collision, contact_impulse};
use super::physics::{BodyHandle, Material, PhysicsWorld, Shape, StepReport};

/// Gap (px) within which a touching pair still counts as in contact.
/// Keeps resting stacks from re-firing collision-start every step.
const CONTACT_SLOP: f32 = 0.5;
/// Fraction of overlap removed per solver iteration
const POSITION_CORRECTION: f32 = 0.8;
/// Impacts slower than this (px/s) don't bounce
const BOUNCE_THRESHOLD: f32 = 30.0;
/// Solver iterations per step
const SOLVER_ITERATIONS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Static,
    Kinematic,
    Dynamic,
}

#[derive(Debug, Clone)]
struct Body {
    shape: Shape,
    pos: Vec2,
    vel: Vec2,
    material: Material,
    motion: Motion,
    in_world: bool,
    /// Inverse of the body's area; zero while pinned
    inv_mass: f32,
}

impl Body {
    fn movable(&self) -> bool {
        self.motion == Motion::Dynamic
    }

    fn effective_inv_mass(&self) -> f32 {
        if self.movable() { self.inv_mass } else { 0.0 }
    }
}

fn inverse_area(shape: Shape) -> f32 {
    let area = match shape {
        Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
        Shape::Rect { half_extents } => 4.0 * half_extents.x * half_extents.y,
    };
    if area > 0.0 { 1.0 / area } else { 0.0 }
}

/// Contact between two shapes; normal points toward the first body
fn shape_contact(a: &Body, b: &Body) -> Option<CollisionResult> {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            Some(circle_circle_collision(a.pos, ra, b.pos, rb))
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            Some(circle_rect_collision(a.pos, radius, b.pos, half_extents))
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            Some(circle_rect_collision(b.pos, radius, a.pos, half_extents).flipped())
        }
        // Boxes are only ever static scenery
        (Shape::Rect { .. }, Shape::Rect { .. }) => None,
    }
}

/// Gravity-driven circle world with collision-start reporting
#[derive(Debug, Clone)]
pub struct CircleWorld {
    bodies: BTreeMap<BodyHandle, Body>,
    gravity: Vec2,
    /// Pairs touching at the end of the previous step
    contacts: BTreeSet<(BodyHandle, BodyHandle)>,
    next_handle: u32,
}

impl CircleWorld {
    /// Create an empty world with the given gravity (px/s², +y is down)
    pub fn new(gravity: Vec2) -> Self {
        Self {
            bodies: BTreeMap::new(),
            gravity,
            contacts: BTreeSet::new(),
            next_handle: 1,
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Number of bodies taking part in the simulation
    pub fn body_count(&self) -> usize {
        self.bodies.values().filter(|b| b.in_world).count()
    }

    pub fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).filter(|b| b.in_world).map(|b| b.vel)
    }

    pub fn is_kinematic(&self, body: BodyHandle) -> bool {
        self.bodies
            .get(&body)
            .is_some_and(|b| b.motion == Motion::Kinematic)
    }

    fn insert(&mut self, shape: Shape, pos: Vec2, material: Material, motion: Motion) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            Body {
                shape,
                pos,
                vel: Vec2::ZERO,
                material,
                motion,
                in_world: false,
                inv_mass: if motion == Motion::Dynamic { inverse_area(shape) } else { 0.0 },
            },
        );
        handle
    }

    /// Detect, and optionally resolve, contact between two bodies
    fn solve_pair(&mut self, ha: BodyHandle, hb: BodyHandle, resolve: bool) -> bool {
        let (Some(a), Some(b)) = (self.bodies.get(&ha), self.bodies.get(&hb)) else {
            return false;
        };
        if !a.movable() && !b.movable() {
            return false;
        }
        let Some(contact) = shape_contact(a, b) else {
            return false;
        };
        if contact.penetration <= -CONTACT_SLOP {
            return false;
        }
        if !resolve || contact.penetration <= 0.0 {
            return true;
        }

        let inv_a = a.effective_inv_mass();
        let inv_b = b.effective_inv_mass();
        let inv_sum = inv_a + inv_b;
        let restitution = a.material.restitution.min(b.material.restitution);
        let friction = (a.material.friction * b.material.friction).sqrt();

        let approach = (a.vel - b.vel).dot(contact.normal);
        let bounce = if approach < -BOUNCE_THRESHOLD { restitution } else { 0.0 };
        let impulse = contact_impulse(a.vel, inv_a, b.vel, inv_b, contact.normal, bounce, friction);
        let correction = contact.normal * (contact.penetration * POSITION_CORRECTION / inv_sum);

        if let Some(a) = self.bodies.get_mut(&ha) {
            a.pos += correction * inv_a;
            if let Some(impulse) = impulse {
                a.vel += impulse.delta_a;
            }
        }
        if let Some(b) = self.bodies.get_mut(&hb) {
            b.pos -= correction * inv_b;
            if let Some(impulse) = impulse {
                b.vel += impulse.delta_b;
            }
        }
        true
    }
}

impl PhysicsWorld for CircleWorld {
    fn create_static_body(&mut self, shape: Shape, pos: Vec2) -> BodyHandle {
        self.insert(shape, pos, Material::default(), Motion::Static)
    }

    fn create_dynamic_body(&mut self, shape: Shape, pos: Vec2, material: Material) -> BodyHandle {
        self.insert(shape, pos, material, Motion::Dynamic)
    }

    fn add_to_world(&mut self, body: BodyHandle) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.in_world = true;
        }
    }

    fn remove_from_world(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
        self.contacts.retain(|&(a, b)| a != body && b != body);
    }

    fn set_position(&mut self, body: BodyHandle, pos: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.pos = pos;
        }
    }

    fn set_velocity(&mut self, body: BodyHandle, vel: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.vel = vel;
        }
    }

    fn set_kinematic(&mut self, body: BodyHandle, kinematic: bool) {
        if let Some(b) = self.bodies.get_mut(&body) {
            match (b.motion, kinematic) {
                (Motion::Dynamic, true) => {
                    b.motion = Motion::Kinematic;
                    b.vel = Vec2::ZERO;
                }
                (Motion::Kinematic, false) => b.motion = Motion::Dynamic,
                _ => {}
            }
        }
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).filter(|b| b.in_world).map(|b| b.pos)
    }

    fn step(&mut self, dt_ms: f32) -> StepReport {
        let dt = dt_ms / 1000.0;

        // Semi-implicit Euler
        for body in self.bodies.values_mut() {
            if body.in_world && body.movable() {
                body.vel += self.gravity * dt;
                body.pos += body.vel * dt;
            }
        }

        let handles: Vec<BodyHandle> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.in_world)
            .map(|(h, _)| *h)
            .collect();

        for _ in 0..SOLVER_ITERATIONS {
            for (i, &ha) in handles.iter().enumerate() {
                for &hb in &handles[i + 1..] {
                    self.solve_pair(ha, hb, true);
                }
            }
        }

        // Final contact set decides which pairs just started touching
        let mut touching = BTreeSet::new();
        for (i, &ha) in handles.iter().enumerate() {
            for &hb in &handles[i + 1..] {
                if self.solve_pair(ha, hb, false) {
                    touching.insert((ha, hb));
                }
            }
        }

        let collisions = touching.difference(&self.contacts).copied().collect();
        self.contacts = touching;

        let positions = handles
            .iter()
            .filter_map(|h| self.bodies.get(h).map(|b| (*h, b.pos)))
            .collect();

        StepReport {
            collisions,
            positions,
        }
    }
}
