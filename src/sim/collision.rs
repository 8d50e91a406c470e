//! Contact detection and response for circles and boxes
//!
//! Orbs are circles; the walls and floor are axis-aligned boxes. Each check
//! returns a [`CollisionResult`] whose normal points toward the first shape,
//! so pushing the first shape along the normal separates the pair.

use glam::Vec2;

/// Result of a contact check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec2,
    /// Unit normal pointing toward the first shape
    pub normal: Vec2,
    /// Overlap depth; negative values are the gap between the shapes
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: f32::NEG_INFINITY,
        }
    }

    /// Same contact seen from the other shape
    pub fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// Check two circles against each other.
///
/// The gap is reported even on a miss so callers can apply contact slop.
pub fn circle_circle_collision(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> CollisionResult {
    let delta = pos_a - pos_b;
    let dist = delta.length();
    let penetration = radius_a + radius_b - dist;

    // Coincident centers: push straight up
    let normal = if dist > 1e-4 { delta / dist } else { Vec2::NEG_Y };

    CollisionResult {
        hit: penetration > 0.0,
        point: pos_b + normal * radius_b,
        normal,
        penetration,
    }
}

/// Check a circle against an axis-aligned box
pub fn circle_rect_collision(
    circle_pos: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let local = circle_pos - rect_center;
    let closest = local.clamp(-half_extents, half_extents);
    let outside = local - closest;

    if outside.length_squared() > 1e-8 {
        let dist = outside.length();
        let normal = outside / dist;
        return CollisionResult {
            hit: dist < radius,
            point: rect_center + closest,
            normal,
            penetration: radius - dist,
        };
    }

    // Center inside the box: exit through the nearest face
    let to_face = half_extents - local.abs();
    let (normal, depth) = if to_face.x < to_face.y {
        (Vec2::new(local.x.signum(), 0.0), to_face.x)
    } else {
        (Vec2::new(0.0, local.y.signum()), to_face.y)
    };

    CollisionResult {
        hit: true,
        point: circle_pos - normal * depth,
        normal,
        penetration: radius + depth,
    }
}

/// Velocity change for a pair of bodies in contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactImpulse {
    pub delta_a: Vec2,
    pub delta_b: Vec2,
}

/// Compute the normal + friction impulse for an approaching pair.
///
/// `normal` points from b toward a. Bodies with zero inverse mass do not move.
/// Returns `None` if the pair is separating or both bodies are immovable.
pub fn contact_impulse(
    vel_a: Vec2,
    inv_mass_a: f32,
    vel_b: Vec2,
    inv_mass_b: f32,
    normal: Vec2,
    restitution: f32,
    friction: f32,
) -> Option<ContactImpulse> {
    let inv_sum = inv_mass_a + inv_mass_b;
    if inv_sum <= 0.0 {
        return None;
    }

    let rel = vel_a - vel_b;
    let vn = rel.dot(normal);
    if vn >= 0.0 {
        return None;
    }

    let j = -(1.0 + restitution) * vn / inv_sum;
    let mut impulse = normal * j;

    // Coulomb friction along the tangent
    let tangential = rel - normal * vn;
    let tangent_speed = tangential.length();
    if tangent_speed > 1e-4 {
        let tangent = tangential / tangent_speed;
        let jt = (tangent_speed / inv_sum).min(friction * j);
        impulse -= tangent * jt;
    }

    Some(ContactImpulse {
        delta_a: impulse * inv_mass_a,
        delta_b: -impulse * inv_mass_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle_overlap() {
        let result = circle_circle_collision(Vec2::new(0.0, 0.0), 20.0, Vec2::new(30.0, 0.0), 20.0);
        assert!(result.hit);
        assert!((result.penetration - 10.0).abs() < 0.001);
        // Normal points from b toward a
        assert!((result.normal - Vec2::new(-1.0, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_circle_circle_gap() {
        let result = circle_circle_collision(Vec2::new(0.0, 0.0), 10.0, Vec2::new(25.0, 0.0), 10.0);
        assert!(!result.hit);
        assert!((result.penetration + 5.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_resting_on_floor() {
        // Floor box centered at y=710 spanning 700..720
        let floor_center = Vec2::new(280.0, 710.0);
        let half = Vec2::new(280.0, 10.0);

        let result = circle_rect_collision(Vec2::new(100.0, 685.0), 20.0, floor_center, half);
        assert!(result.hit);
        assert!((result.penetration - 5.0).abs() < 0.001);
        // Normal points up, out of the floor
        assert!(result.normal.y < -0.99);

        let result = circle_rect_collision(Vec2::new(100.0, 600.0), 20.0, floor_center, half);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_center_inside_rect() {
        let result = circle_rect_collision(Vec2::new(-5.0, 350.0), 20.0, Vec2::new(-10.0, 350.0), Vec2::new(10.0, 350.0));
        assert!(result.hit);
        // Nearest face is the right one
        assert!(result.normal.x > 0.99);
        assert!((result.penetration - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_impulse_against_static_body() {
        let impulse = contact_impulse(
            Vec2::new(0.0, 100.0),
            1.0,
            Vec2::ZERO,
            0.0,
            Vec2::new(0.0, -1.0),
            0.5,
            0.0,
        )
        .unwrap();
        // Bounces back at half speed, static side untouched
        assert!(((Vec2::new(0.0, 100.0) + impulse.delta_a).y + 50.0).abs() < 0.001);
        assert_eq!(impulse.delta_b, Vec2::ZERO);
    }

    #[test]
    fn test_no_impulse_when_separating() {
        let impulse = contact_impulse(
            Vec2::new(0.0, -10.0),
            1.0,
            Vec2::ZERO,
            0.0,
            Vec2::new(0.0, -1.0),
            0.3,
            0.5,
        );
        assert!(impulse.is_none());
    }
}
