//! Collision detection and response
//!
//! Every collider in the game is a circle: needles, weak points, shields,
//! reflectors and the virus body. Contacts are inclusive, so touching circles
//! count as a hit.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the static circle's surface
    pub point: Vec2,
    /// Unit normal from the static circle toward the moving one
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Inclusive circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) <= a_radius + b_radius
}

/// Full contact info for a moving circle against a static one
///
/// When the centers coincide the normal falls back to `fallback`, which
/// callers set to the reverse of the travel direction.
pub fn circle_collision(
    pos: Vec2,
    radius: f32,
    center: Vec2,
    center_radius: f32,
    fallback: Vec2,
) -> CollisionResult {
    let offset = pos - center;
    let dist = offset.length();
    let reach = radius + center_radius;
    if dist > reach {
        return CollisionResult::miss();
    }

    let normal = offset.try_normalize().unwrap_or(fallback);
    CollisionResult {
        hit: true,
        point: center + normal * center_radius,
        normal,
        penetration: reach - dist,
    }
}

/// Reflect a vector off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

/// Whether a point lies outside a playfield of the given size centred on the origin
#[inline]
pub fn out_of_bounds(pos: Vec2, width: f32, height: f32) -> bool {
    pos.x.abs() > width / 2.0 || pos.y.abs() > height / 2.0
}
