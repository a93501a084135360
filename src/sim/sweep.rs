//! Swept box-vs-box collision
//!
//! A moving box hits another box exactly when its center, travelling along the
//! relative velocity, enters the other box grown by half the mover's size. That
//! turns the sweep into a ray-vs-box slab test.

use glam::Vec2;

use super::geometry::Box2;

/// Result of a ray hitting a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    /// Ray parameter where the ray enters the box (may be negative)
    pub near: f32,
    /// Ray parameter where the ray leaves the box
    pub far: f32,
    /// Surface normal at `near`, pointing back toward the ray origin
    pub normal: Vec2,
}

/// Ray vs. axis-aligned box slab test
///
/// `direction` is not normalized; times are in units of `direction`, so with a
/// relative velocity as direction the times are seconds.
///
/// Returns `None` when the ray misses, and also when a direction component is
/// exactly zero while the origin lies exactly on one of that axis' box edges
/// (the slab times would be 0/0).
pub fn ray_vs_box(origin: Vec2, direction: Vec2, target: &Box2) -> Option<Sweep> {
    let on_x_edge = origin.x == target.min.x || origin.x == target.max.x;
    let on_y_edge = origin.y == target.min.y || origin.y == target.max.y;
    if (direction.x == 0.0 && on_x_edge) || (direction.y == 0.0 && on_y_edge) {
        return None;
    }

    // near.x / far.x: crossing times of the vertical edges,
    // near.y / far.y: crossing times of the horizontal edges.
    let mut near = (target.min - origin) / direction;
    let mut far = (target.max - origin) / direction;

    if near.x > far.x {
        std::mem::swap(&mut near.x, &mut far.x);
    }
    if near.y > far.y {
        std::mem::swap(&mut near.y, &mut far.y);
    }

    // Both edges of one axis were crossed before any edge of the other.
    if far.y < near.x || far.x < near.y {
        return None;
    }

    let normal = if near.x > near.y {
        if direction.x > 0.0 {
            Vec2::new(-1.0, 0.0)
        } else {
            Vec2::new(1.0, 0.0)
        }
    } else if direction.y > 0.0 {
        Vec2::new(0.0, -1.0)
    } else {
        Vec2::new(0.0, 1.0)
    };

    Some(Sweep {
        near: near.x.max(near.y),
        far: far.x.min(far.y),
        normal,
    })
}

/// Sweep box `mover` (moving at `mover_velocity`) against `target`
/// (moving at `target_velocity`)
pub fn sweep_box(
    mover: &Box2,
    mover_velocity: Vec2,
    target: &Box2,
    target_velocity: Vec2,
) -> Option<Sweep> {
    let fat = target.expand(mover.size() * 0.5);
    ray_vs_box(mover.center(), mover_velocity - target_velocity, &fat)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_box() -> Box2 {
        Box2::new(Vec2::new(1.0, -0.5), Vec2::new(2.0, 0.5))
    }

    #[test]
    fn test_ray_hits_left_face() {
        let hit = ray_vs_box(Vec2::ZERO, Vec2::new(1.0, 0.0), &unit_box()).unwrap();
        assert_eq!(hit.near, 1.0);
        assert_eq!(hit.far, 2.0);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_ray_hits_from_the_right() {
        let hit = ray_vs_box(Vec2::new(4.0, 0.0), Vec2::new(-2.0, 0.0), &unit_box()).unwrap();
        assert_eq!(hit.near, 1.0);
        assert_eq!(hit.normal, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_ray_hits_top_and_bottom_faces() {
        let target = Box2::new(Vec2::new(-1.0, 1.0), Vec2::new(1.0, 2.0));
        let down = ray_vs_box(Vec2::ZERO, Vec2::new(0.0, 0.5), &target).unwrap();
        assert_eq!(down.near, 2.0);
        assert_eq!(down.normal, Vec2::new(0.0, -1.0));

        let up = ray_vs_box(Vec2::new(0.0, 3.0), Vec2::new(0.0, -1.0), &target).unwrap();
        assert_eq!(up.near, 1.0);
        assert_eq!(up.normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_ray_misses() {
        assert!(ray_vs_box(Vec2::new(0.0, 2.0), Vec2::new(1.0, 0.0), &unit_box()).is_none());
        // Diagonal ray passing above the corner
        assert!(ray_vs_box(Vec2::new(0.0, -1.0), Vec2::new(1.0, -1.0), &unit_box()).is_none());
    }

    #[test]
    fn test_parallel_ray_on_edge_is_rejected() {
        // Sliding exactly along the top edge
        let along_top = ray_vs_box(Vec2::new(0.0, -0.5), Vec2::new(1.0, 0.0), &unit_box());
        assert!(along_top.is_none());
        // Sliding exactly along the right edge
        let along_right = ray_vs_box(Vec2::new(2.0, -3.0), Vec2::new(0.0, 1.0), &unit_box());
        assert!(along_right.is_none());
    }

    #[test]
    fn test_ray_moving_away_has_negative_near() {
        let hit = ray_vs_box(Vec2::ZERO, Vec2::new(-1.0, 0.0), &unit_box()).unwrap();
        assert!(hit.near < 0.0);
    }

    #[test]
    fn test_corner_tie_picks_vertical_normal() {
        let target = Box2::new(Vec2::ONE, Vec2::splat(2.0));
        let hit = ray_vs_box(Vec2::ZERO, Vec2::ONE, &target).unwrap();
        assert_eq!(hit.near, 1.0);
        assert_eq!(hit.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_sweep_box_uses_fattened_target() {
        let mover = Box2::from_center_size(Vec2::new(0.5, 0.5), Vec2::splat(0.1));
        let wall = Box2::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let hit = sweep_box(&mover, Vec2::new(1.0, 0.0), &wall, Vec2::ZERO).unwrap();
        assert!((hit.near - 0.45).abs() < 1e-6);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vec2::new(1.0, 0.5), Vec2::new(-1.0, 0.0));
        assert_eq!(reflected, Vec2::new(-1.0, 0.5));
    }

    proptest! {
        #[test]
        fn prop_ray_vs_box_is_pure(
            ox in -10.0f32..10.0, oy in -10.0f32..10.0,
            dx in -5.0f32..5.0, dy in -5.0f32..5.0,
            bx in -5.0f32..5.0, by in -5.0f32..5.0,
            w in 0.01f32..4.0, h in 0.01f32..4.0,
        ) {
            let origin = Vec2::new(ox, oy);
            let direction = Vec2::new(dx, dy);
            let target = Box2::new(Vec2::new(bx, by), Vec2::new(bx + w, by + h));
            let first = ray_vs_box(origin, direction, &target);
            let second = ray_vs_box(origin, direction, &target);
            prop_assert_eq!(first, second);
            if let Some(hit) = first {
                prop_assert!(hit.near <= hit.far);
                prop_assert_eq!(hit.normal.length(), 1.0);
                // Normal always opposes the motion on its axis
                prop_assert!(hit.normal.dot(direction) <= 0.0);
            }
        }
    }
}
