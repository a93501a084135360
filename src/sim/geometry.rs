//! Axis-aligned boxes
//!
//! Screen convention: +x right, +y down, `min` is the top-left corner.

use glam::Vec2;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Box2 {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Half-open containment: min edges inside, max edges outside
    pub fn contains(&self, point: Vec2) -> bool {
        self.min.x <= point.x
            && point.x < self.max.x
            && self.min.y <= point.y
            && point.y < self.max.y
    }

    /// Grow by `half_extent` on every side
    pub fn expand(&self, half_extent: Vec2) -> Box2 {
        Box2 {
            min: self.min - half_extent,
            max: self.max + half_extent,
        }
    }

    /// Scale both corners (field units to pixels)
    pub fn scale(&self, factor: f32) -> Box2 {
        Box2 {
            min: self.min * factor,
            max: self.max * factor,
        }
    }

    /// Depth of overlap on the shallower axis, 0 when disjoint
    pub fn overlap_depth(&self, other: &Box2) -> f32 {
        let x = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let y = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        x.min(y).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_contact_has_no_depth() {
        let a = Box2::new(Vec2::ZERO, Vec2::ONE);
        let b = Box2::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        assert_eq!(a.overlap_depth(&b), 0.0);

        let c = Box2::new(Vec2::splat(0.5), Vec2::splat(1.5));
        assert!((a.overlap_depth(&c) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_contains_is_half_open() {
        let a = Box2::new(Vec2::ZERO, Vec2::ONE);
        assert!(a.contains(Vec2::ZERO));
        assert!(!a.contains(Vec2::new(1.0, 0.5)));
        assert!(!a.contains(Vec2::new(0.5, 1.0)));
    }

    #[test]
    fn test_expand_and_scale() {
        let pixels = Box2::new(Vec2::splat(0.25), Vec2::ONE).scale(100.0);
        assert_eq!(pixels, Box2::new(Vec2::splat(25.0), Vec2::splat(100.0)));

        let fat = Box2::from_center_size(Vec2::ZERO, Vec2::ONE).expand(Vec2::splat(0.25));
        assert_eq!(fat.size(), Vec2::splat(1.5));
        assert_eq!(fat.center(), Vec2::ZERO);
    }
}
