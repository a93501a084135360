//! Rectangle entities
//!
//! Everything in the field is a rectangle: the four static walls and the
//! bouncing dynamic boxes.

use glam::Vec2;

use super::geometry::Box2;
use crate::consts::{MIN_ENTITY_SIZE, RENDER_EASE_RATE, SHRINK_STEP};

/// One edge of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// The side a surface with outward `normal` faces
    ///
    /// Normals are axis-aligned unit vectors as produced by the sweep.
    pub fn from_normal(normal: Vec2) -> Side {
        if normal.x < 0.0 {
            Side::Left
        } else if normal.x > 0.0 {
            Side::Right
        } else if normal.y < 0.0 {
            Side::Top
        } else {
            Side::Bottom
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

/// Which edges of an entity shrink whatever they hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamagingSides {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl DamagingSides {
    pub fn get(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn set(&mut self, side: Side, damaging: bool) {
        match side {
            Side::Top => self.top = damaging,
            Side::Right => self.right = damaging,
            Side::Bottom => self.bottom = damaging,
            Side::Left => self.left = damaging,
        }
    }
}

/// A rectangle in field units (field height is 1.0)
#[derive(Debug, Clone)]
pub struct Entity {
    pub center: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    /// Eased toward `size` every frame; drawing only
    pub render_size: Vec2,
    pub damaging: DamagingSides,
    /// Not drawn
    pub hidden: bool,
    /// Moves and collides; walls are not dynamic
    pub dynamic: bool,
    /// Destroyed: no collisions, no drawing, never re-enabled
    pub disabled: bool,
}

impl Entity {
    /// A static, invisible wall
    pub fn boundary(bounds: Box2) -> Self {
        Self {
            center: bounds.center(),
            size: bounds.size(),
            velocity: Vec2::ZERO,
            render_size: bounds.size(),
            damaging: DamagingSides::default(),
            hidden: true,
            dynamic: false,
            disabled: false,
        }
    }

    /// A visible, moving box
    pub fn dynamic(bounds: Box2, velocity: Vec2, damaging: DamagingSides) -> Self {
        Self {
            center: bounds.center(),
            size: bounds.size(),
            velocity,
            render_size: bounds.size(),
            damaging,
            hidden: false,
            dynamic: true,
            disabled: false,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Box2 {
        Box2::from_center_size(self.center, self.size)
    }

    /// Box used for drawing
    #[inline]
    pub fn render_bounds(&self) -> Box2 {
        Box2::from_center_size(self.center, self.render_size)
    }

    /// Takes part in collisions this frame
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.disabled
    }

    /// Can be the moving side of a collision
    #[inline]
    pub fn is_mover(&self) -> bool {
        self.dynamic && !self.disabled && self.velocity != Vec2::ZERO
    }

    /// Shrink by one damage step, keeping the aspect ratio
    ///
    /// Returns true if this hit destroyed the entity. Walls and destroyed
    /// entities are unaffected.
    pub fn take_damage(&mut self) -> bool {
        if !self.dynamic || self.disabled {
            return false;
        }

        let new_width = (self.size.x - SHRINK_STEP).max(0.0);
        self.size *= new_width / self.size.x;

        if new_width < MIN_ENTITY_SIZE {
            self.disable();
            return true;
        }
        false
    }

    /// Terminal state
    pub fn disable(&mut self) {
        self.disabled = true;
        self.hidden = true;
        self.velocity = Vec2::ZERO;
    }

    /// Move `render_size` toward `size` (frame-rate independent)
    pub fn ease_render_size(&mut self, dt: f32) {
        let t = 1.0 - (-RENDER_EASE_RATE * dt).exp();
        self.render_size += (self.size - self.render_size) * t;
    }
}
