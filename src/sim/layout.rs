//! The field and its procedural layout
//!
//! The field spans `[0, width) x [0, 1)` in field units. Four static walls sit
//! just outside it, each as large as the field itself so nothing can get
//! past them.

use glam::Vec2;
use rand::Rng;

use super::entity::{DamagingSides, Entity, Side};
use super::geometry::Box2;
use crate::consts::*;

/// Overlap still accepted as touching when placing an entity
const PLACEMENT_TOLERANCE: f32 = 1e-5;

/// All entities of one run
///
/// The first [`BOUNDARY_COUNT`] entries are the walls. Entities are never
/// removed; destroyed ones stay in place with `disabled` set.
#[derive(Debug, Clone)]
pub struct Field {
    pub size: Vec2,
    pub entities: Vec<Entity>,
    capacity: usize,
}

impl Field {
    /// Field of the given size with only its four walls
    pub fn with_size(size: Vec2, capacity: usize) -> Self {
        let capacity = capacity.max(BOUNDARY_COUNT);
        let mut entities = Vec::with_capacity(capacity);

        // left, right, top, bottom
        entities.push(Entity::boundary(Box2::new(
            Vec2::new(-size.x, 0.0),
            Vec2::new(0.0, size.y),
        )));
        entities.push(Entity::boundary(Box2::new(
            Vec2::new(size.x, 0.0),
            Vec2::new(2.0 * size.x, size.y),
        )));
        entities.push(Entity::boundary(Box2::new(
            Vec2::new(0.0, -size.y),
            Vec2::new(size.x, 0.0),
        )));
        entities.push(Entity::boundary(Box2::new(
            Vec2::new(0.0, size.y),
            Vec2::new(size.x, 2.0 * size.y),
        )));

        Self {
            size,
            entities,
            capacity,
        }
    }

    /// Walls plus up to `capacity - 4` randomly packed dynamic boxes
    pub fn generate<R: Rng + ?Sized>(
        aspect_ratio: f32,
        capacity: usize,
        speed: f32,
        rng: &mut R,
    ) -> Self {
        let mut field = Self::with_size(Vec2::new(aspect_ratio, 1.0), capacity);
        let attempts = field.fill_randomly(speed, rng);
        log::info!(
            "Generated layout: {} of {} dynamic entities after {} attempts",
            field.dynamic_count(),
            field.capacity - BOUNDARY_COUNT,
            attempts
        );
        field
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn bounds(&self) -> Box2 {
        Box2::new(Vec2::ZERO, self.size)
    }

    /// Add an entity if there is a free slot and it does not overlap a live
    /// entity (walls included)
    pub fn push(&mut self, entity: Entity) -> Option<usize> {
        if self.entities.len() >= self.capacity {
            return None;
        }
        let bounds = entity.bounds();
        if self
            .entities
            .iter()
            .any(|e| e.is_active() && e.bounds().overlap_depth(&bounds) > PLACEMENT_TOLERANCE)
        {
            log::debug!("Rejected overlapping entity at {:?}", entity.center);
            return None;
        }
        self.entities.push(entity);
        Some(self.entities.len() - 1)
    }

    pub fn dynamic_count(&self) -> usize {
        self.entities.iter().filter(|e| e.dynamic).count()
    }

    /// Dynamic entities still alive
    pub fn live_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.dynamic && !e.disabled)
            .count()
    }

    /// Best-effort packing of non-overlapping boxes
    ///
    /// Gives up after `4 * capacity` attempts, leaving slots unfilled.
    /// Returns the number of attempts used.
    pub fn fill_randomly<R: Rng + ?Sized>(&mut self, speed: f32, rng: &mut R) -> usize {
        let max_attempts = self.capacity * 4;
        let mut attempts = 0;

        while self.entities.len() < self.capacity && attempts < max_attempts {
            attempts += 1;
            if let Some(bounds) = self.try_place(rng) {
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;

                let mut damaging = DamagingSides::default();
                for side in Side::ALL {
                    damaging.set(side, rng.random_bool(DAMAGING_SIDE_CHANCE));
                }

                self.push(Entity::dynamic(bounds, velocity, damaging));
            }
        }

        attempts
    }

    /// One placement attempt: random free top-left corner, grown as far as the
    /// nearest obstacles allow
    fn try_place<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Box2> {
        let min = Vec2::new(
            rng.random::<f32>() * self.size.x,
            rng.random::<f32>() * self.size.y,
        );
        if self.entities.iter().any(|e| e.bounds().contains(min)) {
            return None;
        }

        // Anything starting right of (below) the corner limits the width
        // (height). This is conservative but never overlaps.
        let mut max = self.size;
        for entity in &self.entities {
            let other = entity.bounds();
            if min.x < other.min.x {
                max.x = max.x.min(other.min.x);
            }
            if min.y < other.min.y {
                max.y = max.y.min(other.min.y);
            }
        }

        let room = max - min;
        if room.x < MIN_LAYOUT_SIZE || room.y < MIN_LAYOUT_SIZE {
            return None;
        }

        let aspect_ratio = rng.random_range(MIN_ASPECT_RATIO..MAX_ASPECT_RATIO);
        let width = MIN_LAYOUT_SIZE + rng.random::<f32>() * room.x;
        let size = Vec2::new(width, width * aspect_ratio);

        let bounds = Box2::new(min, min + size);
        if bounds.max.x > max.x || bounds.max.y > max.y {
            return None;
        }
        Some(bounds)
    }
}
