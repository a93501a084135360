//! Fixed-capacity particle pool
//!
//! Slots live in one array. Each slot is on exactly one of two singly-linked
//! lists threaded through the slots by index: the free list or the active
//! list. Allocation and release are O(1) and nothing is ever reallocated.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::with_alpha;

/// A particle for visual effects
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radius in field units
    pub size: f32,
    /// 0xAARRGGBB; alpha fades out over the lifetime
    pub color: u32,
    /// Seconds since spawn
    pub time: f32,
    pub lifetime: f32,
    next: Option<usize>,
}

/// `1 - (1 - t)²`: fast start, gentle finish
#[inline]
pub fn ease_out_quadratic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    free_head: Option<usize>,
    active_head: Option<usize>,
    active_count: usize,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(PARTICLE_CAPACITY)
    }
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|i| Particle {
                next: (i + 1 < capacity).then_some(i + 1),
                ..Default::default()
            })
            .collect();

        Self {
            slots,
            free_head: (capacity > 0).then_some(0),
            active_head: None,
            active_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn free_count(&self) -> usize {
        self.slots.len() - self.active_count
    }

    /// Take a slot from the free list and push it on the active list
    fn allocate(&mut self) -> Option<&mut Particle> {
        let index = self.free_head?;
        self.free_head = self.slots[index].next;

        self.slots[index].next = self.active_head;
        self.active_head = Some(index);
        self.active_count += 1;

        Some(&mut self.slots[index])
    }

    /// Burst of 20-39 particles flying out of `position`
    ///
    /// Stops early without complaint when the pool runs dry. Returns the
    /// number of particles actually spawned.
    pub fn spawn_explosion<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        color: u32,
        rng: &mut R,
    ) -> usize {
        let requested = rng.random_range(EXPLOSION_MIN_PARTICLES..EXPLOSION_MAX_PARTICLES);

        let mut spawned = 0;
        for _ in 0..requested {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
            let size = rng.random_range(PARTICLE_MIN_SIZE..PARTICLE_MAX_SIZE);
            let lifetime = rng.random_range(PARTICLE_MIN_LIFETIME..PARTICLE_MAX_LIFETIME);

            let Some(particle) = self.allocate() else {
                break;
            };
            *particle = Particle {
                position,
                velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                size,
                color: with_alpha(color, 0xff),
                time: 0.0,
                lifetime,
                next: particle.next,
            };
            spawned += 1;
        }

        if spawned < requested as usize {
            log::debug!(
                "Particle pool exhausted: spawned {spawned} of {requested} particles"
            );
        }
        spawned
    }

    /// Integrate every live particle and release the expired ones
    pub fn advance(&mut self, dt: f32) {
        let mut prev: Option<usize> = None;
        let mut cursor = self.active_head;

        while let Some(index) = cursor {
            let particle = &mut self.slots[index];
            let next = particle.next;
            particle.time += dt;

            if particle.time >= particle.lifetime {
                match prev {
                    Some(p) => self.slots[p].next = next,
                    None => self.active_head = next,
                }
                self.slots[index].next = self.free_head;
                self.free_head = Some(index);
                self.active_count -= 1;
            } else {
                particle.position += particle.velocity * dt;
                particle.velocity.y += PARTICLE_GRAVITY * dt;

                let remaining = 1.0 - particle.time / particle.lifetime;
                let alpha = (ease_out_quadratic(remaining) * 255.0).round() as u8;
                particle.color = with_alpha(particle.color, alpha);

                prev = Some(index);
            }

            cursor = next;
        }
    }

    /// Live particles, most recently spawned first
    pub fn iter(&self) -> ActiveParticles<'_> {
        ActiveParticles {
            slots: &self.slots,
            cursor: self.active_head,
        }
    }
}

/// Iterator over the active list
pub struct ActiveParticles<'a> {
    slots: &'a [Particle],
    cursor: Option<usize>,
}

impl<'a> Iterator for ActiveParticles<'a> {
    type Item = &'a Particle;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let particle = &self.slots[index];
        self.cursor = particle.next;
        Some(particle)
    }
}
