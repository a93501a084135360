//! Bounce Field - bouncing, shrinking rectangles in a software framebuffer
//!
//! Core modules:
//! - `sim`: Simulation (swept collisions, layout, particles)
//! - `renderer`: Software rasterizer writing into a borrowed ARGB bitmap
//! - `platform`: Window-layer abstraction the frame driver talks to
//! - `game`: Frame driver tying the above together
//! - `settings`: JSON-configurable run settings

pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Field width divided by field height (field height is always 1.0)
    pub const FIELD_ASPECT_RATIO: f32 = 4.0 / 3.0;
    /// Pixels kept free around the field on every side
    pub const FIELD_MARGIN: f32 = 48.0;

    /// Colors, packed as 0xAARRGGBB
    pub const BACKGROUND_COLOR: u32 = 0xff19_2739;
    pub const ACTIVE_COLOR: u32 = 0xffff_ec62;
    pub const SECONDARY_COLOR: u32 = 0xff90_8f88;
    pub const DISABLED_COLOR: u32 = 0xff45_454c;
    pub const DAMAGING_COLOR: u32 = 0xffe8_505b;
    pub const SHADOW_COLOR: u32 = 0xff00_0000;

    /// Four static walls always occupy the first slots of the entity array
    pub const BOUNDARY_COUNT: usize = 4;
    /// Default entity slots, walls included
    pub const DEFAULT_ENTITY_CAPACITY: usize = 12;

    /// Layout: smallest generated box edge (field units)
    pub const MIN_LAYOUT_SIZE: f32 = 0.05;
    /// Layout: height / width range for generated boxes
    pub const MIN_ASPECT_RATIO: f32 = 0.75;
    pub const MAX_ASPECT_RATIO: f32 = 1.25;
    /// Layout: probability of each side being a damaging side
    pub const DAMAGING_SIDE_CHANCE: f64 = 0.25;
    /// Default speed of generated entities (field units per second)
    pub const ENTITY_SPEED: f32 = 0.5;

    /// Width lost per damaging hit; height shrinks proportionally
    pub const SHRINK_STEP: f32 = 0.01;
    /// Entities narrower than this are destroyed
    pub const MIN_ENTITY_SIZE: f32 = 0.02;
    /// Rate of the exponential approach of `render_size` toward `size` (1/s)
    pub const RENDER_EASE_RATE: f32 = 12.0;

    /// Collision times below this count as "no progress"
    pub const TIME_EPSILON: f32 = 1e-6;
    /// Substeps without progress before an entity is frozen for the frame
    pub const STUCK_LIMIT: u32 = 4;
    /// Hard cap on substeps in one frame; leftover time is dropped
    pub const MAX_SUBSTEPS_PER_FRAME: u32 = 10_000;

    /// Particle pool
    pub const PARTICLE_CAPACITY: usize = 128;
    /// Explosion particle count range (max exclusive)
    pub const EXPLOSION_MIN_PARTICLES: u32 = 20;
    pub const EXPLOSION_MAX_PARTICLES: u32 = 40;
    pub const PARTICLE_MIN_SPEED: f32 = 0.15;
    pub const PARTICLE_MAX_SPEED: f32 = 0.6;
    pub const PARTICLE_MIN_SIZE: f32 = 0.003;
    pub const PARTICLE_MAX_SIZE: f32 = 0.010;
    pub const PARTICLE_MIN_LIFETIME: f32 = 0.4;
    pub const PARTICLE_MAX_LIFETIME: f32 = 1.2;
    /// Downward acceleration applied to particles (field units/s², +y is down)
    pub const PARTICLE_GRAVITY: f32 = 1.5;
}

/// Alpha byte of a packed 0xAARRGGBB color
#[inline]
pub fn alpha_of(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Replace the alpha byte of a packed 0xAARRGGBB color
#[inline]
pub fn with_alpha(color: u32, alpha: u8) -> u32 {
    (color & 0x00ff_ffff) | (alpha as u32) << 24
}

/// Pack 8-bit channels into 0xAARRGGBB
#[inline]
pub fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}
