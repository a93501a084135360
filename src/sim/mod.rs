//! Simulation module
//!
//! All gameplay logic lives here:
//! - Field units only (field height is 1.0, +y is down)
//! - Seeded RNG only, passed in by the caller
//! - Stable iteration order (by entity index)
//! - No rendering or platform dependencies

pub mod entity;
pub mod geometry;
pub mod layout;
pub mod particles;
pub mod step;
pub mod sweep;

pub use entity::{DamagingSides, Entity, Side};
pub use geometry::Box2;
pub use layout::Field;
pub use particles::{Particle, ParticlePool, ease_out_quadratic};
pub use step::{StepReport, elastic_exchange, step};
pub use sweep::{Sweep, ray_vs_box, reflect_velocity, sweep_box};
