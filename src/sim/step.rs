//! Per-frame collision/resolution loop
//!
//! A frame's time budget is consumed in substeps. Each substep finds the
//! earliest time of impact between any mover and any other live entity,
//! advances everything up to that moment and resolves that one contact.
//! Nothing ever moves past a contact, so fast boxes cannot tunnel.

use glam::Vec2;

use super::entity::{Entity, Side};
use super::layout::Field;
use super::sweep::{reflect_velocity, sweep_box};
use crate::consts::*;

/// Sweep penetration (in seconds) still treated as touching
///
/// Moving exactly onto a contact can land a center one ulp inside the other
/// box; the ray then starts inside and reports a tiny negative entry time.
const CONTACT_SLOP: f32 = 1e-5;

/// What happened during one call to [`step`]
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub substeps: u32,
    pub collisions: u32,
    /// Sum of every substep's advance; equals the frame time unless the
    /// substep cap was hit
    pub time_simulated: f64,
    /// Indices of entities destroyed this frame, in order
    pub destroyed: Vec<usize>,
    pub hit_substep_cap: bool,
}

/// Earliest contact of one mover
#[derive(Debug, Clone, Copy)]
struct Contact {
    mover: usize,
    other: usize,
    /// Normal of `other`'s surface, pointing toward `mover`
    normal: Vec2,
    time: f32,
}

/// Advance the field by `dt` seconds
pub fn step(field: &mut Field, dt: f64) -> StepReport {
    let entities = &mut field.entities;
    let mut report = StepReport::default();
    // Substeps in a row without progress, per entity, for this frame only
    let mut stalls = vec![0u32; entities.len()];
    // Entities held in place for the current substep
    let mut held = vec![false; entities.len()];

    let mut time_left = dt;
    while time_left > 0.0 {
        if report.substeps >= MAX_SUBSTEPS_PER_FRAME {
            log::warn!("Substep cap hit, dropping {time_left:.6}s of simulation time");
            report.hit_substep_cap = true;
            break;
        }
        report.substeps += 1;

        for (held, &stall) in held.iter_mut().zip(&stalls) {
            *held = stall >= STUCK_LIMIT;
        }

        let contact = closest_contact(entities, &held, &mut stalls);
        let closest_time = contact.map_or(f64::INFINITY, |c| c.time as f64);
        let time_passed = closest_time.min(time_left);

        // Positions first; held entities stay where they are.
        for (entity, &held) in entities.iter_mut().zip(&held) {
            if held || !entity.is_mover() {
                continue;
            }
            entity.center += entity.velocity * time_passed as f32;
        }

        // Then velocities.
        if let Some(contact) = contact {
            if closest_time <= time_left {
                resolve(entities, &contact, &mut report);
                report.collisions += 1;
            }
        }

        time_left -= time_passed;
        report.time_simulated += time_passed;
    }

    report
}

/// Velocity an entity actually moves with this substep
#[inline]
fn moving_velocity(entity: &Entity, held: bool) -> Vec2 {
    if held { Vec2::ZERO } else { entity.velocity }
}

/// Earliest contact over all free movers, updating the stall counters
///
/// Held entities do not move this substep, so everything else sweeps
/// against them as if they were at rest.
fn closest_contact(entities: &[Entity], held: &[bool], stalls: &mut [u32]) -> Option<Contact> {
    let mut closest: Option<Contact> = None;

    for (this, entity) in entities.iter().enumerate() {
        if !entity.is_mover() {
            continue;
        }

        let earliest = earliest_contact(entities, held, this);
        let time = earliest.map_or(f32::INFINITY, |c| c.time);

        if held[this] {
            // Room to move again: released from the next substep on
            if time >= TIME_EPSILON {
                stalls[this] = 0;
            }
            continue;
        }

        if time < TIME_EPSILON {
            stalls[this] += 1;
        } else {
            stalls[this] = 0;
        }

        if let Some(contact) = earliest {
            if closest.is_none_or(|best| contact.time < best.time) {
                closest = Some(contact);
            }
        }
    }

    closest
}

/// Earliest contact of entity `this` moving at its own velocity
fn earliest_contact(entities: &[Entity], held: &[bool], this: usize) -> Option<Contact> {
    let entity = &entities[this];
    let bounds = entity.bounds();
    let mut earliest: Option<Contact> = None;

    for (other, target) in entities.iter().enumerate() {
        if other == this || !target.is_active() {
            continue;
        }

        let target_velocity = moving_velocity(target, held[other]);
        let Some(hit) = sweep_box(&bounds, entity.velocity, &target.bounds(), target_velocity)
        else {
            continue;
        };
        if hit.near < -CONTACT_SLOP {
            continue;
        }

        let time = hit.near.max(0.0);
        if earliest.is_none_or(|c| time < c.time) {
            earliest = Some(Contact {
                mover: this,
                other,
                normal: hit.normal,
                time,
            });
        }
    }

    earliest
}

/// Bounce the pair apart and apply damage
fn resolve(entities: &mut [Entity], contact: &Contact, report: &mut StepReport) {
    let (mover, other) = pair_mut(entities, contact.mover, contact.other);
    let normal = contact.normal;

    if other.dynamic {
        let (mover_velocity, other_velocity) =
            elastic_exchange(mover.velocity, other.velocity, normal);
        mover.velocity = mover_velocity;
        other.velocity = other_velocity;
    } else {
        mover.velocity = reflect_velocity(mover.velocity, normal);
    }

    // The normal faces out of the side of `other` that was hit; the mover
    // touched it with its opposite side.
    let other_side = Side::from_normal(normal);
    let mover_side = other_side.opposite();
    let mover_hits_hard = mover.damaging.get(mover_side);
    let other_hits_hard = other.damaging.get(other_side);

    if mover_hits_hard && other.take_damage() {
        log::debug!("Entity {} destroyed at {:?}", contact.other, other.center);
        report.destroyed.push(contact.other);
    }
    if other_hits_hard && mover.take_damage() {
        log::debug!("Entity {} destroyed at {:?}", contact.mover, mover.center);
        report.destroyed.push(contact.mover);
    }
}

/// Swap the normal components of two velocities, keep the tangential ones,
/// then restore each body's original speed
pub fn elastic_exchange(a: Vec2, b: Vec2, normal: Vec2) -> (Vec2, Vec2) {
    let a_normal = a.dot(normal);
    let b_normal = b.dot(normal);
    let a_tangent = a - a_normal * normal;
    let b_tangent = b - b_normal * normal;

    (
        with_speed_of(a_tangent + b_normal * normal, a, normal),
        with_speed_of(b_tangent + a_normal * normal, b, normal),
    )
}

/// Rescale `velocity` to the speed of `original`
///
/// An exactly zero exchange result cannot be rescaled; the original velocity
/// is reflected instead so the body keeps its speed.
fn with_speed_of(velocity: Vec2, original: Vec2, normal: Vec2) -> Vec2 {
    let length = velocity.length();
    if length > 0.0 {
        velocity * (original.length() / length)
    } else {
        reflect_velocity(original, normal)
    }
}

fn pair_mut(entities: &mut [Entity], a: usize, b: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = entities.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = entities.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
