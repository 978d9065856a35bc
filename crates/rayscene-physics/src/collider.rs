//! Collision objects.

use crate::Particle;
use rayscene_math::{Point3, Vec3};
use std::fmt::Debug;

/// Point where a particle's motion crosses a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact position.
    pub pos: Point3,
    /// Collider normal at the contact, facing the incoming particle.
    pub norm: Vec3,
}

/// Obstacle particles bounce off.
pub trait ParticleCollider: Debug {
    /// First contact along the segment from `from` to `to`, if any.
    fn contact(&self, from: &Point3, to: &Point3) -> Option<Contact>;
}

/// Place `p` just off the contact and drop the velocity into the collider.
///
/// The tangential velocity is scaled by `1 - damping`.
pub(crate) fn resolve_contact(p: &mut Particle, contact: &Contact, damping: f64) {
    let n = if contact.norm.dot(&p.vel) > 0.0 {
        -contact.norm
    } else {
        contact.norm
    };
    p.pos = contact.pos + n * p.radius;
    let normal_vel = n * n.dot(&p.vel);
    p.vel = (p.vel - normal_vel) * (1.0 - damping);
}
