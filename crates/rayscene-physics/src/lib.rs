#![warn(missing_docs)]

//! Particle simulation for the rayscene kernel.
//!
//! An explicit integrator over particles connected by damped springs,
//! advanced in fixed-size sub-steps. Particle systems and cloth are both
//! built on the same [`ParticleSimulator`]; what differs is the external
//! [`ForceField`] and the [`SimulationHooks`] called around each update and
//! sub-step.
//!
//! # Example
//!
//! ```
//! use rayscene_math::{Point3, Vec3};
//! use rayscene_physics::{ForceField, NoHooks, Particle, ParticleSimulator};
//!
//! let mut sim = ParticleSimulator::new(ForceField::Uniform {
//!     gravity: Vec3::new(0.0, 0.0, -9.8),
//!     wind: Vec3::zeros(),
//!     air_friction: 0.0,
//! });
//! sim.particles.push(Particle::new(Point3::origin()));
//! sim.update(0.5, &mut NoHooks);
//! assert!(sim.particles[0].pos.z < 0.0);
//! ```

mod collider;
mod error;
mod force;
mod particle;
mod simulator;

pub use collider::{Contact, ParticleCollider};
pub use error::PhysicsError;
pub use force::ForceField;
pub use particle::{Particle, ParticleSpring};
pub use simulator::{NoHooks, ParticleSimulator, SimulationHooks};
