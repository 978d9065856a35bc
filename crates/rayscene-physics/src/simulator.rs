//! Fixed-rate sub-stepping integrator.

use crate::collider::resolve_contact;
use crate::{Contact, ForceField, Particle, ParticleCollider, ParticleSpring, PhysicsError};
use rayscene_math::{Point3, Vec3};

/// Sub-steps per simulated second when none is configured.
const DEFAULT_STEPS_PER_SEC: u32 = 1000;

/// Callbacks around each update and sub-step.
///
/// Every method defaults to doing nothing.
pub trait SimulationHooks {
    /// Called once before the sub-steps of an update.
    fn begin_update(&mut self, _particles: &mut Vec<Particle>, _dt: f64) {}

    /// Called once after the sub-steps of an update.
    fn end_update(&mut self, _particles: &mut Vec<Particle>, _dt: f64) {}

    /// Called before each sub-step.
    fn begin_step(&mut self, _particles: &mut [Particle], _dt: f64) {}

    /// Called after each sub-step.
    fn end_step(&mut self, _particles: &mut [Particle], _dt: f64) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl SimulationHooks for NoHooks {}

/// Particles, springs and colliders advanced together.
#[derive(Debug)]
pub struct ParticleSimulator {
    /// Live particles.
    pub particles: Vec<Particle>,
    springs: Vec<ParticleSpring>,
    /// Obstacles tested after each particle moves.
    pub colliders: Vec<Box<dyn ParticleCollider>>,
    /// External force.
    pub force: ForceField,
    /// Sub-steps per simulated second.
    pub steps_per_sec: u32,
    /// Fraction of tangential velocity lost on contact.
    pub damping: f64,
}

impl ParticleSimulator {
    /// Empty simulator driven by `force`.
    pub fn new(force: ForceField) -> Self {
        Self {
            particles: Vec::new(),
            springs: Vec::new(),
            colliders: Vec::new(),
            force,
            steps_per_sec: DEFAULT_STEPS_PER_SEC,
            damping: 0.0,
        }
    }

    /// Springs, in insertion order.
    pub fn springs(&self) -> &[ParticleSpring] {
        &self.springs
    }

    /// Add a spring between two existing, distinct particles.
    pub fn add_spring(&mut self, spring: ParticleSpring) -> Result<(), PhysicsError> {
        let count = self.particles.len();
        if let Some(particle) = [spring.i, spring.j].into_iter().find(|&p| p >= count) {
            return Err(PhysicsError::SpringEndpoint { particle, count });
        }
        if spring.i == spring.j {
            return Err(PhysicsError::SelfSpring(spring.i));
        }
        self.springs.push(spring);
        Ok(())
    }

    /// Advance by `dt` seconds in `round(steps_per_sec * dt)` equal
    /// sub-steps.
    ///
    /// When that rounds to zero or less only the update hooks run.
    pub fn update(&mut self, dt: f64, hooks: &mut impl SimulationHooks) {
        let steps = (f64::from(self.steps_per_sec) * dt).round() as i64;
        hooks.begin_update(&mut self.particles, dt);
        if steps <= 0 {
            log::warn!("update of {dt}s is shorter than one sub-step; only hooks run");
        } else {
            let ddt = dt / steps as f64;
            log::trace!("{steps} sub-steps of {ddt}s over {} particles", self.particles.len());
            for _ in 0..steps {
                hooks.begin_step(&mut self.particles, ddt);
                self.update_step(ddt);
                hooks.end_step(&mut self.particles, ddt);
            }
        }
        hooks.end_update(&mut self.particles, dt);
    }

    /// One sub-step of `dt` seconds.
    ///
    /// Spring forces are fully accumulated before any particle moves.
    /// Pinned particles keep their position but their timers still run.
    pub fn update_step(&mut self, dt: f64) {
        for p in &mut self.particles {
            p.force = Vec3::zeros();
        }

        for spring in &self.springs {
            if let Some(f) = spring.force(&self.particles) {
                self.particles[spring.i].force += f;
                self.particles[spring.j].force -= f;
            }
        }

        for p in &mut self.particles {
            let external = self.force.eval(p);
            p.force += external;
            if !p.pinned {
                let from = p.pos;
                let a = p.force / p.mass;
                p.vel += a * dt;
                p.pos += p.vel * dt + a * (dt * dt / 2.0);
                if let Some(contact) = first_contact(&self.colliders, &from, p) {
                    resolve_contact(p, &contact, self.damping);
                }
            }
            p.timer -= dt;
        }
    }
}

fn first_contact(colliders: &[Box<dyn ParticleCollider>], from: &Point3, p: &Particle) -> Option<Contact> {
    colliders
        .iter()
        .filter_map(|c| c.contact(from, &p.pos))
        .min_by(|a, b| (a.pos - from).norm_squared().total_cmp(&(b.pos - from).norm_squared()))
}
