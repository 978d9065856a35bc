//! Particles and springs.

use rayscene_math::{Point3, Vec3};

/// Radius of a particle that was not given one.
const DEFAULT_PARTICLE_RADIUS: f64 = 0.01;

/// Simulated point mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position.
    pub pos: Point3,
    /// Normal, used when the particle is drawn as an oriented disk.
    pub norm: Vec3,
    /// Velocity.
    pub vel: Vec3,
    /// Mass.
    pub mass: f64,
    /// Radius.
    pub radius: f64,
    /// Remaining lifetime; the owning system removes particles at or below
    /// zero.
    pub timer: f64,
    /// Pinned particles are never integrated.
    pub pinned: bool,
    /// Whether the particle is an oriented disk rather than a sphere.
    pub oriented: bool,
    /// Force accumulated during the current sub-step.
    pub force: Vec3,
}

impl Particle {
    /// Unit-mass particle at rest at `pos`.
    pub fn new(pos: Point3) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Point3::origin(),
            norm: Vec3::zeros(),
            vel: Vec3::zeros(),
            mass: 1.0,
            radius: DEFAULT_PARTICLE_RADIUS,
            timer: 0.0,
            pinned: false,
            oriented: false,
            force: Vec3::zeros(),
        }
    }
}

/// Damped spring between particles `i` and `j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpring {
    /// First particle.
    pub i: usize,
    /// Second particle.
    pub j: usize,
    /// Stiffness.
    pub ks: f64,
    /// Damping along the spring axis.
    pub kd: f64,
    /// Rest length.
    pub rest_length: f64,
}

impl ParticleSpring {
    /// Spring whose rest length is the current distance between its
    /// endpoints.
    pub fn at_rest(particles: &[Particle], i: usize, j: usize, ks: f64, kd: f64) -> Self {
        Self {
            i,
            j,
            ks,
            kd,
            rest_length: (particles[i].pos - particles[j].pos).norm(),
        }
    }

    /// Force on particle `i`; particle `j` receives the opposite.
    ///
    /// Returns `None` when the endpoints coincide and the axis is undefined.
    pub fn force(&self, particles: &[Particle]) -> Option<Vec3> {
        let (pi, pj) = (&particles[self.i], &particles[self.j]);
        let d = pi.pos - pj.pos;
        let l = d.norm();
        if l < f64::EPSILON {
            return None;
        }
        let e = d / l;
        let relative_speed = e.dot(&pi.vel) - e.dot(&pj.vel);
        Some(e * (-self.ks * (l - self.rest_length) - self.kd * relative_speed))
    }
}
