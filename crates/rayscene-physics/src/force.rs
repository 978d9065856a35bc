//! External forces.

use crate::Particle;
use rayscene_math::Vec3;
use std::fmt;

/// Callback computing the external force on one particle.
pub type ForceFn = dyn Fn(&Particle) -> Vec3 + Send + Sync;

/// External force applied to every particle at every sub-step.
#[derive(Default)]
pub enum ForceField {
    /// No external force.
    #[default]
    None,
    /// Gravity scaled by mass plus drag toward the wind velocity.
    Uniform {
        /// Gravitational acceleration.
        gravity: Vec3,
        /// Velocity of the surrounding air.
        wind: Vec3,
        /// Drag coefficient.
        air_friction: f64,
    },
    /// Arbitrary per-particle force.
    Callback(Box<ForceFn>),
}

impl ForceField {
    /// Force on `p`.
    pub fn eval(&self, p: &Particle) -> Vec3 {
        match self {
            ForceField::None => Vec3::zeros(),
            ForceField::Uniform {
                gravity,
                wind,
                air_friction,
            } => (wind - p.vel) * *air_friction + gravity * p.mass,
            ForceField::Callback(f) => f(p),
        }
    }
}

impl fmt::Debug for ForceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForceField::None => f.write_str("None"),
            ForceField::Uniform {
                gravity,
                wind,
                air_friction,
            } => f
                .debug_struct("Uniform")
                .field("gravity", gravity)
                .field("wind", wind)
                .field("air_friction", air_friction)
                .finish(),
            ForceField::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_field() {
        let field = ForceField::Uniform {
            gravity: Vec3::new(0.0, 0.0, -10.0),
            wind: Vec3::new(4.0, 0.0, 0.0),
            air_friction: 0.5,
        };
        let mut p = Particle {
            mass: 2.0,
            ..Default::default()
        };
        p.vel = Vec3::new(2.0, 0.0, 0.0);
        assert_relative_eq!(field.eval(&p), Vec3::new(1.0, 0.0, -20.0));
    }

    #[test]
    fn test_callback_field() {
        let field = ForceField::Callback(Box::new(|p: &Particle| -p.pos.coords));
        let p = Particle::new(rayscene_math::Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(field.eval(&p), Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(format!("{field:?}"), "Callback(..)");
    }
}
