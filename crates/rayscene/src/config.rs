//! Simulation parameters and their TOML form.
//!
//! Every field is optional in TOML and falls back to its default:
//!
//! ```toml
//! [simulation]
//! gravity = [0.0, 0.0, -9.81]
//! steps_per_sec = 500
//!
//! [particles]
//! particles_per_sec = [10, 20]
//! seed = 7
//!
//! [cloth]
//! grid = [4, 4]
//! pinned = [0, 4]
//! ```

use crate::SceneError;
use rayscene_math::Vec3;
use serde::{Deserialize, Serialize};

/// Parameters shared by every simulated surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Gravitational acceleration.
    pub gravity: Vec3,
    /// Wind velocity.
    pub wind: Vec3,
    /// Drag toward the wind velocity.
    pub air_friction: f64,
    /// Fraction of tangential velocity lost when a particle hits a collider.
    pub damping: f64,
    /// Integration sub-steps per simulated second.
    pub steps_per_sec: u32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, 0.0, -9.81),
            wind: Vec3::new(100.0, 0.0, 0.0),
            air_friction: 0.1,
            damping: 0.5,
            steps_per_sec: 1000,
        }
    }
}

/// Emission parameters of a particle system. Ranges are `[min, max]`,
/// inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSystemParams {
    /// Particles emitted per second.
    pub particles_per_sec: [u32; 2],
    /// Lifetime of a new particle, in seconds.
    pub init_timer: [f64; 2],
    /// Speed of a new particle along the source normal.
    pub init_speed: [f64; 2],
    /// Radius of a new particle.
    pub init_radius: [f64; 2],
    /// Seed of the emission random number generator.
    pub seed: u64,
}

impl Default for ParticleSystemParams {
    fn default() -> Self {
        Self {
            particles_per_sec: [50, 150],
            init_timer: [1.0, 2.0],
            init_speed: [0.1, 0.2],
            init_radius: [0.01, 0.02],
            seed: 0,
        }
    }
}

/// Parameters of a rectangular cloth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothParams {
    /// Cells along x and y.
    pub grid: [usize; 2],
    /// Extent along x and y.
    pub size: [f64; 2],
    /// Stiffness of the springs along grid edges.
    pub stretch: f64,
    /// Stiffness of the springs along cell diagonals.
    pub shear: f64,
    /// Stiffness of the springs skipping one vertex.
    pub bend: f64,
    /// Damping of every spring.
    pub spring_damping: f64,
    /// Mass per unit area.
    pub density: f64,
    /// Vertices that never move.
    pub pinned: Vec<usize>,
}

impl Default for ClothParams {
    fn default() -> Self {
        Self {
            grid: [10, 10],
            size: [2.0, 2.0],
            stretch: 1e6,
            shear: 1e6,
            bend: 1e6,
            spring_damping: 5.0,
            density: 1.0,
            pinned: Vec::new(),
        }
    }
}

/// All simulation configuration, as read from one TOML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Shared simulation parameters.
    pub simulation: SimulationParams,
    /// Particle system emission.
    pub particles: ParticleSystemParams,
    /// Cloth setup.
    pub cloth: ClothParams,
}

impl SimulationConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.simulation.steps_per_sec, 1000);
        assert_eq!(config.cloth.grid, [10, 10]);
    }

    #[test]
    fn test_partial_sections() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [simulation]
            gravity = [0.0, -1.0, 0.0]
            steps_per_sec = 250

            [particles]
            particles_per_sec = [5, 5]
            seed = 42

            [cloth]
            grid = [3, 2]
            pinned = [0, 3]
            "#,
        )
        .unwrap();
        assert_eq!(config.simulation.gravity, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(config.simulation.steps_per_sec, 250);
        assert_eq!(config.simulation.air_friction, 0.1);
        assert_eq!(config.particles.particles_per_sec, [5, 5]);
        assert_eq!(config.particles.seed, 42);
        assert_eq!(config.particles.init_timer, [1.0, 2.0]);
        assert_eq!(config.cloth.grid, [3, 2]);
        assert_eq!(config.cloth.pinned, vec![0, 3]);
        assert_eq!(config.cloth.bend, 1e6);
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let err = SimulationConfig::from_toml_str("[simulation]\nsteps_per_sec = \"fast\"").unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = SimulationConfig::default();
        config.cloth.pinned = vec![1, 2];
        let text = config.to_toml_string().unwrap();
        assert_eq!(SimulationConfig::from_toml_str(&text).unwrap(), config);
    }
}
