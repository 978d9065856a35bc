//! Error types for simulation setup.

use thiserror::Error;

/// Errors raised while building a simulator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// A spring references a particle that does not exist.
    #[error("spring endpoint {particle} out of range ({count} particles)")]
    SpringEndpoint {
        /// Offending particle index.
        particle: usize,
        /// Number of particles in the simulator.
        count: usize,
    },

    /// A spring connects a particle to itself.
    #[error("spring connects particle {0} to itself")]
    SelfSpring(usize),
}
