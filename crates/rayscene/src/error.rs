//! Error types for scene construction and configuration.

use thiserror::Error;

/// Errors raised while building scene objects or reading configuration.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Cloth grid with no cells along an axis.
    #[error("cloth grid must have at least one cell per axis, got {0}x{1}")]
    EmptyClothGrid(usize, usize),

    /// Pinned cloth vertex that does not exist.
    #[error("pinned vertex {vertex} out of range ({count} vertices)")]
    PinnedVertex {
        /// Offending vertex index.
        vertex: usize,
        /// Number of cloth vertices.
        count: usize,
    },

    /// Interpolated surface with no shapes.
    #[error("interpolated surface needs at least one shape")]
    NoShapes,

    /// Primitive referencing a material the scene does not have.
    #[error("primitive {primitive} references unknown material {material}")]
    UnknownMaterial {
        /// Index of the primitive in the scene.
        primitive: usize,
        /// Referenced material index.
        material: usize,
    },

    /// Malformed animation data.
    #[error(transparent)]
    Anim(#[from] rayscene_anim::AnimError),

    /// Malformed simulator setup.
    #[error(transparent)]
    Physics(#[from] rayscene_physics::PhysicsError),

    /// Configuration that is not valid TOML or has fields of the wrong type.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
