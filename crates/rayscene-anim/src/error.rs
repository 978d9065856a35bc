//! Error types for animation data.

use thiserror::Error;

/// Errors found while validating animation data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimError {
    /// A curve needs at least two keyframe times.
    #[error("Keyframed value needs at least 2 times, got {0}")]
    TooFewTimes(usize),

    /// Keyframe times must not decrease.
    #[error("Keyframe time {index} is earlier than the one before it")]
    DecreasingTimes {
        /// Index of the offending time.
        index: usize,
    },

    /// Control values must fill every segment.
    #[error("Keyframed value expects {expected} control values, got {found}")]
    ValueCount {
        /// `(times - 1) * (degree + 1)`.
        expected: usize,
        /// Values provided.
        found: usize,
    },

    /// A bone's parent must come before it.
    #[error("Bone {bone} has parent {parent}, which does not precede it")]
    BoneOrder {
        /// Bone index.
        bone: usize,
        /// Parent index.
        parent: usize,
    },

    /// A weight list references a bone that does not exist.
    #[error("Vertex {vertex} references missing bone {bone}")]
    MissingBone {
        /// Vertex index.
        vertex: usize,
        /// Bone index.
        bone: usize,
    },

    /// Bone indices and weights of a vertex differ in length.
    #[error("Vertex {vertex} has {indices} bone indices but {weights} weights")]
    WeightLength {
        /// Vertex index.
        vertex: usize,
        /// Number of bone indices.
        indices: usize,
        /// Number of weights.
        weights: usize,
    },

    /// There must be one weight list per rest vertex.
    #[error("Expected {vertices} weight lists, got {weights}")]
    VertexCount {
        /// Rest shape vertex count.
        vertices: usize,
        /// Weight lists provided.
        weights: usize,
    },
}
