#![warn(missing_docs)]

//! Animation for the rayscene kernel.
//!
//! - [`KeyframedValue`] - piecewise Bernstein curves over time
//! - [`AnimatedTransform`] - translation, Euler rotation and scale, each a
//!   base value plus an optional curve
//! - [`Skeleton`] and [`SkinnedShape`] - forward kinematics over a bone
//!   list and linear blend skinning of a rest shape
//!
//! Malformed curves and bone hierarchies are rejected when they are built,
//! so evaluation never fails.
//!
//! # Features
//!
//! - `parallel` - skin vertices with rayon

mod error;
mod keyframed;
mod skin;
mod transform;

pub use error::AnimError;
pub use keyframed::KeyframedValue;
pub use skin::{Bone, BoneFrames, BoneWeights, Skeleton, SkinnedShape};
pub use transform::AnimatedTransform;
