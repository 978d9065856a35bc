//! Animated translation, rotation and scale.

use crate::KeyframedValue;
use rayscene_math::{Range1, Transform, Vec3};

/// Base translation, Euler rotation and scale, each optionally driven by a
/// keyframed curve.
///
/// Curves add to translation and rotation and multiply scale componentwise.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedTransform {
    /// Base translation.
    pub translation: Vec3,
    /// Translation offset over time.
    pub anim_translation: Option<KeyframedValue>,
    /// Base Euler angles in radians, applied in ZYX order.
    pub rotation: Vec3,
    /// Rotation offset over time.
    pub anim_rotation: Option<KeyframedValue>,
    /// Base scale.
    pub scale: Vec3,
    /// Scale factor over time.
    pub anim_scale: Option<KeyframedValue>,
}

impl AnimatedTransform {
    /// A transform with no animation.
    pub fn fixed(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            anim_translation: None,
            rotation,
            anim_rotation: None,
            scale,
            anim_scale: None,
        }
    }

    /// Whether any channel has a curve.
    pub fn is_animated(&self) -> bool {
        self.anim_translation.is_some() || self.anim_rotation.is_some() || self.anim_scale.is_some()
    }

    /// Union of the intervals of every animated channel; empty when none is.
    pub fn animation_interval(&self) -> Range1 {
        [&self.anim_translation, &self.anim_rotation, &self.anim_scale]
            .into_iter()
            .flatten()
            .fold(Range1::empty(), |acc, curve| acc.union(&curve.interval()))
    }

    /// Translation, rotation and scale at time `t`.
    pub fn resolve(&self, t: f64) -> (Vec3, Vec3, Vec3) {
        let translation = match &self.anim_translation {
            Some(curve) => self.translation + curve.value(t),
            None => self.translation,
        };
        let rotation = match &self.anim_rotation {
            Some(curve) => self.rotation + curve.value(t),
            None => self.rotation,
        };
        let scale = match &self.anim_scale {
            Some(curve) => self.scale.component_mul(&curve.value(t)),
            None => self.scale,
        };
        (translation, rotation, scale)
    }

    /// Local-to-parent matrix at time `t`.
    pub fn matrix(&self, t: f64) -> Transform {
        let (translation, rotation, scale) = self.resolve(t);
        Transform::euler_zyx(&translation, &rotation, &scale)
    }

    /// Parent-to-local matrix at time `t`, composed factor by factor.
    pub fn matrix_inverse(&self, t: f64) -> Transform {
        let (translation, rotation, scale) = self.resolve(t);
        Transform::euler_zyx_inverse(&translation, &rotation, &scale)
    }
}

impl Default for AnimatedTransform {
    fn default() -> Self {
        Self::fixed(Vec3::zeros(), Vec3::zeros(), Vec3::repeat(1.0))
    }
}
