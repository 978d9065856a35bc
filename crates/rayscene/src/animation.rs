//! Animation intervals.

use crate::{Primitive, PrimitiveGroup, PrimitiveKind, Scene};
use rayscene_math::Range1;

impl Primitive {
    /// Whether the primitive changes with time.
    ///
    /// Simulated primitives advance by explicit updates, not by time, and
    /// report no animation.
    pub fn is_animated(&self) -> bool {
        match &self.kind {
            PrimitiveKind::Surface(_) | PrimitiveKind::Simulated(_) => false,
            PrimitiveKind::Transformed(t) => t.transform.is_animated(),
            PrimitiveKind::Interpolated(i) => i.is_animated(),
            PrimitiveKind::Skinned(s) => s.is_animated(),
        }
    }

    /// Time range covered by the primitive's animation; empty when static.
    pub fn animation_interval(&self) -> Range1 {
        match &self.kind {
            PrimitiveKind::Surface(_) | PrimitiveKind::Simulated(_) => Range1::empty(),
            PrimitiveKind::Transformed(t) => t.transform.animation_interval(),
            PrimitiveKind::Interpolated(i) => i.animation_interval(),
            PrimitiveKind::Skinned(s) => s.animation_interval(),
        }
    }
}

impl PrimitiveGroup {
    /// Union of the primitive intervals.
    pub fn animation_interval(&self) -> Range1 {
        self.prims
            .iter()
            .fold(Range1::empty(), |acc, p| acc.union(&p.animation_interval()))
    }
}

impl Scene {
    /// Union of the primitive intervals.
    pub fn animation_interval(&self) -> Range1 {
        self.prims.animation_interval()
    }
}

#[cfg(test)]
mod tests {
    use crate::{InterpolatedSurface, Primitive, PrimitiveGroup, Scene, TransformedSurface};
    use rayscene_anim::{AnimatedTransform, KeyframedValue};
    use rayscene_math::{Point3, Range1, Vec3};
    use rayscene_shape::{Shape, Sphere};

    fn sphere() -> Shape {
        Sphere::new(Point3::origin(), 1.0).into()
    }

    #[test]
    fn test_intervals_union_over_primitives() {
        let mut transform = AnimatedTransform::default();
        transform.anim_rotation =
            Some(KeyframedValue::linear(&[(1.0, Vec3::zeros()), (4.0, Vec3::new(0.0, 0.0, 1.0))]).unwrap());
        let transformed = Primitive::new(TransformedSurface::new(sphere(), transform));
        let interpolated = Primitive::new(InterpolatedSurface::new(vec![sphere(), sphere(), sphere()], 3.0).unwrap());
        let still = Primitive::new(sphere());

        assert!(transformed.is_animated());
        assert!(!still.is_animated());
        assert!(still.animation_interval().is_empty());
        assert_eq!(transformed.animation_interval(), Range1::new(1.0, 4.0));
        assert_eq!(interpolated.animation_interval(), Range1::new(0.0, 6.0));

        let mut scene = Scene::new();
        scene.prims = PrimitiveGroup::new(vec![still, transformed, interpolated]);
        assert_eq!(scene.animation_interval(), Range1::new(0.0, 6.0));
        assert!(Scene::new().animation_interval().is_empty());
    }
}
