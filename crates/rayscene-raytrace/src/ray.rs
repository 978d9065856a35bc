//! Ray representation.

use rayscene_math::{Frame3, Point3, Transform, Vec3, RAY_EPSILON};

/// A ray with a parameter interval.
///
/// The direction is kept unnormalized so that mapping a ray through a
/// transform preserves its parameterization: a hit at `t` in one space is at
/// `t` in every other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray (not necessarily unit length).
    pub direction: Vec3,
    /// Smallest accepted parameter.
    pub tmin: f64,
    /// Largest accepted parameter; shrinks during nearest-hit scans.
    pub tmax: f64,
}

impl Ray {
    /// Create a ray over `[RAY_EPSILON, ∞)`.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            tmin: RAY_EPSILON,
            tmax: f64::INFINITY,
        }
    }

    /// Ray covering the segment from `from` to `to` at `t ∈ [RAY_EPSILON, 1]`.
    pub fn segment(from: Point3, to: Point3) -> Self {
        Self {
            origin: from,
            direction: to - from,
            tmin: RAY_EPSILON,
            tmax: 1.0,
        }
    }

    /// Copy with a different upper bound.
    pub fn with_tmax(self, tmax: f64) -> Self {
        Self { tmax, ..self }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Whether `t` lies in `[tmin, tmax]`.
    #[inline]
    pub fn accepts(&self, t: f64) -> bool {
        t >= self.tmin && t <= self.tmax
    }

    /// Ray mapped through `m`.
    pub fn transformed(&self, m: &Transform) -> Self {
        Self {
            origin: m.apply_point(&self.origin),
            direction: m.apply_vec(&self.direction),
            ..*self
        }
    }

    /// Ray re-expressed in the local coordinates of `frame`.
    pub fn to_local(&self, frame: &Frame3) -> Self {
        Self {
            origin: frame.transform_point_inverse(&self.origin),
            direction: frame.transform_vector_inverse(&self.direction),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        let p = ray.at(5.0);
        assert!((p.x - 10.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert!(p.z.abs() < 1e-12);
    }

    #[test]
    fn test_default_interval() {
        let ray = Ray::new(Point3::origin(), Vec3::z());
        assert!(!ray.accepts(0.0));
        assert!(ray.accepts(RAY_EPSILON));
        assert!(ray.accepts(1e30));
        assert!(!ray.with_tmax(2.0).accepts(2.5));
    }

    #[test]
    fn test_transform_keeps_parameterization() {
        let ray = Ray::new(Point3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let m = Transform::scale(3.0, 3.0, 3.0);
        let moved = ray.transformed(&m);
        let t = 2.0;
        let expected = m.apply_point(&ray.at(t));
        assert!((moved.at(t) - expected).norm() < 1e-12);
    }

    #[test]
    fn test_to_local() {
        let frame = Frame3::from_origin(Point3::new(0.0, 0.0, 4.0));
        let ray = Ray::segment(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, 3.0));
        let local = ray.to_local(&frame);
        assert!((local.origin.z - 1.0).abs() < 1e-12);
        assert!((local.at(0.5).z).abs() < 1e-12);
        assert_eq!(local.tmax, 1.0);
    }
}
