//! Orthonormal affine frames.

use crate::{Point3, Transform, Vec3};
use nalgebra::Matrix4;

/// An origin plus three orthonormal axes.
///
/// Frames place primitives, bones and intersection points. Points are mapped
/// from frame-local coordinates with [`Frame3::transform_point`] and back with
/// [`Frame3::transform_point_inverse`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame3 {
    /// Origin.
    pub o: Point3,
    /// X axis.
    pub x: Vec3,
    /// Y axis.
    pub y: Vec3,
    /// Z axis.
    pub z: Vec3,
}

impl Frame3 {
    /// Frame from origin and axes, taken as given.
    pub fn new(o: Point3, x: Vec3, y: Vec3, z: Vec3) -> Self {
        Self { o, x, y, z }
    }

    /// The world frame.
    pub fn identity() -> Self {
        Self::new(Point3::origin(), Vec3::x(), Vec3::y(), Vec3::z())
    }

    /// Identity axes placed at `o`.
    pub fn from_origin(o: Point3) -> Self {
        Self::new(o, Vec3::x(), Vec3::y(), Vec3::z())
    }

    /// Frame whose z axis is `z`; x and y are picked arbitrarily.
    pub fn from_z(o: Point3, z: Vec3) -> Self {
        let z = z.normalize();
        let arbitrary = if z.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        let x = arbitrary.cross(&z).normalize();
        let y = z.cross(&x);
        Self::new(o, x, y, z)
    }

    /// Frame with z along `z` and x as close as possible to `x`.
    pub fn from_zx(o: Point3, z: Vec3, x: Vec3) -> Self {
        Self::new(o, x, z.cross(&x), z).orthonormalized()
    }

    /// Re-orthonormalize keeping z fixed, then x, and rebuilding y.
    ///
    /// Falls back to an arbitrary x when x is parallel to z.
    pub fn orthonormalized(&self) -> Self {
        let z = self.z.normalize();
        let x = self.x - z * self.x.dot(&z);
        if x.norm_squared() < 1e-24 {
            return Self::from_z(self.o, z);
        }
        let x = x.normalize();
        let y = z.cross(&x);
        Self::new(self.o, x, y, z)
    }

    /// Map a frame-local point into the parent space.
    pub fn transform_point(&self, p: &Point3) -> Point3 {
        self.o + self.x * p.x + self.y * p.y + self.z * p.z
    }

    /// Map a parent-space point into frame-local coordinates.
    pub fn transform_point_inverse(&self, p: &Point3) -> Point3 {
        let d = p - self.o;
        Point3::new(d.dot(&self.x), d.dot(&self.y), d.dot(&self.z))
    }

    /// Map a frame-local vector into the parent space.
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Map a parent-space vector into frame-local coordinates.
    pub fn transform_vector_inverse(&self, v: &Vec3) -> Vec3 {
        Vec3::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }

    /// Re-express a frame given in this frame's coordinates in the parent space.
    pub fn transform_frame(&self, f: &Frame3) -> Frame3 {
        Frame3::new(
            self.transform_point(&f.o),
            self.transform_vector(&f.x),
            self.transform_vector(&f.y),
            self.transform_vector(&f.z),
        )
    }

    /// Re-express a parent-space frame in this frame's coordinates.
    pub fn transform_frame_inverse(&self, f: &Frame3) -> Frame3 {
        Frame3::new(
            self.transform_point_inverse(&f.o),
            self.transform_vector_inverse(&f.x),
            self.transform_vector_inverse(&f.y),
            self.transform_vector_inverse(&f.z),
        )
    }

    /// The local-to-parent matrix of this frame.
    pub fn to_transform(&self) -> Transform {
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            self.x.x, self.y.x, self.z.x, self.o.x,
            self.x.y, self.y.y, self.z.y, self.o.y,
            self.x.z, self.y.z, self.z.z, self.o.z,
            0.0,      0.0,      0.0,      1.0,
        );
        Transform { matrix }
    }

    /// The parent-to-local matrix of this frame (transpose of the rotation).
    pub fn to_transform_inverse(&self) -> Transform {
        let o = self.o.coords;
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            self.x.x, self.x.y, self.x.z, -self.x.dot(&o),
            self.y.x, self.y.y, self.y.z, -self.y.dot(&o),
            self.z.x, self.z.y, self.z.z, -self.z.dot(&o),
            0.0,      0.0,      0.0,      1.0,
        );
        Transform { matrix }
    }
}

impl Default for Frame3 {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tilted() -> Frame3 {
        Frame3::from_zx(
            Point3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_point_round_trip() {
        let f = tilted();
        let p = Point3::new(-4.0, 0.5, 7.0);
        let back = f.transform_point(&f.transform_point_inverse(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn test_orthonormalized_is_right_handed() {
        let f = Frame3::new(
            Point3::origin(),
            Vec3::new(1.0, 0.2, 0.0),
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, 2.0),
        )
        .orthonormalized();
        assert!((f.x.dot(&f.z)).abs() < 1e-12);
        assert_relative_eq!(f.x.cross(&f.y), f.z, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_axes_fall_back() {
        let f = Frame3::new(Point3::origin(), Vec3::z(), Vec3::y(), Vec3::z()).orthonormalized();
        assert!((f.x.norm() - 1.0).abs() < 1e-12);
        assert!(f.x.dot(&f.z).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_matches_frame() {
        let f = tilted();
        let p = Point3::new(0.3, -2.0, 1.5);
        assert_relative_eq!(f.to_transform().apply_point(&p), f.transform_point(&p), epsilon = 1e-12);
        assert_relative_eq!(
            f.to_transform_inverse().apply_point(&p),
            f.transform_point_inverse(&p),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_frame_composition() {
        let parent = tilted();
        let child = Frame3::from_origin(Point3::new(0.0, 0.0, 1.0));
        let composed = parent.transform_frame(&child);
        assert_relative_eq!(composed.o, parent.o + parent.z, epsilon = 1e-12);
        let back = parent.transform_frame_inverse(&composed);
        assert_relative_eq!(back.o, child.o, epsilon = 1e-12);
    }
}
