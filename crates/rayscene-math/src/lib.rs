#![warn(missing_docs)]

//! Math types for the rayscene kernel.
//!
//! Thin wrappers around nalgebra providing the types shared by every
//! rayscene crate: points, vectors, affine transforms, orthonormal frames,
//! intervals and bounding boxes, plus the fatal-condition helpers used when
//! a caller breaks a data contract.

use nalgebra::{Matrix4, Unit, Vector2, Vector3, Vector4};

mod fatal;
mod frame;
mod range;

pub use fatal::{not_implemented, precondition, violated};
pub use frame::Frame3;
pub use range::{Range1, Range3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point in 2D parameter space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vec3::new(dx, dy, dz)),
        }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz)),
        }
    }

    /// Rotation about the x axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        Self::about(Vector3::x_axis(), angle)
    }

    /// Rotation about the y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        Self::about(Vector3::y_axis(), angle)
    }

    /// Rotation about the z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        Self::about(Vector3::z_axis(), angle)
    }

    fn about(axis: Unit<Vector3<f64>>, angle: f64) -> Self {
        Self {
            matrix: Matrix4::from_axis_angle(&axis, angle),
        }
    }

    /// `Translate · RotateZ · RotateY · RotateX · Scale`.
    ///
    /// `rotation` holds Euler angles in radians about x, y and z.
    pub fn euler_zyx(translation: &Vec3, rotation: &Vec3, scale: &Vec3) -> Self {
        Self::translation(translation.x, translation.y, translation.z)
            .then(&Self::rotation_z(rotation.z))
            .then(&Self::rotation_y(rotation.y))
            .then(&Self::rotation_x(rotation.x))
            .then(&Self::scale(scale.x, scale.y, scale.z))
    }

    /// Exact inverse of [`Transform::euler_zyx`], composed factor by factor
    /// in reverse order with negated angles and reciprocal scales.
    pub fn euler_zyx_inverse(translation: &Vec3, rotation: &Vec3, scale: &Vec3) -> Self {
        Self::scale(1.0 / scale.x, 1.0 / scale.y, 1.0 / scale.z)
            .then(&Self::rotation_x(-rotation.x))
            .then(&Self::rotation_y(-rotation.y))
            .then(&Self::rotation_z(-rotation.z))
            .then(&Self::translation(-translation.x, -translation.y, -translation.z))
    }

    /// Compose: `self` then `other` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation, applies rotation/scale).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Transform a normal given the inverse of this transform.
    ///
    /// Normals go through the transpose of the inverse; passing the inverse
    /// explicitly keeps callers that already hold an exact inverse from
    /// paying for a generic inversion.
    pub fn apply_normal_with_inverse(inverse: &Transform, n: &Vec3) -> Vec3 {
        let m = &inverse.matrix;
        Vec3::new(
            m[(0, 0)] * n.x + m[(1, 0)] * n.y + m[(2, 0)] * n.z,
            m[(0, 1)] * n.x + m[(1, 1)] * n.y + m[(2, 1)] * n.z,
            m[(0, 2)] * n.x + m[(1, 2)] * n.y + m[(2, 2)] * n.z,
        )
        .normalize()
    }

    /// Transform a frame: origin as a point, axes as vectors, then
    /// re-orthonormalized around the transformed z axis.
    pub fn apply_frame(&self, f: &Frame3) -> Frame3 {
        Frame3::new(
            self.apply_point(&f.o),
            self.apply_vec(&f.x),
            self.apply_vec(&f.y),
            self.apply_vec(&f.z),
        )
        .orthonormalized()
    }

    /// Bounding box of the eight transformed corners of `range`.
    pub fn apply_range(&self, range: &Range3) -> Range3 {
        if range.is_empty() {
            return Range3::empty();
        }
        let mut out = Range3::empty();
        for corner in range.corners() {
            out.grow(&self.apply_point(&corner));
        }
        out
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Lower bound of the ray interval used by freshly built rays.
pub const RAY_EPSILON: f64 = 1e-5;

/// Bernstein basis polynomial `B(i, n)` evaluated at `u`.
///
/// Indices outside `0..=n` yield zero.
pub fn bernstein(u: f64, i: usize, n: usize) -> f64 {
    if i > n {
        return 0.0;
    }
    binomial(n, i) * u.powi(i as i32) * (1.0 - u).powi((n - i) as i32)
}

fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    let mut acc = 1.0;
    for j in 0..k {
        acc = acc * (n - j) as f64 / (j + 1) as f64;
    }
    acc
}

/// `atan2(y, x)` remapped into `[0, 2π)`.
pub fn atan2pos(y: f64, x: f64) -> f64 {
    let a = y.atan2(x);
    if a < 0.0 {
        a + 2.0 * std::f64::consts::PI
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_euler_zyx_round_trips_points() {
        let t = Vec3::new(0.5, 4.0, -1.0);
        let r = Vec3::new(-0.7, 0.2, 1.9);
        let s = Vec3::new(1.5, 3.0, 0.25);
        let m = Transform::euler_zyx(&t, &r, &s);
        let mi = Transform::euler_zyx_inverse(&t, &r, &s);
        for p in [Point3::origin(), Point3::new(1.0, -2.0, 0.5), Point3::new(-3.0, 0.0, 7.0)] {
            approx::assert_relative_eq!(mi.apply_point(&m.apply_point(&p)), p, epsilon = 1e-12);
            approx::assert_relative_eq!(m.apply_point(&mi.apply_point(&p)), p, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_euler_zyx_single_channels() {
        let zero = Vec3::zeros();
        let one = Vec3::new(1.0, 1.0, 1.0);
        let p = Point3::new(1.0, 1.0, 1.0);
        let moved = Transform::euler_zyx(&Vec3::new(0.0, 0.0, -2.0), &zero, &one).apply_point(&p);
        approx::assert_relative_eq!(moved, Point3::new(1.0, 1.0, -1.0), epsilon = 1e-12);
        // A quarter turn about x takes +y to +z.
        let turned = Transform::euler_zyx(&zero, &Vec3::new(PI / 2.0, 0.0, 0.0), &one).apply_vec(&Vec3::y());
        approx::assert_relative_eq!(turned, Vec3::z(), epsilon = 1e-12);
        // A quarter turn about y takes +z to +x.
        let turned = Transform::euler_zyx(&zero, &Vec3::new(0.0, PI / 2.0, 0.0), &one).apply_vec(&Vec3::z());
        approx::assert_relative_eq!(turned, Vec3::x(), epsilon = 1e-12);
        approx::assert_relative_eq!(
            Transform::euler_zyx(&zero, &zero, &one).matrix,
            Transform::identity().matrix
        );
    }

    #[test]
    fn test_translation_ignores_vectors() {
        let t = Transform::translation(3.0, -1.0, 2.0);
        approx::assert_relative_eq!(t.apply_vec(&Vec3::x()), Vec3::x());
        approx::assert_relative_eq!(t.apply_point(&Point3::origin()), Point3::new(3.0, -1.0, 2.0));
    }

    #[test]
    fn test_euler_zyx_inverse_is_exact() {
        let t = Vec3::new(1.0, -2.0, 3.0);
        let r = Vec3::new(0.3, -1.1, 2.4);
        let s = Vec3::new(2.0, 0.5, 4.0);
        let m = Transform::euler_zyx(&t, &r, &s);
        let mi = Transform::euler_zyx_inverse(&t, &r, &s);
        let id = m.then(&mi);
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((id.matrix[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_euler_zyx_order() {
        // Scale happens before rotation, rotation before translation.
        let m = Transform::euler_zyx(
            &Vec3::new(0.0, 0.0, 5.0),
            &Vec3::new(0.0, 0.0, PI / 2.0),
            &Vec3::new(2.0, 1.0, 1.0),
        );
        let p = m.apply_point(&Point3::new(1.0, 0.0, 0.0));
        approx::assert_relative_eq!(p, Point3::new(0.0, 2.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_normal_transform_under_nonuniform_scale() {
        let m = Transform::scale(4.0, 1.0, 1.0);
        let mi = m.inverse().unwrap();
        // Plane x + y = 0 has normal (1,1,0); after stretching x the normal tilts toward y.
        let n = Transform::apply_normal_with_inverse(&mi, &Vec3::new(1.0, 1.0, 0.0));
        assert!(n.y > n.x);
        assert!((n.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_range_rotated_box() {
        let range = Range3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        let rotated = Transform::rotation_z(PI / 2.0).apply_range(&range);
        assert!((rotated.min.x + 1.0).abs() < 1e-12);
        assert!((rotated.max.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_bernstein_partition_of_unity() {
        for n in 0..5 {
            for step in 0..=10 {
                let u = step as f64 / 10.0;
                let sum: f64 = (0..=n).map(|i| bernstein(u, i, n)).sum();
                assert!((sum - 1.0).abs() < 1e-12);
            }
        }
        assert_eq!(bernstein(0.5, 3, 2), 0.0);
    }

    #[test]
    fn test_atan2pos_range() {
        assert!((atan2pos(-1.0, 0.0) - 1.5 * PI).abs() < 1e-12);
        assert!(atan2pos(0.0, 1.0).abs() < 1e-12);
    }
}
