//! Intersection records.

use rayscene_math::{Frame3, Point2, Point3, Transform, Vec3};

/// Index of a material in the scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// Result of a nearest-hit query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Parameter along the ray where the hit occurs.
    pub ray_t: f64,
    /// Surface parameter coordinates of the hit element.
    pub uv: Point2,
    /// Surface frame: origin at the hit point, z along the shading normal.
    pub frame: Frame3,
    /// Normal of the underlying geometry, without normal interpolation.
    pub geom_norm: Vec3,
    /// Texture coordinate.
    pub texcoord: Point2,
    /// Material of the primitive that was hit, set at primitive level.
    pub material: Option<MaterialId>,
}

impl Intersection {
    /// Create an intersection with no material.
    pub fn new(ray_t: f64, uv: Point2, frame: Frame3, geom_norm: Vec3, texcoord: Point2) -> Self {
        Self {
            ray_t,
            uv,
            frame,
            geom_norm,
            texcoord,
            material: None,
        }
    }

    /// Hit position.
    pub fn pos(&self) -> Point3 {
        self.frame.o
    }

    /// Shading normal.
    pub fn norm(&self) -> Vec3 {
        self.frame.z
    }

    /// Move the hit into the space `matrix` maps to.
    ///
    /// `inverse` must be the inverse of `matrix`; normals go through its
    /// transpose. `ray_t` is unchanged because rays carry unnormalized
    /// directions between spaces.
    pub fn transformed(&self, matrix: &Transform, inverse: &Transform) -> Self {
        let z = Transform::apply_normal_with_inverse(inverse, &self.frame.z);
        let frame = Frame3::from_zx(matrix.apply_point(&self.frame.o), z, matrix.apply_vec(&self.frame.x));
        Self {
            frame,
            geom_norm: Transform::apply_normal_with_inverse(inverse, &self.geom_norm),
            ..*self
        }
    }

    /// Move the hit from the local space of `frame` to its parent.
    pub fn in_frame(&self, frame: &Frame3) -> Self {
        Self {
            frame: frame.transform_frame(&self.frame),
            geom_norm: frame.transform_vector(&self.geom_norm),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hit() -> Intersection {
        Intersection::new(
            2.0,
            Point2::new(0.5, 0.5),
            Frame3::from_origin(Point3::new(1.0, 0.0, 0.0)),
            Vec3::z(),
            Point2::new(0.5, 0.5),
        )
    }

    #[test]
    fn test_in_frame_moves_point_and_normal() {
        let frame = Frame3::from_zx(Point3::new(0.0, 0.0, 3.0), Vec3::x(), Vec3::y());
        let moved = hit().in_frame(&frame);
        assert_relative_eq!(moved.pos(), Point3::new(0.0, 1.0, 3.0), epsilon = 1e-12);
        assert_relative_eq!(moved.geom_norm, Vec3::x(), epsilon = 1e-12);
        assert_eq!(moved.ray_t, 2.0);
    }

    #[test]
    fn test_transformed_under_scale_keeps_unit_normal() {
        let m = Transform::scale(2.0, 1.0, 5.0);
        let mi = Transform::scale(0.5, 1.0, 0.2);
        let moved = hit().transformed(&m, &mi);
        assert_relative_eq!(moved.pos(), Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(moved.norm(), Vec3::z(), epsilon = 1e-12);
        assert!((moved.frame.x.norm() - 1.0).abs() < 1e-12);
        assert_eq!(moved.material, None);
    }
}
