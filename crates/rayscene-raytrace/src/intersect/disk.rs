//! Camera-facing disk test for approximate point sets.

use super::SurfaceHit;
use crate::Ray;
use rayscene_math::{Point2, Point3};

/// Intersect a ray with a disk of `radius` around `center` facing the ray.
///
/// The hit is the point of the ray closest to `center`; `uv` is zero.
pub fn intersect_point_disk(ray: &Ray, center: &Point3, radius: f64) -> Option<SurfaceHit> {
    let dd = ray.direction.norm_squared();
    if dd == 0.0 {
        return None;
    }
    let t = (center - ray.origin).dot(&ray.direction) / dd;
    if !ray.accepts(t) {
        return None;
    }
    if (ray.at(t) - center).norm_squared() > radius * radius {
        return None;
    }
    Some(SurfaceHit { t, uv: Point2::origin() })
}
