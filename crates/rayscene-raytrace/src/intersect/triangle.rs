//! Ray-triangle intersection (Möller-Trumbore).

use super::SurfaceHit;
use crate::Ray;
use rayscene_math::{Point2, Point3};

/// Intersect a ray with the triangle `(v0, v1, v2)`.
///
/// The returned `uv` are barycentric: `uv.x` weighs `v0`, `uv.y` weighs
/// `v1` and the remainder weighs `v2`. Both faces are hit.
pub fn intersect_triangle(ray: &Ray, v0: &Point3, v1: &Point3, v2: &Point3) -> Option<SurfaceHit> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = ray.direction.cross(&e2);
    let det = e1.dot(&p);
    if det == 0.0 {
        return None;
    }
    let inv_det = 1.0 / det;

    let tv = ray.origin - v0;
    let b1 = tv.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&b1) {
        return None;
    }
    let q = tv.cross(&e1);
    let b2 = ray.direction.dot(&q) * inv_det;
    if b2 < 0.0 || b1 + b2 > 1.0 {
        return None;
    }
    let t = e2.dot(&q) * inv_det;
    if !ray.accepts(t) {
        return None;
    }
    Some(SurfaceHit {
        t,
        uv: Point2::new(1.0 - b1 - b2, b1),
    })
}
