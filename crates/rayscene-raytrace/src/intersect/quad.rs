//! Ray-quad intersection.

use super::SurfaceHit;
use crate::Ray;
use rayscene_math::Point2;
use rayscene_shape::Quad;

/// Intersect a ray with a centered quad in the `z = 0` plane.
pub fn intersect_quad(ray: &Ray, quad: &Quad) -> Option<SurfaceHit> {
    if ray.direction.z == 0.0 {
        return None;
    }
    let t = -ray.origin.z / ray.direction.z;
    if !ray.accepts(t) {
        return None;
    }
    let p = ray.at(t);
    if p.x.abs() > quad.width / 2.0 || p.y.abs() > quad.height / 2.0 {
        return None;
    }
    Some(SurfaceHit {
        t,
        uv: Point2::new(p.x / quad.width + 0.5, p.y / quad.height + 0.5),
    })
}
