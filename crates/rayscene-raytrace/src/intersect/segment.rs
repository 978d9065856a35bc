//! Camera-facing capsule test for approximate line sets.

use super::SurfaceHit;
use crate::Ray;
use rayscene_math::{Point2, Point3};

/// Intersect a ray with the segment `a-b` thickened to a radius varying
/// linearly from `ra` to `rb`.
///
/// The hit is the point of the ray closest to the segment; `uv.x` is the
/// segment parameter of the closest point and `uv.y` is zero.
pub fn intersect_segment_capsule(ray: &Ray, a: &Point3, b: &Point3, ra: f64, rb: f64) -> Option<SurfaceHit> {
    let u = &ray.direction;
    let v = b - a;
    let w = ray.origin - a;
    let uu = u.dot(u);
    let uv = u.dot(&v);
    let vv = v.dot(&v);
    let uw = u.dot(&w);
    let vw = v.dot(&w);
    if uu == 0.0 {
        return None;
    }

    // Segment parameter of the closest point between the two lines.
    let den = uu * vv - uv * uv;
    let s = if vv == 0.0 || den <= 1e-12 * uu * vv {
        0.0
    } else {
        ((uu * vw - uv * uw) / den).clamp(0.0, 1.0)
    };
    let q = a + v * s;
    let t = (q - ray.origin).dot(u) / uu;
    if !ray.accepts(t) {
        return None;
    }
    let r = ra * (1.0 - s) + rb * s;
    if (ray.at(t) - q).norm_squared() > r * r {
        return None;
    }
    Some(SurfaceHit {
        t,
        uv: Point2::new(s, 0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayscene_math::Vec3;

    #[test]
    fn test_capsule_hit_mid_segment() {
        let a = Point3::new(-1.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let ray = Ray::new(Point3::new(0.5, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = intersect_segment_capsule(&ray, &a, &b, 0.1, 0.1).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-12);
        assert!((hit.uv.x - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_capsule_radius_varies() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        // 0.15 off the axis at s = 0.5: radius there is 0.2, at s = 0 only 0.1.
        let near_b = Ray::new(Point3::new(1.0, 0.15, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_segment_capsule(&near_b, &a, &b, 0.1, 0.3).is_some());
        let near_a = Ray::new(Point3::new(0.0, 0.15, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_segment_capsule(&near_a, &a, &b, 0.1, 0.3).is_none());
    }

    #[test]
    fn test_capsule_beyond_endpoint_misses() {
        let a = Point3::new(-1.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let ray = Ray::new(Point3::new(2.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_segment_capsule(&ray, &a, &b, 0.1, 0.1).is_none());
    }
}
