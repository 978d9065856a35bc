//! Ray-sphere intersection (quadratic equation).

use super::{solve_quadratic, SurfaceHit};
use crate::Ray;
use rayscene_shape::Sphere;

/// Intersect a ray with a sphere.
///
/// Returns the closer root inside the ray interval, falling back to the
/// farther one when the origin is inside the sphere.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Option<SurfaceHit> {
    let oc = ray.origin - sphere.center;
    let d = &ray.direction;

    // Quadratic: |oc + t*d|^2 = r^2
    let a = d.dot(d);
    let b = 2.0 * oc.dot(d);
    let c = oc.dot(&oc) - sphere.radius * sphere.radius;

    let roots = solve_quadratic(a, b, c)?;
    let t = roots.into_iter().find(|&t| ray.accepts(t))?;
    Some(SurfaceHit {
        t,
        uv: sphere.uv_of(&ray.at(t)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayscene_math::{Point3, Vec3};

    #[test]
    fn test_ray_sphere_through_center() {
        let sphere = Sphere::new(Point3::origin(), 5.0);
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let hit = intersect_sphere(&ray, &sphere).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-10);
        // Entry point on the -x side.
        assert!((hit.uv.x - 0.5).abs() < 1e-10);
        assert!((hit.uv.y - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let sphere = Sphere::new(Point3::origin(), 5.0);
        let ray = Ray::new(Point3::new(-10.0, 10.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_sphere(&ray, &sphere).is_none());
    }

    #[test]
    fn test_ray_sphere_from_inside() {
        let sphere = Sphere::new(Point3::origin(), 5.0);
        let ray = Ray::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0));
        let hit = intersect_sphere(&ray, &sphere).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_unnormalized_direction() {
        let sphere = Sphere::new(Point3::origin(), 1.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -2.0));
        let hit = intersect_sphere(&ray, &sphere).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_interval_excludes_hits() {
        let sphere = Sphere::new(Point3::origin(), 1.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0)).with_tmax(1.5);
        assert!(intersect_sphere(&ray, &sphere).is_none());
    }
}
