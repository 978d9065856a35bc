//! Ray-cylinder intersection for the open cylinder around +z.

use super::{solve_quadratic, SurfaceHit};
use crate::Ray;
use rayscene_shape::Cylinder;

/// Intersect a ray with the side of an open cylinder spanning
/// `z ∈ [0, height]`.
///
/// Rays parallel to the axis never hit.
pub fn intersect_cylinder(ray: &Ray, cylinder: &Cylinder) -> Option<SurfaceHit> {
    let o = &ray.origin;
    let d = &ray.direction;

    // Quadratic in the xy-plane: (ox + t dx)^2 + (oy + t dy)^2 = r^2
    let a = d.x * d.x + d.y * d.y;
    let b = 2.0 * (o.x * d.x + o.y * d.y);
    let c = o.x * o.x + o.y * o.y - cylinder.radius * cylinder.radius;

    let roots = solve_quadratic(a, b, c)?;
    roots.into_iter().find_map(|t| {
        if !ray.accepts(t) {
            return None;
        }
        let p = ray.at(t);
        if p.z < 0.0 || p.z > cylinder.height {
            return None;
        }
        Some(SurfaceHit {
            t,
            uv: cylinder.uv_of(&p),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayscene_math::{Point3, Vec3};

    #[test]
    fn test_ray_cylinder_side() {
        let cyl = Cylinder::new(1.0, 2.0);
        let ray = Ray::new(Point3::new(-5.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        let hit = intersect_cylinder(&ray, &cyl).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-10);
        assert!((hit.uv.x - 0.5).abs() < 1e-10);
        assert!((hit.uv.y - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_ray_cylinder_outside_height() {
        let cyl = Cylinder::new(1.0, 2.0);
        let ray = Ray::new(Point3::new(-5.0, 0.0, 3.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_cylinder(&ray, &cyl).is_none());
    }

    #[test]
    fn test_ray_cylinder_enters_through_open_end() {
        // Enters through the open top, hits the inside wall going out.
        let cyl = Cylinder::new(1.0, 2.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 3.0), Vec3::new(1.0, 0.0, -1.0));
        let hit = intersect_cylinder(&ray, &cyl).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-10);
        assert!((ray.at(hit.t).z - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_axis_parallel_ray_misses() {
        let cyl = Cylinder::new(1.0, 2.0);
        let ray = Ray::new(Point3::new(0.5, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect_cylinder(&ray, &cyl).is_none());
    }
}
