//! Closed-form ray-surface intersection.
//!
//! Each solver returns the hit parameter and the surface coordinates of the
//! closest hit inside the ray interval, or `None`. Frames, normals and texture
//! coordinates are reconstructed from those coordinates by the caller.

mod cylinder;
mod disk;
mod quad;
mod segment;
mod sphere;
mod triangle;

pub use cylinder::intersect_cylinder;
pub use disk::intersect_point_disk;
pub use quad::intersect_quad;
pub use segment::intersect_segment_capsule;
pub use sphere::intersect_sphere;
pub use triangle::intersect_triangle;

use rayscene_math::Point2;

/// Result of a ray-surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Parameter along the ray.
    pub t: f64,
    /// Surface parameter coordinates (u, v).
    pub uv: Point2,
}

/// Roots of `a t² + b t + c = 0` in increasing order, if real.
fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<[f64; 2]> {
    if a == 0.0 {
        return None;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    Some(if t1 <= t2 { [t1, t2] } else { [t2, t1] })
}
