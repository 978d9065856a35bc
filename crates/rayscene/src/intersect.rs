//! Bounds and ray queries on primitives, groups and scenes.
//!
//! Queries without a time use each primitive's current state and refuse
//! animated primitives. Queries with a time resolve the animation first;
//! skinned primitives refresh their posed shape, so those take `&mut self`.

use crate::{Primitive, PrimitiveGroup, PrimitiveKind, Scene, TransformedSurface};
use rayscene_math::{precondition, Range3};
use rayscene_raytrace::{self as raytrace, Intersection, Ray};

const ANIMATED_QUERY: &str = "time-less queries do not support animation";

impl Primitive {
    /// Bounding box in world space.
    ///
    /// Fatal on animated transformed, interpolated or skinned primitives.
    pub fn bounds(&self) -> Range3 {
        let local = match &self.kind {
            PrimitiveKind::Surface(shape) => raytrace::bounds(shape),
            PrimitiveKind::Transformed(t) => {
                precondition(!t.transform.is_animated(), ANIMATED_QUERY);
                t.transform.matrix(0.0).apply_range(&raytrace::bounds(&t.shape))
            }
            PrimitiveKind::Interpolated(i) => {
                precondition(!i.is_animated(), ANIMATED_QUERY);
                raytrace::bounds(i.shape_at(0.0))
            }
            PrimitiveKind::Skinned(s) => {
                precondition(!s.is_animated(), ANIMATED_QUERY);
                raytrace::bounds(s.posed())
            }
            PrimitiveKind::Simulated(s) => raytrace::bounds(s.shape()),
        };
        local.in_frame(&self.frame)
    }

    /// Nearest hit at the primitive's current state.
    pub fn intersect_nearest(&self, ray: &Ray) -> Option<Intersection> {
        let local = ray.to_local(&self.frame);
        let hit = match &self.kind {
            PrimitiveKind::Surface(shape) => raytrace::intersect_nearest(shape, &local),
            PrimitiveKind::Transformed(t) => {
                precondition(!t.transform.is_animated(), ANIMATED_QUERY);
                transformed_nearest(t, &local, 0.0)
            }
            PrimitiveKind::Interpolated(i) => {
                precondition(!i.is_animated(), ANIMATED_QUERY);
                raytrace::intersect_nearest(i.shape_at(0.0), &local)
            }
            PrimitiveKind::Skinned(s) => {
                precondition(!s.is_animated(), ANIMATED_QUERY);
                raytrace::intersect_nearest(s.posed(), &local)
            }
            PrimitiveKind::Simulated(s) => raytrace::intersect_nearest(s.shape(), &local),
        };
        hit.map(|hit| self.finish(hit))
    }

    /// Whether the ray hits the primitive at its current state.
    pub fn intersect_any(&self, ray: &Ray) -> bool {
        let local = ray.to_local(&self.frame);
        match &self.kind {
            PrimitiveKind::Surface(shape) => raytrace::intersect_any(shape, &local),
            PrimitiveKind::Transformed(t) => {
                precondition(!t.transform.is_animated(), ANIMATED_QUERY);
                raytrace::intersect_any(&t.shape, &local.transformed(&t.transform.matrix_inverse(0.0)))
            }
            PrimitiveKind::Interpolated(i) => {
                precondition(!i.is_animated(), ANIMATED_QUERY);
                raytrace::intersect_any(i.shape_at(0.0), &local)
            }
            PrimitiveKind::Skinned(s) => {
                precondition(!s.is_animated(), ANIMATED_QUERY);
                raytrace::intersect_any(s.posed(), &local)
            }
            PrimitiveKind::Simulated(s) => raytrace::intersect_any(s.shape(), &local),
        }
    }

    /// Nearest hit with the animation resolved at `time`.
    pub fn intersect_nearest_at(&mut self, ray: &Ray, time: f64) -> Option<Intersection> {
        let local = ray.to_local(&self.frame);
        let hit = match &mut self.kind {
            PrimitiveKind::Surface(_) | PrimitiveKind::Simulated(_) => return self.intersect_nearest(ray),
            PrimitiveKind::Transformed(t) => transformed_nearest(t, &local, time),
            PrimitiveKind::Interpolated(i) => raytrace::intersect_nearest(i.shape_at(time), &local),
            PrimitiveKind::Skinned(s) => {
                s.update_pose(time);
                raytrace::intersect_nearest(s.posed(), &local)
            }
        };
        hit.map(|hit| self.finish(hit))
    }

    /// Whether the ray hits the primitive with the animation resolved at
    /// `time`.
    pub fn intersect_any_at(&mut self, ray: &Ray, time: f64) -> bool {
        let local = ray.to_local(&self.frame);
        match &mut self.kind {
            PrimitiveKind::Surface(_) | PrimitiveKind::Simulated(_) => self.intersect_any(ray),
            PrimitiveKind::Transformed(t) => {
                raytrace::intersect_any(&t.shape, &local.transformed(&t.transform.matrix_inverse(time)))
            }
            PrimitiveKind::Interpolated(i) => raytrace::intersect_any(i.shape_at(time), &local),
            PrimitiveKind::Skinned(s) => {
                s.update_pose(time);
                raytrace::intersect_any(s.posed(), &local)
            }
        }
    }

    fn finish(&self, hit: Intersection) -> Intersection {
        Intersection {
            material: self.material,
            ..hit.in_frame(&self.frame)
        }
    }
}

fn transformed_nearest(t: &TransformedSurface, local: &Ray, time: f64) -> Option<Intersection> {
    let m = t.transform.matrix(time);
    let mi = t.transform.matrix_inverse(time);
    raytrace::intersect_nearest(&t.shape, &local.transformed(&mi)).map(|hit| hit.transformed(&m, &mi))
}

/// Keep the closer of two hits; ties keep the earlier one.
fn closer(best: Option<Intersection>, hit: Option<Intersection>, ray: &mut Ray) -> Option<Intersection> {
    match (best, hit) {
        (Some(b), Some(h)) if h.ray_t >= b.ray_t => Some(b),
        (best, None) => best,
        (_, Some(h)) => {
            ray.tmax = h.ray_t;
            Some(h)
        }
    }
}

impl PrimitiveGroup {
    /// Union of the primitive bounds.
    pub fn bounds(&self) -> Range3 {
        self.prims.iter().fold(Range3::empty(), |acc, p| acc.union(&p.bounds()))
    }

    /// Nearest hit over all primitives.
    pub fn intersect_nearest(&self, ray: &Ray) -> Option<Intersection> {
        let mut scan = *ray;
        let mut best = None;
        for p in &self.prims {
            let hit = p.intersect_nearest(&scan);
            best = closer(best, hit, &mut scan);
        }
        best
    }

    /// Whether any primitive is hit.
    pub fn intersect_any(&self, ray: &Ray) -> bool {
        self.prims.iter().any(|p| p.intersect_any(ray))
    }

    /// Nearest hit over all primitives at `time`.
    pub fn intersect_nearest_at(&mut self, ray: &Ray, time: f64) -> Option<Intersection> {
        let mut scan = *ray;
        let mut best = None;
        for p in &mut self.prims {
            let hit = p.intersect_nearest_at(&scan, time);
            best = closer(best, hit, &mut scan);
        }
        best
    }

    /// Whether any primitive is hit at `time`.
    pub fn intersect_any_at(&mut self, ray: &Ray, time: f64) -> bool {
        self.prims.iter_mut().any(|p| p.intersect_any_at(ray, time))
    }
}

impl Scene {
    /// Bounds of every primitive.
    pub fn bounds(&self) -> Range3 {
        self.prims.bounds()
    }

    /// Nearest hit in the scene.
    pub fn intersect_nearest(&self, ray: &Ray) -> Option<Intersection> {
        self.prims.intersect_nearest(ray)
    }

    /// Whether anything in the scene is hit.
    pub fn intersect_any(&self, ray: &Ray) -> bool {
        self.prims.intersect_any(ray)
    }

    /// Nearest hit in the scene at `time`.
    pub fn intersect_nearest_at(&mut self, ray: &Ray, time: f64) -> Option<Intersection> {
        self.prims.intersect_nearest_at(ray, time)
    }

    /// Whether anything in the scene is hit at `time`.
    pub fn intersect_any_at(&mut self, ray: &Ray, time: f64) -> bool {
        self.prims.intersect_any_at(ray, time)
    }
}
