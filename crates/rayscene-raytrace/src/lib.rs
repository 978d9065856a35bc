#![warn(missing_docs)]

//! Ray queries over rayscene shapes.
//!
//! This crate answers nearest-hit, any-hit and bounds queries on a single
//! [`Shape`](rayscene_shape::Shape) in its local space. Scene-level callers
//! map rays into shape space and map the resulting [`Intersection`] back out.
//!
//! # Architecture
//!
//! - [`Ray`] - origin, unnormalized direction and a `[tmin, tmax]` interval
//! - [`Intersection`] - hit distance, surface coordinates and frame
//! - [`intersect`] - closed-form solvers for each analytic surface
//! - [`bounds`], [`intersect_nearest`], [`intersect_any`] - per-shape
//!   dispatch with a linear element scan
//!
//! There is no acceleration structure: every query visits every element.
//!
//! # Example
//!
//! ```ignore
//! use rayscene_raytrace::{intersect_nearest, Ray};
//! use rayscene_shape::{Quad, Shape};
//!
//! let quad: Shape = Quad::new(2.0, 2.0).into();
//! let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
//! let hit = intersect_nearest(&quad, &ray).unwrap();
//! assert_eq!(hit.ray_t, 5.0);
//! ```

mod dispatch;
mod intersection;
pub mod intersect;
mod ray;

pub use dispatch::{
    bounds, element_bounds, intersect_any, intersect_element_any, intersect_element_nearest,
    intersect_nearest,
};
pub use intersection::{Intersection, MaterialId};
pub use ray::Ray;
