#![warn(missing_docs)]

//! Scene-level facade for the rayscene kernel.
//!
//! A [`Scene`] holds materials and an ordered [`PrimitiveGroup`]. Each
//! [`Primitive`] places a static shape, an animated transform, a sequence of
//! shapes, a skinned shape or a simulation in the world, and answers bounds
//! and ray queries either at its current state or at a given time.
//!
//! # Example
//!
//! ```
//! use rayscene::{Lambert, Primitive, Ray, Scene};
//! use rayscene_math::{Frame3, Point3, Vec3};
//! use rayscene_shape::{Quad, Shape};
//!
//! let mut scene = Scene::new();
//! let gray = scene.add_material(Lambert::default());
//! let floor = Primitive::new(Shape::from(Quad::new(2.0, 2.0)))
//!     .with_frame(Frame3::from_origin(Point3::new(0.0, 0.0, -1.0)))
//!     .with_material(gray);
//! scene.add_primitive(floor).unwrap();
//!
//! let hit = scene
//!     .intersect_nearest(&Ray::new(Point3::origin(), -Vec3::z()))
//!     .unwrap();
//! assert!((hit.ray_t - 1.0).abs() < 1e-9);
//! assert_eq!(hit.material, Some(gray));
//! ```
//!
//! # Features
//!
//! - `parallel` - skin vertices with rayon

pub use rayscene_anim;
pub use rayscene_math;
pub use rayscene_physics;
pub use rayscene_raytrace;
pub use rayscene_shape;

mod animation;
mod config;
mod error;
mod intersect;
mod material;
mod primitive;
mod simulation;

pub use config::{ClothParams, ParticleSystemParams, SimulationConfig, SimulationParams};
pub use error::SceneError;
pub use material::{Lambert, Material, Phong};
pub use primitive::{InterpolatedSurface, Primitive, PrimitiveGroup, PrimitiveKind, Scene, TransformedSurface};
pub use rayscene_raytrace::{Intersection, MaterialId, Ray};
pub use simulation::{Cloth, ParticleSystem, ShapeCollider, Simulated};
