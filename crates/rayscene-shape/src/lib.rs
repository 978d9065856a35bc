#![warn(missing_docs)]

//! Shape geometry for the rayscene kernel.
//!
//! A [`Shape`] is pure geometry: attribute buffers and topology, with no
//! placement and no material. The set of geometry variants is closed
//! ([`Geometry`]), so every consumer matches exhaustively and a new variant
//! cannot be added without wiring it everywhere.
//!
//! A shape may carry a cached substitute (a deformed or tessellated copy).
//! While present, every query on the shape is answered by the substitute;
//! the cache is tagged with the [`SubstituteParams`] it was built for and is
//! rebuilt when those params change.

mod deform;
mod geometry;
mod sample;

pub use deform::{Deformer, Lattice};
pub use geometry::{
    interpolate_barycentric, smooth_vertex_normals, triangle_area, triangle_normal, Cylinder,
    FaceMesh, LineSet, Mesh, PointSet, Quad, Sphere, Triangle, TriangleMesh, DEFAULT_RADIUS,
};
pub use sample::SurfaceSample;

use rayscene_math::{not_implemented, Point3, Vec3};

/// The closed set of geometry variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Points.
    PointSet(PointSet),
    /// Line segments.
    LineSet(LineSet),
    /// Indexed triangles.
    TriangleMesh(TriangleMesh),
    /// Triangles and quads.
    Mesh(Mesh),
    /// Face-varying triangles and quads.
    FaceMesh(FaceMesh),
    /// Analytic sphere.
    Sphere(Sphere),
    /// Analytic open cylinder.
    Cylinder(Cylinder),
    /// Analytic quad.
    Quad(Quad),
    /// Single triangle.
    Triangle(Triangle),
}

/// Parameters a substitute shape was built for.
#[derive(Debug, Clone, PartialEq)]
pub enum SubstituteParams {
    /// Substitute produced by applying a deformer to the shape's vertices.
    Deform(Deformer),
    /// Substitute produced by an external tessellator at the given level.
    Tessellate {
        /// Subdivision level.
        level: u32,
        /// Whether the tessellator smooths vertex normals.
        smooth: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Substitute {
    params: SubstituteParams,
    shape: Box<Shape>,
}

/// Geometry plus its optional cached substitute.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// The authored geometry.
    pub geometry: Geometry,
    substitute: Option<Substitute>,
}

impl Shape {
    /// Shape with no substitute.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            substitute: None,
        }
    }

    /// The shape queries should run on: the substitute when one is cached,
    /// else this shape.
    pub fn active(&self) -> &Shape {
        match &self.substitute {
            Some(sub) => sub.shape.active(),
            None => self,
        }
    }

    /// The cached substitute, if any.
    pub fn substitute(&self) -> Option<&Shape> {
        self.substitute.as_ref().map(|sub| sub.shape.as_ref())
    }

    /// Params the cached substitute was built for.
    pub fn substitute_params(&self) -> Option<&SubstituteParams> {
        self.substitute.as_ref().map(|sub| &sub.params)
    }

    /// Drop the cached substitute.
    pub fn clear_substitute(&mut self) {
        self.substitute = None;
    }

    /// Make sure the substitute matches `params`, calling `build` on the
    /// authored shape only when the cached one was built for other params.
    pub fn update_substitute(
        &mut self,
        params: SubstituteParams,
        build: impl FnOnce(&Shape, &SubstituteParams) -> Shape,
    ) {
        if self.substitute_params() == Some(&params) {
            return;
        }
        log::trace!("rebuilding substitute shape for {params:?}");
        let authored = Shape::new(self.geometry.clone());
        let shape = build(&authored, &params);
        self.substitute = Some(Substitute {
            params,
            shape: Box::new(shape),
        });
    }

    /// Cache the shape deformed by `deformer` as the substitute.
    pub fn deform(&mut self, deformer: Deformer) {
        self.update_substitute(SubstituteParams::Deform(deformer), |shape, params| match params {
            SubstituteParams::Deform(d) => shape.deformed(d),
            SubstituteParams::Tessellate { .. } => not_implemented("tessellation inside deform"),
        });
    }

    /// Vertex positions; empty for analytic shapes.
    pub fn positions(&self) -> &[Point3] {
        match &self.geometry {
            Geometry::PointSet(s) => &s.pos,
            Geometry::LineSet(s) => &s.pos,
            Geometry::TriangleMesh(s) => &s.pos,
            Geometry::Mesh(s) => &s.pos,
            Geometry::FaceMesh(s) => &s.pos,
            Geometry::Sphere(_) | Geometry::Cylinder(_) | Geometry::Quad(_) | Geometry::Triangle(_) => &[],
        }
    }

    /// Mutable vertex positions; empty for analytic shapes.
    pub fn positions_mut(&mut self) -> &mut [Point3] {
        match &mut self.geometry {
            Geometry::PointSet(s) => &mut s.pos,
            Geometry::LineSet(s) => &mut s.pos,
            Geometry::TriangleMesh(s) => &mut s.pos,
            Geometry::Mesh(s) => &mut s.pos,
            Geometry::FaceMesh(s) => &mut s.pos,
            Geometry::Sphere(_) | Geometry::Cylinder(_) | Geometry::Quad(_) | Geometry::Triangle(_) => &mut [],
        }
    }

    /// Vertex normals; empty when the shape has none.
    pub fn normals(&self) -> &[Vec3] {
        match &self.geometry {
            Geometry::TriangleMesh(s) => &s.norm,
            Geometry::Mesh(s) => &s.norm,
            Geometry::FaceMesh(s) => &s.norm,
            _ => &[],
        }
    }

    /// Mutable vertex normals; empty when the shape has none.
    pub fn normals_mut(&mut self) -> &mut [Vec3] {
        match &mut self.geometry {
            Geometry::TriangleMesh(s) => &mut s.norm,
            Geometry::Mesh(s) => &mut s.norm,
            Geometry::FaceMesh(s) => &mut s.norm,
            _ => &mut [],
        }
    }

    /// Number of intersectable elements.
    pub fn element_count(&self) -> usize {
        match &self.geometry {
            Geometry::PointSet(s) => s.pos.len(),
            Geometry::LineSet(s) => s.line.len(),
            Geometry::TriangleMesh(s) => s.triangle.len(),
            Geometry::Mesh(s) => s.element_count(),
            Geometry::FaceMesh(s) => s.element_count(),
            Geometry::Sphere(_) | Geometry::Cylinder(_) | Geometry::Quad(_) | Geometry::Triangle(_) => 1,
        }
    }

    /// Recompute smooth vertex normals of a mesh from its current positions.
    ///
    /// Analytic shapes and point/line sets have no stored normals and are
    /// left untouched.
    pub fn smooth_normals(&mut self) {
        match &mut self.geometry {
            Geometry::TriangleMesh(s) => s.norm = smooth_vertex_normals(&s.pos, &s.triangle),
            Geometry::Mesh(s) => s.smooth_normals(),
            Geometry::FaceMesh(_) => not_implemented("smoothing face-varying mesh normals"),
            Geometry::PointSet(_)
            | Geometry::LineSet(_)
            | Geometry::Sphere(_)
            | Geometry::Cylinder(_)
            | Geometry::Quad(_)
            | Geometry::Triangle(_) => {}
        }
    }
}

impl From<Geometry> for Shape {
    fn from(geometry: Geometry) -> Self {
        Self::new(geometry)
    }
}

macro_rules! impl_from_geometry {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(g: $variant) -> Self {
                    Self::new(Geometry::$variant(g))
                }
            }
        )*
    };
}

impl_from_geometry!(PointSet, LineSet, TriangleMesh, Mesh, FaceMesh, Sphere, Cylinder, Quad, Triangle);

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Shape {
        Mesh {
            pos: vec![
                Point3::new(-1.0, -1.0, 0.0),
                Point3::new(1.0, -1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(-1.0, 1.0, 0.0),
            ],
            quad: vec![[0, 1, 2, 3]],
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_active_without_substitute() {
        let shape = square();
        assert!(std::ptr::eq(shape.active(), &shape));
        assert_eq!(shape.element_count(), 2);
    }

    #[test]
    fn test_substitute_rebuilt_only_when_params_change() {
        let mut shape = square();
        let mut builds = 0;
        let params = SubstituteParams::Tessellate { level: 1, smooth: false };
        for _ in 0..3 {
            shape.update_substitute(params.clone(), |s, _| {
                builds += 1;
                s.clone()
            });
        }
        assert_eq!(builds, 1);
        shape.update_substitute(SubstituteParams::Tessellate { level: 2, smooth: false }, |s, _| {
            builds += 1;
            s.clone()
        });
        assert_eq!(builds, 2);
        assert!(shape.substitute().is_some());
        shape.clear_substitute();
        assert!(shape.substitute().is_none());
    }

    #[test]
    fn test_deform_redirects_active() {
        let mut shape = square();
        shape.deform(Deformer::Twist { angle: 0.0 });
        let active = shape.active();
        assert!(!std::ptr::eq(active, &shape));
        assert_eq!(active.positions().len(), 4);
    }

    #[test]
    fn test_analytic_shapes_have_no_buffers() {
        let shape: Shape = Sphere::default().into();
        assert!(shape.positions().is_empty());
        assert_eq!(shape.element_count(), 1);
    }
}
