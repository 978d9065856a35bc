//! Vertex deformers.

use crate::{Geometry, Shape};
use rayscene_math::{bernstein, not_implemented, precondition, Point3, Range3, Vec3};

/// Free-form deformation lattice over a reference box.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    /// Reference box mapped onto the unit cube of the lattice.
    pub bbox: Range3,
    /// Control points along x, y and z.
    pub grid: [usize; 3],
    /// Control points, x fastest then y then z.
    pub pos: Vec<Point3>,
}

impl Lattice {
    /// Lattice with control points spread evenly over `bbox`, which makes
    /// it the identity deformation.
    ///
    /// Fatal unless every axis has at least two control points.
    pub fn new(bbox: Range3, grid: [usize; 3]) -> Self {
        precondition(grid.iter().all(|&n| n >= 2), "lattice needs two control points per axis");
        let size = bbox.size();
        let mut pos = vec![Point3::origin(); grid[0] * grid[1] * grid[2]];
        for k in 0..grid[2] {
            for j in 0..grid[1] {
                for i in 0..grid[0] {
                    let t = Vec3::new(
                        i as f64 / (grid[0] - 1) as f64,
                        j as f64 / (grid[1] - 1) as f64,
                        k as f64 / (grid[2] - 1) as f64,
                    );
                    pos[k * grid[0] * grid[1] + j * grid[0] + i] = bbox.min + size.component_mul(&t);
                }
            }
        }
        Self { bbox, grid, pos }
    }

    /// Index of control point `(i, j, k)`.
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        k * self.grid[0] * self.grid[1] + j * self.grid[0] + i
    }

    fn apply(&self, p: &Point3) -> Point3 {
        let [gx, gy, gz] = self.grid;
        precondition(gx * gy * gz == self.pos.len(), "wrong number of lattice control points");
        let pl = (p - self.bbox.min).component_div(&self.bbox.size());
        let mut ret = Vec3::zeros();
        for i in 0..gx {
            let u = bernstein(pl.x, i, gx - 1);
            for j in 0..gy {
                let v = bernstein(pl.y, j, gy - 1);
                for k in 0..gz {
                    let w = bernstein(pl.z, k, gz - 1);
                    ret += self.pos[self.index(i, j, k)].coords * (u * v * w);
                }
            }
        }
        Point3::from(ret)
    }
}

/// A mapping applied to every vertex of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Deformer {
    /// Rotate about z by `angle` radians per unit of height.
    Twist {
        /// Twist rate.
        angle: f64,
    },
    /// Trivariate Bernstein free-form deformation.
    Lattice(Lattice),
}

impl Deformer {
    /// Deform a single point.
    pub fn apply(&self, p: &Point3) -> Point3 {
        match self {
            Deformer::Twist { angle } => {
                let r = p.x.hypot(p.y);
                let phi = p.y.atan2(p.x) + angle * p.z;
                Point3::new(r * phi.cos(), r * phi.sin(), p.z)
            }
            Deformer::Lattice(lattice) => lattice.apply(p),
        }
    }
}

impl Shape {
    /// Copy of the authored geometry with `deformer` applied to every vertex.
    ///
    /// Mesh normals are recomputed from the deformed positions when the mesh
    /// carried normals. Analytic shapes have no vertices to deform.
    pub fn deformed(&self, deformer: &Deformer) -> Shape {
        let mut out = Shape::new(self.geometry.clone());
        let had_normals = !out.normals().is_empty();
        match &mut out.geometry {
            Geometry::Sphere(_) | Geometry::Cylinder(_) | Geometry::Quad(_) => {
                not_implemented("deforming analytic shapes")
            }
            Geometry::Triangle(t) => {
                t.v0 = deformer.apply(&t.v0);
                t.v1 = deformer.apply(&t.v1);
                t.v2 = deformer.apply(&t.v2);
                return out;
            }
            Geometry::PointSet(_)
            | Geometry::LineSet(_)
            | Geometry::TriangleMesh(_)
            | Geometry::Mesh(_)
            | Geometry::FaceMesh(_) => {}
        }
        for p in out.positions_mut() {
            *p = deformer.apply(p);
        }
        if had_normals && !matches!(out.geometry, Geometry::FaceMesh(_)) {
            out.smooth_normals();
        }
        out
    }
}
