//! Uniform surface sampling.

use crate::{interpolate_barycentric, triangle_area, triangle_normal, Geometry, Shape, Sphere};
use rayscene_math::{not_implemented, precondition, Point2, Point3, Vec3};

const EMPTY_SHAPE: &str = "cannot sample an empty shape";
use std::f64::consts::PI;

/// A point drawn on a shape's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Position.
    pub pos: Point3,
    /// Unit surface normal.
    pub norm: Vec3,
    /// Texture coordinate.
    pub texcoord: Point2,
}

impl Shape {
    /// Draw a point uniformly distributed by area.
    ///
    /// `e` picks the element (for element-based shapes) and `uv` the point on
    /// it; both are expected in `[0, 1)`. Line sets and face-varying meshes
    /// cannot be sampled. Sampling a point set or mesh with no elements is
    /// fatal.
    pub fn sample_uniform(&self, e: f64, uv: Point2) -> SurfaceSample {
        let shape = self.active();
        match &shape.geometry {
            Geometry::Quad(quad) => SurfaceSample {
                pos: quad.point(uv),
                norm: Vec3::z(),
                texcoord: uv,
            },
            Geometry::Sphere(sphere) => {
                let z = 1.0 - 2.0 * uv.y;
                let suv = Point2::new(uv.x, z.clamp(-1.0, 1.0).acos() / PI);
                let n = Sphere::direction(suv);
                SurfaceSample {
                    pos: sphere.center + n * sphere.radius,
                    norm: n,
                    texcoord: suv,
                }
            }
            Geometry::Cylinder(cylinder) => {
                let (s, c) = (2.0 * PI * uv.x).sin_cos();
                SurfaceSample {
                    pos: Point3::new(c * cylinder.radius, s * cylinder.radius, uv.y * cylinder.height),
                    norm: Vec3::new(c, s, 0.0),
                    texcoord: uv,
                }
            }
            Geometry::Triangle(t) => {
                let buv = uniform_barycentric(uv);
                SurfaceSample {
                    pos: t.point(buv),
                    norm: triangle_normal(&t.v0, &t.v1, &t.v2),
                    texcoord: buv,
                }
            }
            Geometry::PointSet(points) => {
                let n = points.pos.len();
                precondition(n > 0, EMPTY_SHAPE);
                let i = ((e * n as f64) as usize).min(n.saturating_sub(1));
                SurfaceSample {
                    pos: points.pos[i],
                    norm: Vec3::z(),
                    texcoord: points.texcoord_at(i),
                }
            }
            Geometry::TriangleMesh(mesh) => {
                sample_faces(&mesh.pos, &mesh.norm, &mesh.texcoord, &mesh.triangle, e, uv)
            }
            Geometry::Mesh(mesh) => {
                let faces: Vec<[usize; 3]> = (0..mesh.element_count()).map(|k| mesh.triangle_face(k)).collect();
                sample_faces(&mesh.pos, &mesh.norm, &mesh.texcoord, &faces, e, uv)
            }
            Geometry::LineSet(_) => not_implemented("sampling line sets"),
            Geometry::FaceMesh(_) => not_implemented("sampling face-varying meshes"),
        }
    }
}

/// Barycentric coordinates uniformly distributed over a triangle.
fn uniform_barycentric(uv: Point2) -> Point2 {
    let su = uv.x.sqrt();
    Point2::new(1.0 - su, uv.y * su)
}

fn sample_faces(
    pos: &[Point3],
    norm: &[Vec3],
    texcoord: &[Point2],
    faces: &[[usize; 3]],
    e: f64,
    uv: Point2,
) -> SurfaceSample {
    precondition(!faces.is_empty(), EMPTY_SHAPE);
    let mut cdf = Vec::with_capacity(faces.len());
    let mut total = 0.0;
    for &[a, b, c] in faces {
        total += triangle_area(&pos[a], &pos[b], &pos[c]);
        cdf.push(total);
    }
    let target = e * total;
    let k = cdf.partition_point(|&acc| acc <= target).min(faces.len().saturating_sub(1));
    let f = faces[k];
    let [p0, p1, p2] = f.map(|i| pos[i]);
    let buv = uniform_barycentric(uv);
    let n = if norm.is_empty() {
        triangle_normal(&p0, &p1, &p2)
    } else {
        interpolate_barycentric(&norm[f[0]], &norm[f[1]], &norm[f[2]], buv).normalize()
    };
    let texcoord = if texcoord.is_empty() {
        buv
    } else {
        let [t0, t1, t2] = f.map(|i| texcoord[i].coords);
        Point2::from(interpolate_barycentric(&t0, &t1, &t2, buv))
    };
    SurfaceSample {
        pos: Point3::from(interpolate_barycentric(&p0.coords, &p1.coords, &p2.coords, buv)),
        norm: n,
        texcoord,
    }
}
