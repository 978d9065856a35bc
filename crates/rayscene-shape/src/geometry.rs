//! Geometry variants and their surface frames.
//!
//! Every shape owns its attribute buffers. Optional buffers (normals, radii,
//! texture coordinates) may be empty; accessors fall back to fixed defaults.

use rayscene_math::{atan2pos, Frame3, Point2, Point3, Vec3};
use std::f64::consts::PI;

/// Radius used by point and line sets that carry no per-vertex radii.
pub const DEFAULT_RADIUS: f64 = 0.01;

/// Set of points, rendered and hit as small spheres or camera-facing disks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    /// Point positions.
    pub pos: Vec<Point3>,
    /// Per-point radius (optional).
    pub radius: Vec<f64>,
    /// Per-point texture coordinate (optional).
    pub texcoord: Vec<Point2>,
    /// Hit points as camera-facing disks instead of exact spheres.
    pub approximate: bool,
}

impl PointSet {
    /// Radius of point `i`.
    pub fn radius_at(&self, i: usize) -> f64 {
        self.radius.get(i).copied().unwrap_or(DEFAULT_RADIUS)
    }

    /// Texture coordinate of point `i`.
    pub fn texcoord_at(&self, i: usize) -> Point2 {
        self.texcoord.get(i).copied().unwrap_or_else(Point2::origin)
    }

    /// Frame on the sphere around point `i` at sphere coordinates `uv`.
    pub fn frame(&self, i: usize, uv: Point2) -> Frame3 {
        Sphere::new(self.pos[i], self.radius_at(i)).frame(uv)
    }
}

/// Set of line segments, rendered and hit as thin cylinders or capsules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSet {
    /// Vertex positions.
    pub pos: Vec<Point3>,
    /// Per-vertex radius (optional).
    pub radius: Vec<f64>,
    /// Per-vertex texture coordinate (optional).
    pub texcoord: Vec<Point2>,
    /// Segments as pairs of vertex indices.
    pub line: Vec<[usize; 2]>,
    /// Hit segments as camera-facing capsules instead of exact cylinders.
    pub approximate: bool,
}

impl LineSet {
    /// Radius at vertex `i`.
    pub fn radius_at(&self, i: usize) -> f64 {
        self.radius.get(i).copied().unwrap_or(DEFAULT_RADIUS)
    }

    /// Radius of segment `e`: the mean of its endpoint radii.
    pub fn segment_radius(&self, e: usize) -> f64 {
        let [a, b] = self.line[e];
        (self.radius_at(a) + self.radius_at(b)) / 2.0
    }

    /// Length of segment `e`.
    pub fn segment_length(&self, e: usize) -> f64 {
        let [a, b] = self.line[e];
        (self.pos[b] - self.pos[a]).norm()
    }

    /// Frame of the cylinder enclosing segment `e`: origin at the first
    /// endpoint, z along the segment.
    pub fn cylinder_frame(&self, e: usize) -> Frame3 {
        let [a, b] = self.line[e];
        Frame3::from_z(self.pos[a], self.pos[b] - self.pos[a])
    }

    /// Surface frame on segment `e` at cylinder coordinates `uv`.
    pub fn frame(&self, e: usize, uv: Point2) -> Frame3 {
        let cylinder = Cylinder::new(self.segment_radius(e), self.segment_length(e));
        self.cylinder_frame(e)
            .transform_frame(&cylinder.frame(uv))
    }

    /// Texture coordinate at parameter `s` along segment `e`.
    pub fn texcoord_at(&self, e: usize, s: f64) -> Point2 {
        let [a, b] = self.line[e];
        if self.texcoord.is_empty() {
            return Point2::new(s, 0.0);
        }
        Point2::from(self.texcoord[a].coords * (1.0 - s) + self.texcoord[b].coords * s)
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub pos: Vec<Point3>,
    /// Vertex normals (optional).
    pub norm: Vec<Vec3>,
    /// Vertex texture coordinates (optional).
    pub texcoord: Vec<Point2>,
    /// Triangles as vertex index triples.
    pub triangle: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Surface frame on triangle `e` at barycentric `uv`.
    pub fn frame(&self, e: usize, uv: Point2) -> Frame3 {
        vertex_frame(&self.pos, &self.norm, self.triangle[e], uv)
    }
}

/// Mesh mixing triangles and quads over shared vertices.
///
/// Elements are numbered triangles first, then two per quad.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub pos: Vec<Point3>,
    /// Vertex normals (optional).
    pub norm: Vec<Vec3>,
    /// Vertex texture coordinates (optional).
    pub texcoord: Vec<Point2>,
    /// Triangles as vertex index triples.
    pub triangle: Vec<[usize; 3]>,
    /// Quads as vertex index quadruples.
    pub quad: Vec<[usize; 4]>,
}

impl Mesh {
    /// Number of triangle elements, counting two per quad.
    pub fn element_count(&self) -> usize {
        self.triangle.len() + 2 * self.quad.len()
    }

    /// Vertex indices of triangle element `e`.
    pub fn triangle_face(&self, e: usize) -> [usize; 3] {
        split_face(&self.triangle, &self.quad, e)
    }

    /// Surface frame on element `e` at barycentric `uv`.
    pub fn frame(&self, e: usize, uv: Point2) -> Frame3 {
        vertex_frame(&self.pos, &self.norm, self.triangle_face(e), uv)
    }

    /// Recompute vertex normals as the normalized sum of adjacent face normals.
    pub fn smooth_normals(&mut self) {
        let faces: Vec<[usize; 3]> = (0..self.element_count()).map(|e| self.triangle_face(e)).collect();
        self.norm = smooth_vertex_normals(&self.pos, &faces);
    }
}

/// Face-varying mesh: every corner indexes positions, normals and texture
/// coordinates independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceMesh {
    /// Positions.
    pub pos: Vec<Point3>,
    /// Normals (optional).
    pub norm: Vec<Vec3>,
    /// Texture coordinates (optional).
    pub texcoord: Vec<Point2>,
    /// Corners as `[position, normal, texcoord]` index triples.
    pub vertex: Vec<[usize; 3]>,
    /// Triangles over corners.
    pub triangle: Vec<[usize; 3]>,
    /// Quads over corners.
    pub quad: Vec<[usize; 4]>,
}

impl FaceMesh {
    /// Number of triangle elements, counting two per quad.
    pub fn element_count(&self) -> usize {
        self.triangle.len() + 2 * self.quad.len()
    }

    /// Corner indices of triangle element `e`.
    pub fn triangle_face(&self, e: usize) -> [usize; 3] {
        split_face(&self.triangle, &self.quad, e)
    }

    /// Position indices of triangle element `e`.
    pub fn position_face(&self, e: usize) -> [usize; 3] {
        self.triangle_face(e).map(|c| self.vertex[c][0])
    }

    /// Surface frame on element `e` at barycentric `uv`.
    pub fn frame(&self, e: usize, uv: Point2) -> Frame3 {
        let corners = self.triangle_face(e);
        let [p0, p1, p2] = corners.map(|c| self.pos[self.vertex[c][0]]);
        let geom = triangle_normal(&p0, &p1, &p2);
        let z = if self.norm.is_empty() {
            geom
        } else {
            let [n0, n1, n2] = corners.map(|c| self.norm[self.vertex[c][1]]);
            interpolate_barycentric(&n0, &n1, &n2, uv).normalize()
        };
        let o = Point3::from(interpolate_barycentric(&p0.coords, &p1.coords, &p2.coords, uv));
        Frame3::from_zx(o, z, p0 - p2)
    }
}

/// Analytic sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center.
    pub center: Point3,
    /// Radius.
    pub radius: f64,
}

impl Sphere {
    /// Sphere from center and radius.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Unit direction from the center at `uv = (φ/2π, θ/π)`.
    pub fn direction(uv: Point2) -> Vec3 {
        let (sp, cp) = (2.0 * PI * uv.x).sin_cos();
        let (st, ct) = (PI * uv.y).sin_cos();
        Vec3::new(cp * st, sp * st, ct)
    }

    /// Sphere coordinates of a point on the surface.
    pub fn uv_of(&self, p: &Point3) -> Point2 {
        let pl = (p - self.center) / self.radius;
        Point2::new(
            atan2pos(pl.y, pl.x) / (2.0 * PI),
            pl.z.clamp(-1.0, 1.0).acos() / PI,
        )
    }

    /// Surface frame at `uv`: z is the outward normal, x follows ∂P/∂u.
    pub fn frame(&self, uv: Point2) -> Frame3 {
        let n = Self::direction(uv);
        let (sp, cp) = (2.0 * PI * uv.x).sin_cos();
        Frame3::from_zx(self.center + n * self.radius, n, Vec3::new(-sp, cp, 0.0))
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Point3::origin(), 1.0)
    }
}

/// Open cylinder of the given radius around +z, spanning `z ∈ [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Radius.
    pub radius: f64,
    /// Height along +z.
    pub height: f64,
}

impl Cylinder {
    /// Cylinder from radius and height.
    pub fn new(radius: f64, height: f64) -> Self {
        Self { radius, height }
    }

    /// Cylinder coordinates `(φ/2π, z/height)` of a local point.
    pub fn uv_of(&self, p: &Point3) -> Point2 {
        Point2::new(atan2pos(p.y, p.x) / (2.0 * PI), p.z / self.height)
    }

    /// Surface frame at `uv`: z radial, x along ∂P/∂u, y along the axis.
    pub fn frame(&self, uv: Point2) -> Frame3 {
        let (s, c) = (2.0 * PI * uv.x).sin_cos();
        let z = Vec3::new(c, s, 0.0);
        let o = Point3::new(c * self.radius, s * self.radius, uv.y * self.height);
        Frame3::from_zx(o, z, Vec3::new(-s, c, 0.0))
    }
}

impl Default for Cylinder {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Rectangle in the `z = 0` plane, centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

impl Quad {
    /// Quad from width and height.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Point at quad coordinates `uv ∈ [0,1]²`.
    pub fn point(&self, uv: Point2) -> Point3 {
        Point3::new((uv.x - 0.5) * self.width, (uv.y - 0.5) * self.height, 0.0)
    }

    /// Surface frame at `uv`; axes are the world axes.
    pub fn frame(&self, uv: Point2) -> Frame3 {
        Frame3::from_origin(self.point(uv))
    }
}

impl Default for Quad {
    fn default() -> Self {
        Self::new(2.0, 2.0)
    }
}

/// Single triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3,
    /// Second vertex.
    pub v1: Point3,
    /// Third vertex.
    pub v2: Point3,
}

impl Triangle {
    /// Triangle from its vertices.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Point at barycentric `uv`.
    pub fn point(&self, uv: Point2) -> Point3 {
        Point3::from(interpolate_barycentric(&self.v0.coords, &self.v1.coords, &self.v2.coords, uv))
    }

    /// Surface frame at barycentric `uv`.
    pub fn frame(&self, uv: Point2) -> Frame3 {
        Frame3::from_zx(
            self.point(uv),
            triangle_normal(&self.v0, &self.v1, &self.v2),
            self.v0 - self.v2,
        )
    }
}

/// Barycentric blend: `uv.x` weighs `a`, `uv.y` weighs `b`, the rest `c`.
pub fn interpolate_barycentric<T>(a: &T, b: &T, c: &T, uv: Point2) -> T
where
    T: Clone + std::ops::Add<Output = T> + std::ops::Mul<f64, Output = T>,
{
    a.clone() * uv.x + b.clone() * uv.y + c.clone() * (1.0 - uv.x - uv.y)
}

/// Unit normal of the triangle `(a, b, c)` by the right-hand rule.
pub fn triangle_normal(a: &Point3, b: &Point3, c: &Point3) -> Vec3 {
    (b - a).cross(&(c - a)).normalize()
}

/// Area of the triangle `(a, b, c)`.
pub fn triangle_area(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    (b - a).cross(&(c - a)).norm() / 2.0
}

/// Per-vertex normals as normalized sums of incident face normals.
///
/// Vertices touched by no face keep a `+z` normal.
pub fn smooth_vertex_normals(pos: &[Point3], faces: &[[usize; 3]]) -> Vec<Vec3> {
    let mut norm = vec![Vec3::zeros(); pos.len()];
    for &[a, b, c] in faces {
        // Area-weighted: the unnormalized cross product.
        let n = (pos[b] - pos[a]).cross(&(pos[c] - pos[a]));
        norm[a] += n;
        norm[b] += n;
        norm[c] += n;
    }
    for n in &mut norm {
        *n = if n.norm_squared() > 0.0 { n.normalize() } else { Vec3::z() };
    }
    norm
}

fn split_face(triangle: &[[usize; 3]], quad: &[[usize; 4]], e: usize) -> [usize; 3] {
    if e < triangle.len() {
        return triangle[e];
    }
    let q = e - triangle.len();
    let [a, b, c, d] = quad[q / 2];
    if q % 2 == 0 {
        [a, b, c]
    } else {
        [a, c, d]
    }
}

fn vertex_frame(pos: &[Point3], norm: &[Vec3], f: [usize; 3], uv: Point2) -> Frame3 {
    let [p0, p1, p2] = f.map(|i| pos[i]);
    let z = if norm.is_empty() {
        triangle_normal(&p0, &p1, &p2)
    } else {
        interpolate_barycentric(&norm[f[0]], &norm[f[1]], &norm[f[2]], uv).normalize()
    };
    let o = Point3::from(interpolate_barycentric(&p0.coords, &p1.coords, &p2.coords, uv));
    Frame3::from_zx(o, z, p0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_frame_on_surface() {
        let sphere = Sphere::new(Point3::new(1.0, 2.0, 3.0), 2.0);
        for &(u, v) in &[(0.1, 0.2), (0.5, 0.5), (0.9, 0.75)] {
            let f = sphere.frame(Point2::new(u, v));
            assert!(((f.o - sphere.center).norm() - 2.0).abs() < 1e-12);
            assert_relative_eq!(f.z, (f.o - sphere.center) / 2.0, epsilon = 1e-12);
            assert_relative_eq!(sphere.uv_of(&f.o), Point2::new(u, v), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cylinder_frame() {
        let cyl = Cylinder::new(2.0, 4.0);
        let f = cyl.frame(Point2::new(0.25, 0.5));
        assert_relative_eq!(f.o, Point3::new(0.0, 2.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(f.z, Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(f.y, Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_quad_point() {
        let quad = Quad::new(2.0, 4.0);
        assert_relative_eq!(quad.point(Point2::new(0.5, 0.5)), Point3::origin());
        assert_relative_eq!(quad.point(Point2::new(1.0, 0.0)), Point3::new(1.0, -2.0, 0.0));
    }

    #[test]
    fn test_mesh_quad_split() {
        let mesh = Mesh {
            triangle: vec![[0, 1, 2]],
            quad: vec![[3, 4, 5, 6]],
            ..Default::default()
        };
        assert_eq!(mesh.element_count(), 3);
        assert_eq!(mesh.triangle_face(0), [0, 1, 2]);
        assert_eq!(mesh.triangle_face(1), [3, 4, 5]);
        assert_eq!(mesh.triangle_face(2), [3, 5, 6]);
    }

    #[test]
    fn test_smooth_normals_flat_grid() {
        let mut mesh = Mesh {
            pos: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            quad: vec![[0, 1, 2, 3]],
            ..Default::default()
        };
        mesh.smooth_normals();
        assert_eq!(mesh.norm.len(), 4);
        for n in &mesh.norm {
            assert_relative_eq!(*n, Vec3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_line_frame_follows_segment() {
        let lines = LineSet {
            pos: vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
            radius: vec![0.1, 0.3],
            line: vec![[0, 1]],
            ..Default::default()
        };
        assert!((lines.segment_radius(0) - 0.2).abs() < 1e-12);
        let f = lines.frame(0, Point2::new(0.0, 0.5));
        assert!((f.o.x - 1.0).abs() < 1e-12);
        // On the surface: distance to the segment axis is the radius.
        assert!(((f.o.y.powi(2) + f.o.z.powi(2)).sqrt() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_missing_optional_data_defaults() {
        let points = PointSet {
            pos: vec![Point3::origin()],
            ..Default::default()
        };
        assert_eq!(points.radius_at(0), DEFAULT_RADIUS);
        assert_eq!(points.texcoord_at(0), Point2::origin());
    }
}
