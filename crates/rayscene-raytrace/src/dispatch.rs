//! Per-shape dispatch of bounds and ray queries.
//!
//! Every query first redirects to the shape's cached substitute, then scans
//! the shape's elements in index order. Nearest-hit scans shrink the ray's
//! `tmax` after each accepted hit; a later hit at exactly the same distance
//! does not replace an earlier one.

use crate::intersect::{
    intersect_cylinder, intersect_point_disk, intersect_quad, intersect_segment_capsule,
    intersect_sphere, intersect_triangle, SurfaceHit,
};
use crate::{Intersection, Ray};
use rayscene_math::{Frame3, Point2, Point3, Range3, Vec3};
use rayscene_shape::{
    interpolate_barycentric, triangle_normal, Cylinder, FaceMesh, Geometry, LineSet, Mesh, PointSet,
    Shape, Sphere,
};

/// Bounding box of a shape in its local space.
pub fn bounds(shape: &Shape) -> Range3 {
    let shape = shape.active();
    match &shape.geometry {
        Geometry::PointSet(_) | Geometry::LineSet(_) => (0..shape.element_count())
            .fold(Range3::empty(), |acc, e| acc.union(&element_bounds(shape, e))),
        Geometry::TriangleMesh(m) => Range3::from_points(&m.pos),
        Geometry::Mesh(m) => Range3::from_points(&m.pos),
        Geometry::FaceMesh(m) => Range3::from_points(&m.pos),
        Geometry::Sphere(_) | Geometry::Cylinder(_) | Geometry::Quad(_) | Geometry::Triangle(_) => {
            element_bounds(shape, 0)
        }
    }
}

/// Bounding box of element `e` of a shape (the shape itself for analytic
/// shapes).
pub fn element_bounds(shape: &Shape, e: usize) -> Range3 {
    match &shape.active().geometry {
        Geometry::PointSet(p) => Range3::from_sphere(&p.pos[e], p.radius_at(e)),
        Geometry::LineSet(l) => {
            cylinder_bounds(&Cylinder::new(l.segment_radius(e), l.segment_length(e))).in_frame(&l.cylinder_frame(e))
        }
        Geometry::TriangleMesh(m) => Range3::from_points(m.triangle[e].map(|i| m.pos[i]).iter()),
        Geometry::Mesh(m) => Range3::from_points(m.triangle_face(e).map(|i| m.pos[i]).iter()),
        Geometry::FaceMesh(m) => Range3::from_points(m.position_face(e).map(|i| m.pos[i]).iter()),
        Geometry::Sphere(s) => Range3::from_sphere(&s.center, s.radius),
        Geometry::Cylinder(c) => cylinder_bounds(c),
        Geometry::Quad(q) => Range3::new(
            Point3::new(-q.width / 2.0, -q.height / 2.0, 0.0),
            Point3::new(q.width / 2.0, q.height / 2.0, 0.0),
        ),
        Geometry::Triangle(t) => Range3::from_points(&[t.v0, t.v1, t.v2]),
    }
}

fn cylinder_bounds(c: &Cylinder) -> Range3 {
    Range3::new(
        Point3::new(-c.radius, -c.radius, 0.0),
        Point3::new(c.radius, c.radius, c.height),
    )
}

/// Nearest hit of `ray` with a shape, in the shape's local space.
pub fn intersect_nearest(shape: &Shape, ray: &Ray) -> Option<Intersection> {
    let shape = shape.active();
    let mut ray = *ray;
    let mut nearest: Option<Intersection> = None;
    for e in 0..shape.element_count() {
        if let Some(hit) = intersect_element_nearest(shape, e, &ray) {
            if nearest.map_or(true, |n| hit.ray_t < n.ray_t) {
                ray.tmax = hit.ray_t;
                nearest = Some(hit);
            }
        }
    }
    nearest
}

/// Whether `ray` hits a shape at all.
pub fn intersect_any(shape: &Shape, ray: &Ray) -> bool {
    let shape = shape.active();
    (0..shape.element_count()).any(|e| intersect_element_any(shape, e, ray))
}

/// Hit of `ray` with element `e` of a shape.
pub fn intersect_element_nearest(shape: &Shape, e: usize, ray: &Ray) -> Option<Intersection> {
    match &shape.active().geometry {
        Geometry::PointSet(p) => point_nearest(p, e, ray),
        Geometry::LineSet(l) => line_nearest(l, e, ray),
        Geometry::TriangleMesh(m) => {
            let f = m.triangle[e];
            let [p0, p1, p2] = f.map(|i| m.pos[i]);
            let hit = intersect_triangle(ray, &p0, &p1, &p2)?;
            let texcoord = if m.texcoord.is_empty() {
                lone_triangle_texcoord(hit.uv)
            } else {
                interpolate_texcoord(f.map(|i| m.texcoord[i]), hit.uv)
            };
            Some(Intersection::new(
                hit.t,
                hit.uv,
                m.frame(e, hit.uv),
                triangle_normal(&p0, &p1, &p2),
                texcoord,
            ))
        }
        Geometry::Mesh(m) => mesh_nearest(m, e, ray),
        Geometry::FaceMesh(m) => face_mesh_nearest(m, e, ray),
        Geometry::Sphere(s) => {
            let hit = intersect_sphere(ray, s)?;
            let frame = s.frame(hit.uv);
            Some(Intersection::new(hit.t, hit.uv, frame, frame.z, hit.uv))
        }
        Geometry::Cylinder(c) => {
            let hit = intersect_cylinder(ray, c)?;
            let frame = c.frame(hit.uv);
            Some(Intersection::new(hit.t, hit.uv, frame, frame.z, hit.uv))
        }
        Geometry::Quad(q) => {
            let hit = intersect_quad(ray, q)?;
            Some(Intersection::new(hit.t, hit.uv, q.frame(hit.uv), Vec3::z(), hit.uv))
        }
        Geometry::Triangle(t) => {
            let hit = intersect_triangle(ray, &t.v0, &t.v1, &t.v2)?;
            let frame = t.frame(hit.uv);
            Some(Intersection::new(
                hit.t,
                hit.uv,
                frame,
                frame.z,
                lone_triangle_texcoord(hit.uv),
            ))
        }
    }
}

/// Whether `ray` hits element `e` of a shape.
///
/// Point and line sets use the same approximate or exact test as
/// [`intersect_element_nearest`].
pub fn intersect_element_any(shape: &Shape, e: usize, ray: &Ray) -> bool {
    match &shape.active().geometry {
        Geometry::PointSet(p) => point_hit(p, e, ray).is_some(),
        Geometry::LineSet(l) => line_hit(l, e, ray).is_some(),
        Geometry::TriangleMesh(m) => {
            let [p0, p1, p2] = m.triangle[e].map(|i| m.pos[i]);
            intersect_triangle(ray, &p0, &p1, &p2).is_some()
        }
        Geometry::Mesh(m) => {
            let [p0, p1, p2] = m.triangle_face(e).map(|i| m.pos[i]);
            intersect_triangle(ray, &p0, &p1, &p2).is_some()
        }
        Geometry::FaceMesh(m) => {
            let [p0, p1, p2] = m.position_face(e).map(|i| m.pos[i]);
            intersect_triangle(ray, &p0, &p1, &p2).is_some()
        }
        Geometry::Sphere(s) => intersect_sphere(ray, s).is_some(),
        Geometry::Cylinder(c) => intersect_cylinder(ray, c).is_some(),
        Geometry::Quad(q) => intersect_quad(ray, q).is_some(),
        Geometry::Triangle(t) => intersect_triangle(ray, &t.v0, &t.v1, &t.v2).is_some(),
    }
}

fn point_hit(points: &PointSet, e: usize, ray: &Ray) -> Option<SurfaceHit> {
    if points.approximate {
        intersect_point_disk(ray, &points.pos[e], points.radius_at(e))
    } else {
        intersect_sphere(ray, &Sphere::new(points.pos[e], points.radius_at(e)))
    }
}

fn point_nearest(points: &PointSet, e: usize, ray: &Ray) -> Option<Intersection> {
    let hit = point_hit(points, e, ray)?;
    let frame = if points.approximate {
        Frame3::from_zx(ray.at(hit.t), -ray.direction.normalize(), Vec3::x())
    } else {
        points.frame(e, hit.uv)
    };
    Some(Intersection::new(hit.t, hit.uv, frame, frame.z, points.texcoord_at(e)))
}

fn line_hit(lines: &LineSet, e: usize, ray: &Ray) -> Option<SurfaceHit> {
    let [a, b] = lines.line[e];
    if lines.approximate {
        intersect_segment_capsule(
            ray,
            &lines.pos[a],
            &lines.pos[b],
            lines.radius_at(a),
            lines.radius_at(b),
        )
    } else {
        let cylinder = Cylinder::new(lines.segment_radius(e), lines.segment_length(e));
        intersect_cylinder(&ray.to_local(&lines.cylinder_frame(e)), &cylinder)
    }
}

fn line_nearest(lines: &LineSet, e: usize, ray: &Ray) -> Option<Intersection> {
    let hit = line_hit(lines, e, ray)?;
    let (frame, s) = if lines.approximate {
        let [a, b] = lines.line[e];
        let frame = Frame3::from_zx(ray.at(hit.t), -ray.direction.normalize(), lines.pos[b] - lines.pos[a]);
        (frame, hit.uv.x)
    } else {
        (lines.frame(e, hit.uv), hit.uv.y)
    };
    Some(Intersection::new(hit.t, hit.uv, frame, frame.z, lines.texcoord_at(e, s)))
}

fn mesh_nearest(mesh: &Mesh, e: usize, ray: &Ray) -> Option<Intersection> {
    let f = mesh.triangle_face(e);
    let [p0, p1, p2] = f.map(|i| mesh.pos[i]);
    let hit = intersect_triangle(ray, &p0, &p1, &p2)?;
    let texcoord = if mesh.texcoord.is_empty() {
        default_element_texcoord(mesh.triangle.len(), e, hit.uv)
    } else {
        interpolate_texcoord(f.map(|i| mesh.texcoord[i]), hit.uv)
    };
    Some(Intersection::new(
        hit.t,
        hit.uv,
        mesh.frame(e, hit.uv),
        triangle_normal(&p0, &p1, &p2),
        texcoord,
    ))
}

fn face_mesh_nearest(mesh: &FaceMesh, e: usize, ray: &Ray) -> Option<Intersection> {
    let [p0, p1, p2] = mesh.position_face(e).map(|i| mesh.pos[i]);
    let hit = intersect_triangle(ray, &p0, &p1, &p2)?;
    let texcoord = if mesh.texcoord.is_empty() {
        default_element_texcoord(mesh.triangle.len(), e, hit.uv)
    } else {
        interpolate_texcoord(mesh.triangle_face(e).map(|c| mesh.texcoord[mesh.vertex[c][2]]), hit.uv)
    };
    Some(Intersection::new(
        hit.t,
        hit.uv,
        mesh.frame(e, hit.uv),
        triangle_normal(&p0, &p1, &p2),
        texcoord,
    ))
}

fn interpolate_texcoord(t: [Point2; 3], uv: Point2) -> Point2 {
    Point2::from(interpolate_barycentric(&t[0].coords, &t[1].coords, &t[2].coords, uv))
}

fn lone_triangle_texcoord(uv: Point2) -> Point2 {
    Point2::new(uv.y, 1.0 - uv.x - uv.y)
}

/// Texture coordinate of element `e` of a mesh without authored ones:
/// triangles map to the unit right triangle, quad halves to the halves of
/// the unit square.
fn default_element_texcoord(triangles: usize, e: usize, uv: Point2) -> Point2 {
    let corners = if e < triangles {
        [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)]
    } else if (e - triangles) % 2 == 0 {
        [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)]
    } else {
        [Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(0.0, 1.0)]
    };
    interpolate_texcoord(corners, uv)
}
