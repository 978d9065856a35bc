//! Intervals and axis-aligned bounding boxes.

use crate::{Frame3, Point3, Vec3};

/// A closed interval `[min, max]`; empty when `min > max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range1 {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Range1 {
    /// Interval from its bounds.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The empty interval, neutral for [`Range1::union`].
    pub fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Whether the interval contains no value.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Smallest interval containing both.
    pub fn union(&self, other: &Range1) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Whether `v` lies in the interval.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

impl Default for Range1 {
    fn default() -> Self {
        Self::empty()
    }
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Range3 {
    /// Create a box from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) box suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut range = Self::empty();
        for p in points {
            range.grow(p);
        }
        range
    }

    /// Box of a sphere.
    pub fn from_sphere(center: &Point3, radius: f64) -> Self {
        let r = Vec3::repeat(radius);
        Self::new(center - r, center + r)
    }

    /// Whether the box contains no point.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this box to include a point.
    pub fn grow(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Range3) -> Self {
        let mut out = *self;
        if !other.is_empty() {
            out.grow(&other.min);
            out.grow(&other.max);
        }
        out
    }

    /// Whether `p` lies inside or on the box, with slack `tol`.
    pub fn contains(&self, p: &Point3, tol: f64) -> bool {
        p.x >= self.min.x - tol
            && p.y >= self.min.y - tol
            && p.z >= self.min.z - tol
            && p.x <= self.max.x + tol
            && p.y <= self.max.y + tol
            && p.z <= self.max.z + tol
    }

    /// Edge lengths.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Midpoint.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// The eight corners.
    pub fn corners(&self) -> [Point3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// Box of this box's corners mapped through `frame`.
    pub fn in_frame(&self, frame: &Frame3) -> Self {
        if self.is_empty() {
            return *self;
        }
        let mut out = Self::empty();
        for c in self.corners() {
            out.grow(&frame.transform_point(&c));
        }
        out
    }
}

impl Default for Range3 {
    fn default() -> Self {
        Self::empty()
    }
}
