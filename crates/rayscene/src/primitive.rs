//! Primitives, primitive groups and scenes.

use crate::{Material, MaterialId, SceneError, Simulated};
use rayscene_anim::{AnimatedTransform, SkinnedShape};
use rayscene_math::{Frame3, Range1};
use rayscene_shape::Shape;

/// A shape placed by an animated transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedSurface {
    /// Shape in its own space.
    pub shape: Shape,
    /// Shape-to-primitive transform.
    pub transform: AnimatedTransform,
}

impl TransformedSurface {
    /// Wrap a shape and its transform.
    pub fn new(shape: Shape, transform: AnimatedTransform) -> Self {
        Self { shape, transform }
    }
}

/// A sequence of shapes shown one at a time.
///
/// Shape `i` is displayed for times nearest `i * frame_time`; there is no
/// blending between shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedSurface {
    shapes: Vec<Shape>,
    frame_time: f64,
}

impl InterpolatedSurface {
    /// Build from at least one shape.
    pub fn new(shapes: Vec<Shape>, frame_time: f64) -> Result<Self, SceneError> {
        if shapes.is_empty() {
            return Err(SceneError::NoShapes);
        }
        Ok(Self { shapes, frame_time })
    }

    /// The shapes in playback order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Seconds between consecutive shapes.
    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    /// Animated iff there is more than one shape.
    pub fn is_animated(&self) -> bool {
        self.shapes.len() > 1
    }

    /// `clamp(round(t / frame_time), 0, N - 1)`.
    pub fn shape_index(&self, t: f64) -> usize {
        let i = (t / self.frame_time).round();
        if i > 0.0 {
            (i as usize).min(self.shapes.len() - 1)
        } else {
            0
        }
    }

    /// Shape displayed at time `t`.
    pub fn shape_at(&self, t: f64) -> &Shape {
        &self.shapes[self.shape_index(t)]
    }

    /// `[0, (N - 1) * frame_time]`, or empty when not animated.
    pub fn animation_interval(&self) -> Range1 {
        if self.is_animated() {
            Range1::new(0.0, (self.shapes.len() - 1) as f64 * self.frame_time)
        } else {
            Range1::empty()
        }
    }
}

/// What a primitive is made of.
#[derive(Debug)]
pub enum PrimitiveKind {
    /// A single static shape.
    Surface(Shape),
    /// A shape under an animated transform.
    Transformed(TransformedSurface),
    /// One shape per animation frame.
    Interpolated(InterpolatedSurface),
    /// A rest shape deformed by a skeleton.
    Skinned(SkinnedShape),
    /// A particle system or cloth.
    Simulated(Simulated),
}

/// A placed scene object.
#[derive(Debug)]
pub struct Primitive {
    /// Primitive-to-world placement.
    pub frame: Frame3,
    /// Material copied into hits on this primitive.
    pub material: Option<MaterialId>,
    /// Geometry and animation.
    pub kind: PrimitiveKind,
}

impl Primitive {
    /// Primitive at the identity frame with no material.
    pub fn new(kind: impl Into<PrimitiveKind>) -> Self {
        Self {
            frame: Frame3::identity(),
            material: None,
            kind: kind.into(),
        }
    }

    /// Set the placement frame.
    pub fn with_frame(mut self, frame: Frame3) -> Self {
        self.frame = frame;
        self
    }

    /// Set the material.
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }
}

impl From<Shape> for PrimitiveKind {
    fn from(shape: Shape) -> Self {
        PrimitiveKind::Surface(shape)
    }
}

impl From<TransformedSurface> for PrimitiveKind {
    fn from(t: TransformedSurface) -> Self {
        PrimitiveKind::Transformed(t)
    }
}

impl From<InterpolatedSurface> for PrimitiveKind {
    fn from(i: InterpolatedSurface) -> Self {
        PrimitiveKind::Interpolated(i)
    }
}

impl From<SkinnedShape> for PrimitiveKind {
    fn from(s: SkinnedShape) -> Self {
        PrimitiveKind::Skinned(s)
    }
}

impl From<Simulated> for PrimitiveKind {
    fn from(s: Simulated) -> Self {
        PrimitiveKind::Simulated(s)
    }
}

/// Ordered list of primitives.
#[derive(Debug, Default)]
pub struct PrimitiveGroup {
    /// Primitives in query order.
    pub prims: Vec<Primitive>,
}

impl PrimitiveGroup {
    /// Group of the given primitives.
    pub fn new(prims: Vec<Primitive>) -> Self {
        Self { prims }
    }

    /// Append a primitive.
    pub fn push(&mut self, prim: Primitive) {
        self.prims.push(prim);
    }
}

/// Primitives plus the materials they reference.
#[derive(Debug, Default)]
pub struct Scene {
    materials: Vec<Material>,
    /// Scene primitives.
    pub prims: PrimitiveGroup,
}

impl Scene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return its id.
    pub fn add_material(&mut self, material: impl Into<Material>) -> MaterialId {
        self.materials.push(material.into());
        MaterialId(self.materials.len() - 1)
    }

    /// Material stored under `id`.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// All materials, indexed by id.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Append a primitive whose material, if any, is already in the scene.
    pub fn add_primitive(&mut self, prim: Primitive) -> Result<(), SceneError> {
        self.check_material(self.prims.prims.len(), &prim)?;
        self.prims.push(prim);
        Ok(())
    }

    /// Check that every primitive references an existing material.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (i, prim) in self.prims.prims.iter().enumerate() {
            self.check_material(i, prim)?;
        }
        Ok(())
    }

    fn check_material(&self, primitive: usize, prim: &Primitive) -> Result<(), SceneError> {
        match prim.material {
            Some(MaterialId(material)) if material >= self.materials.len() => {
                Err(SceneError::UnknownMaterial { primitive, material })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambert;
    use rayscene_shape::{Quad, Sphere};
    use rayscene_math::Point3;

    fn frames(n: usize) -> InterpolatedSurface {
        let shapes = (0..n).map(|i| Shape::from(Sphere::new(Point3::new(i as f64, 0.0, 0.0), 0.5))).collect();
        InterpolatedSurface::new(shapes, 0.5).unwrap()
    }

    #[test]
    fn test_shape_index_rounds_and_clamps() {
        let surface = frames(4);
        assert_eq!(surface.shape_index(-3.0), 0);
        assert_eq!(surface.shape_index(0.2), 0);
        assert_eq!(surface.shape_index(0.3), 1);
        assert_eq!(surface.shape_index(1.0), 2);
        assert_eq!(surface.shape_index(100.0), 3);
        assert_eq!(surface.animation_interval(), Range1::new(0.0, 1.5));
    }

    #[test]
    fn test_single_shape_is_static() {
        let surface = frames(1);
        assert!(!surface.is_animated());
        assert!(surface.animation_interval().is_empty());
        assert_eq!(surface.shape_index(7.0), 0);
        assert!(matches!(InterpolatedSurface::new(Vec::new(), 1.0), Err(SceneError::NoShapes)));
    }

    #[test]
    fn test_material_references_checked() {
        let mut scene = Scene::new();
        let id = scene.add_material(Lambert::default());
        assert_eq!(id, MaterialId(0));
        scene
            .add_primitive(Primitive::new(Shape::from(Quad::new(1.0, 1.0))).with_material(id))
            .unwrap();
        let err = scene
            .add_primitive(Primitive::new(Shape::from(Quad::new(1.0, 1.0))).with_material(MaterialId(3)))
            .unwrap_err();
        assert!(matches!(err, SceneError::UnknownMaterial { primitive: 1, material: 3 }));

        scene.prims.push(Primitive::new(Shape::from(Quad::new(1.0, 1.0))).with_material(MaterialId(9)));
        assert!(scene.validate().is_err());
    }
}
