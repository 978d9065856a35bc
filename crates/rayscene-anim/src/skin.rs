//! Bone hierarchies and linear blend skinning.

use crate::{AnimError, KeyframedValue};
use rayscene_math::{Frame3, Point3, Range1, Transform, Vec3};
use rayscene_shape::Shape;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A bone of a skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    /// Rest frame, relative to the parent's rest frame.
    pub frame_rest: Frame3,
    /// Euler rotation about the rest origin, in radians.
    pub rotation: Vec3,
    /// Rotation offset over time.
    pub anim_rotation: Option<KeyframedValue>,
    /// Parent bone; it must come earlier in the bone list.
    pub parent: Option<usize>,
}

impl Bone {
    /// Unanimated bone.
    pub fn new(frame_rest: Frame3, parent: Option<usize>) -> Self {
        Self {
            frame_rest,
            rotation: Vec3::zeros(),
            anim_rotation: None,
            parent,
        }
    }

    fn rotation_at(&self, t: f64) -> Vec3 {
        match &self.anim_rotation {
            Some(curve) => self.rotation + curve.value(t),
            None => self.rotation,
        }
    }
}

/// Bone influences on one vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneWeights {
    /// Bone indices.
    pub idx: Vec<usize>,
    /// Weight of each bone, expected to sum to one.
    pub weight: Vec<f64>,
}

impl BoneWeights {
    /// A vertex bound entirely to one bone.
    pub fn single(bone: usize) -> Self {
        Self {
            idx: vec![bone],
            weight: vec![1.0],
        }
    }

    fn blend_point(&self, p: &Point3, frames: &BoneFrames) -> Point3 {
        let mut acc = Vec3::zeros();
        for (&k, &w) in self.idx.iter().zip(&self.weight) {
            let local = frames.rest[k].transform_point_inverse(p);
            acc += frames.pose[k].transform_point(&local).coords * w;
        }
        Point3::from(acc)
    }

    fn blend_normal(&self, n: &Vec3, frames: &BoneFrames) -> Vec3 {
        let mut acc = Vec3::zeros();
        for (&k, &w) in self.idx.iter().zip(&self.weight) {
            let local = frames.rest[k].transform_vector_inverse(n);
            acc += frames.pose[k].transform_vector(&local) * w;
        }
        if acc.norm_squared() > 0.0 {
            acc.normalize()
        } else {
            *n
        }
    }
}

/// Per-bone frames in object space, indexed like the bones.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneFrames {
    /// Posed frames.
    pub pose: Vec<Frame3>,
    /// Rest frames.
    pub rest: Vec<Frame3>,
}

/// A bone list whose parents always precede their children.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    /// Check the parent order and wrap the bones.
    pub fn new(bones: Vec<Bone>) -> Result<Self, AnimError> {
        for (bone, b) in bones.iter().enumerate() {
            if let Some(parent) = b.parent {
                if parent >= bone {
                    return Err(AnimError::BoneOrder { bone, parent });
                }
            }
        }
        Ok(Self { bones })
    }

    /// The bones in evaluation order.
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Number of bones.
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// Whether the skeleton has no bones.
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Whether any bone has a rotation curve.
    pub fn is_animated(&self) -> bool {
        self.bones.iter().any(|b| b.anim_rotation.is_some())
    }

    /// Union of the bone rotation curve intervals.
    pub fn animation_interval(&self) -> Range1 {
        self.bones
            .iter()
            .filter_map(|b| b.anim_rotation.as_ref())
            .fold(Range1::empty(), |acc, curve| acc.union(&curve.interval()))
    }

    /// Pose and rest frames of every bone at time `t`, composed down the
    /// parent chain in a single forward pass.
    pub fn bone_frames(&self, t: f64) -> BoneFrames {
        let mut pose: Vec<Frame3> = Vec::with_capacity(self.bones.len());
        let mut rest: Vec<Frame3> = Vec::with_capacity(self.bones.len());
        for bone in &self.bones {
            let mut local = bone.frame_rest;
            local.o = Point3::origin();
            let m = Transform::euler_zyx(&bone.frame_rest.o.coords, &bone.rotation_at(t), &Vec3::repeat(1.0));
            let local = m.apply_frame(&local);
            match bone.parent {
                Some(parent) => {
                    pose.push(pose[parent].transform_frame(&local));
                    rest.push(rest[parent].transform_frame(&bone.frame_rest));
                }
                None => {
                    pose.push(local);
                    rest.push(bone.frame_rest);
                }
            }
        }
        BoneFrames { pose, rest }
    }
}

/// A rest shape deformed by a skeleton, with the posed result cached by
/// time.
#[derive(Debug, Clone)]
pub struct SkinnedShape {
    rest: Shape,
    skeleton: Skeleton,
    weights: Vec<BoneWeights>,
    frames: BoneFrames,
    posed: Shape,
    posed_time: f64,
}

impl SkinnedShape {
    /// Validate the weights against the rest shape and skeleton, and pose
    /// the shape at time zero.
    ///
    /// The initial pose makes [`SkinnedShape::posed`] valid for time-less
    /// queries on an unanimated skeleton whose bones carry a static
    /// rotation. Later poses are computed only by
    /// [`SkinnedShape::update_pose`], and only when the time changes.
    pub fn new(rest: Shape, skeleton: Skeleton, weights: Vec<BoneWeights>) -> Result<Self, AnimError> {
        let vertices = rest.positions().len();
        if weights.len() != vertices {
            return Err(AnimError::VertexCount {
                vertices,
                weights: weights.len(),
            });
        }
        for (vertex, w) in weights.iter().enumerate() {
            if w.idx.len() != w.weight.len() {
                return Err(AnimError::WeightLength {
                    vertex,
                    indices: w.idx.len(),
                    weights: w.weight.len(),
                });
            }
            if let Some(&bone) = w.idx.iter().find(|&&b| b >= skeleton.len()) {
                return Err(AnimError::MissingBone { vertex, bone });
            }
            let sum: f64 = w.weight.iter().sum();
            if (sum - 1.0).abs() > 1e-4 {
                log::warn!("weights of vertex {vertex} sum to {sum}");
            }
        }

        let frames = skeleton.bone_frames(0.0);
        let posed = Shape::new(rest.geometry.clone());
        let mut skinned = Self {
            rest,
            skeleton,
            weights,
            frames,
            posed,
            posed_time: 0.0,
        };
        skinned.apply_pose();
        Ok(skinned)
    }

    /// Undeformed shape.
    pub fn rest(&self) -> &Shape {
        &self.rest
    }

    /// The skeleton.
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Per-vertex bone weights.
    pub fn weights(&self) -> &[BoneWeights] {
        &self.weights
    }

    /// Shape posed at [`SkinnedShape::posed_time`].
    pub fn posed(&self) -> &Shape {
        &self.posed
    }

    /// Time the cached pose was computed for.
    pub fn posed_time(&self) -> f64 {
        self.posed_time
    }

    /// Bone frames at the cached time.
    pub fn bone_frames(&self) -> &BoneFrames {
        &self.frames
    }

    /// Whether any bone is animated.
    pub fn is_animated(&self) -> bool {
        self.skeleton.is_animated()
    }

    /// Union of the bone animation intervals.
    pub fn animation_interval(&self) -> Range1 {
        self.skeleton.animation_interval()
    }

    /// Pose the shape at time `t`; a no-op when the cache is already at `t`.
    pub fn update_pose(&mut self, t: f64) {
        if t == self.posed_time {
            return;
        }
        self.posed_time = t;
        self.frames = self.skeleton.bone_frames(t);
        self.apply_pose();
    }

    fn apply_pose(&mut self) {
        let positions = skin_points(self.rest.positions(), &self.weights, &self.frames);
        self.posed.positions_mut().copy_from_slice(&positions);
        if !self.rest.normals().is_empty() {
            let normals = skin_normals(self.rest.normals(), &self.weights, &self.frames);
            self.posed.normals_mut().copy_from_slice(&normals);
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn skin_points(rest: &[Point3], weights: &[BoneWeights], frames: &BoneFrames) -> Vec<Point3> {
    rest.iter().zip(weights).map(|(p, w)| w.blend_point(p, frames)).collect()
}

#[cfg(feature = "parallel")]
fn skin_points(rest: &[Point3], weights: &[BoneWeights], frames: &BoneFrames) -> Vec<Point3> {
    rest.par_iter()
        .zip(weights.par_iter())
        .map(|(p, w)| w.blend_point(p, frames))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn skin_normals(rest: &[Vec3], weights: &[BoneWeights], frames: &BoneFrames) -> Vec<Vec3> {
    rest.iter().zip(weights).map(|(n, w)| w.blend_normal(n, frames)).collect()
}

#[cfg(feature = "parallel")]
fn skin_normals(rest: &[Vec3], weights: &[BoneWeights], frames: &BoneFrames) -> Vec<Vec3> {
    rest.par_iter()
        .zip(weights.par_iter())
        .map(|(n, w)| w.blend_normal(n, frames))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rayscene_shape::TriangleMesh;
    use std::f64::consts::PI;

    fn arm() -> Vec<Bone> {
        vec![
            Bone::new(Frame3::from_origin(Point3::new(0.0, 0.0, 0.0)), None),
            Bone::new(Frame3::from_origin(Point3::new(1.0, 0.0, 0.0)), Some(0)),
            Bone::new(Frame3::from_zx(Point3::new(1.0, 0.0, 0.0), Vec3::x(), Vec3::y()), Some(1)),
        ]
    }

    fn strip() -> Shape {
        TriangleMesh {
            pos: vec![
                Point3::new(0.5, 0.0, 0.0),
                Point3::new(1.5, 0.0, 0.0),
                Point3::new(2.5, 0.0, 0.0),
            ],
            norm: vec![Vec3::z(); 3],
            triangle: vec![[0, 1, 2]],
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_parent_must_precede_child() {
        let mut bones = arm();
        bones[1].parent = Some(2);
        assert_eq!(Skeleton::new(bones), Err(AnimError::BoneOrder { bone: 1, parent: 2 }));
        let mut bones = arm();
        bones[0].parent = Some(0);
        assert!(Skeleton::new(bones).is_err());
    }

    #[test]
    fn test_unanimated_pose_equals_rest() {
        let mut bones = arm();
        bones[1].anim_rotation = Some(KeyframedValue::linear(&[(0.0, Vec3::zeros()), (1.0, Vec3::zeros())]).unwrap());
        let skeleton = Skeleton::new(bones).unwrap();
        let frames = skeleton.bone_frames(0.5);
        for (pose, rest) in frames.pose.iter().zip(&frames.rest) {
            assert_relative_eq!(pose.o, rest.o, epsilon = 1e-12);
            assert_relative_eq!(pose.x, rest.x, epsilon = 1e-12);
            assert_relative_eq!(pose.y, rest.y, epsilon = 1e-12);
            assert_relative_eq!(pose.z, rest.z, epsilon = 1e-12);
        }
        // Rest frames compose down the chain.
        assert_relative_eq!(frames.rest[2].o, Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_propagates_to_children() {
        let mut bones = arm();
        bones[0].rotation = Vec3::new(0.0, 0.0, PI / 2.0);
        let frames = Skeleton::new(bones).unwrap().bone_frames(0.0);
        assert_relative_eq!(frames.pose[1].o, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(frames.pose[2].o, Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_skinning_follows_bones() {
        let mut bones = arm();
        bones[1].anim_rotation =
            Some(KeyframedValue::linear(&[(0.0, Vec3::zeros()), (1.0, Vec3::new(0.0, 0.0, PI))]).unwrap());
        let skeleton = Skeleton::new(bones).unwrap();
        let weights = vec![
            BoneWeights::single(0),
            BoneWeights::single(1),
            BoneWeights {
                idx: vec![1, 2],
                weight: vec![0.5, 0.5],
            },
        ];
        let mut skinned = SkinnedShape::new(strip(), skeleton, weights).unwrap();
        // At time zero nothing moves.
        assert_eq!(skinned.posed().positions(), skinned.rest().positions());

        skinned.update_pose(0.5);
        assert_eq!(skinned.posed_time(), 0.5);
        let posed = skinned.posed().positions();
        assert_relative_eq!(posed[0], Point3::new(0.5, 0.0, 0.0), epsilon = 1e-12);
        // Quarter turn of bone 1 about its origin at x = 1.
        assert_relative_eq!(posed[1], Point3::new(1.0, 0.5, 0.0), epsilon = 1e-9);
        assert_relative_eq!(posed[2], Point3::new(1.0, 1.5, 0.0), epsilon = 1e-9);
        for n in skinned.posed().normals() {
            assert_relative_eq!(*n, Vec3::z(), epsilon = 1e-9);
        }
        // Rest shape is untouched.
        assert_eq!(skinned.rest().positions()[2], Point3::new(2.5, 0.0, 0.0));
    }

    #[test]
    fn test_static_rotation_posed_on_construction() {
        let mut bones = arm();
        bones[1].rotation = Vec3::new(0.0, 0.0, PI / 2.0);
        let skeleton = Skeleton::new(bones).unwrap();
        assert!(!skeleton.is_animated());
        let weights = vec![BoneWeights::single(0), BoneWeights::single(1), BoneWeights::single(1)];
        let mut skinned = SkinnedShape::new(strip(), skeleton, weights).unwrap();
        assert_eq!(skinned.posed_time(), 0.0);
        assert_relative_eq!(skinned.posed().positions()[2], Point3::new(1.0, 1.5, 0.0), epsilon = 1e-9);

        let cached = skinned.posed().clone();
        skinned.update_pose(0.0);
        assert_eq!(skinned.posed(), &cached);
    }

    #[test]
    fn test_weight_validation() {
        let skeleton = Skeleton::new(arm()).unwrap();
        let err = SkinnedShape::new(strip(), skeleton.clone(), vec![BoneWeights::single(0); 2]).unwrap_err();
        assert_eq!(err, AnimError::VertexCount { vertices: 3, weights: 2 });
        let err = SkinnedShape::new(strip(), skeleton.clone(), vec![BoneWeights::single(7); 3]).unwrap_err();
        assert_eq!(err, AnimError::MissingBone { vertex: 0, bone: 7 });
        let bad = BoneWeights {
            idx: vec![0, 1],
            weight: vec![1.0],
        };
        let err = SkinnedShape::new(strip(), skeleton, vec![bad; 3]).unwrap_err();
        assert_eq!(
            err,
            AnimError::WeightLength {
                vertex: 0,
                indices: 2,
                weights: 1
            }
        );
    }
}
