use crate::foundation::core::{Axis, AxisArray, BoneIdx, InvertAxis};
use crate::foundation::error::{CemError, CemResult};
use glam::{DMat4, DQuat, DVec3, EulerRot};
use std::collections::HashMap;

const MODEL_ROOT_NAME: &str = "<model-root>";

/// Rest transform captured at load time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BaseTransform {
    /// Parent-relative position, scene units.
    pub position: DVec3,
    /// Euler XYZ rotation, radians.
    pub rotation: DVec3,
    /// Per-axis scale.
    pub scale: DVec3,
    /// Rest visibility.
    pub visible: bool,
}

impl Default for BaseTransform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
            visible: true,
        }
    }
}

/// Coordinate frame of an absolute translation channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AbsoluteSpace {
    /// Relative to the model root.
    #[default]
    Entity,
    /// Relative to the bone's parent.
    Local,
}

/// Per-bone calibration derived by the normalizer. Stable for the model's lifetime.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Calibration {
    /// Axes whose `t?` value is an absolute position rather than an offset from rest.
    pub translation_absolute: AxisArray<bool>,
    /// Frame of each absolute translation axis.
    pub translation_space: AxisArray<AbsoluteSpace>,
    /// Baseline subtracted from additive translation values, pixels.
    pub translation_offset_px: AxisArray<f64>,
    /// Axes whose `r?` value replaces the rest rotation.
    pub rotation_absolute: AxisArray<bool>,
    /// Baseline subtracted from rotation values, radians.
    pub rotation_offset: AxisArray<f64>,
    /// Entity-space Y origin for rotation-point style `ty` (24 px in CEM).
    pub cem_y_origin: Option<f64>,
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// Box spanning two opposite corners, in any order.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing both.
    pub fn union(self, other: Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Extent along each axis.
    pub fn size(self) -> DVec3 {
        self.max - self.min
    }

    /// Product of the extents.
    pub fn volume(self) -> f64 {
        let s = self.size();
        s.x * s.y * s.z
    }

    /// Midpoint of the box.
    pub fn center(self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    fn corners(self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }

    fn transformed(self, m: &DMat4) -> Aabb {
        let c = self.corners();
        let mut out = Aabb::new(m.transform_point3(c[0]), m.transform_point3(c[0]));
        for p in &c[1..] {
            let q = m.transform_point3(*p);
            out.min = out.min.min(q);
            out.max = out.max.max(q);
        }
        out
    }
}

/// Loader-supplied description of one bone.
#[derive(Clone, Debug, Default)]
pub struct BoneSpec {
    /// Unique bone name.
    pub name: String,
    /// Parent bone name; `None` attaches to the model root.
    pub parent: Option<String>,
    /// Rest transform.
    pub base: BaseTransform,
    /// JEM `invertAxis`.
    pub invert_axis: InvertAxis,
    /// Entity-space pivot in CEM pixels, when the loader knows it.
    pub origin_px: Option<DVec3>,
    /// Local renderable boxes, scene units.
    pub boxes: Vec<Aabb>,
}

/// One node of the skeleton.
#[derive(Clone, Debug)]
pub struct Bone {
    /// Bone name.
    pub name: String,
    /// Parent node; `None` only for the model root.
    pub parent: Option<BoneIdx>,
    /// Child nodes in insertion order.
    pub children: Vec<BoneIdx>,
    /// Current parent-relative position, scene units.
    pub position: DVec3,
    /// Current Euler XYZ rotation, radians.
    pub rotation: DVec3,
    /// Current scale.
    pub scale: DVec3,
    /// Whether the bone and its subtree render.
    pub visible: bool,
    /// Whether this bone's own boxes render.
    pub boxes_visible: bool,
    /// Rest transform.
    pub base: BaseTransform,
    /// JEM `invertAxis`.
    pub invert_axis: InvertAxis,
    /// Loader-supplied entity-space pivot, CEM pixels.
    pub origin_px: Option<DVec3>,
    /// Local renderable boxes, scene units.
    pub boxes: Vec<Aabb>,
    /// Normalizer output.
    pub calibration: Calibration,
    world: DMat4,
}

impl Bone {
    fn new(name: String, parent: Option<BoneIdx>, base: BaseTransform) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            position: base.position,
            rotation: base.rotation,
            scale: base.scale,
            visible: base.visible,
            boxes_visible: true,
            base,
            invert_axis: InvertAxis::default(),
            origin_px: None,
            boxes: Vec::new(),
            calibration: Calibration::default(),
            world: DMat4::IDENTITY,
        }
    }

    /// True when the bone carries boxes of its own.
    pub fn has_geometry(&self) -> bool {
        !self.boxes.is_empty()
    }

    /// Sign that maps a CEM value on `axis` into scene space.
    pub fn sign(&self, axis: Axis) -> f64 {
        self.invert_axis.sign(axis)
    }

    /// Restore the base transform and visibility.
    pub fn reset_to_base(&mut self) {
        self.position = self.base.position;
        self.rotation = self.base.rotation;
        self.scale = self.base.scale;
        self.visible = self.base.visible;
        self.boxes_visible = true;
    }

    /// Parent-relative transform from the current pose.
    pub fn local_matrix(&self) -> DMat4 {
        let q = DQuat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        DMat4::from_scale_rotation_translation(self.scale, q, self.position)
    }

    /// World matrix as of the last [`Skeleton::update_world_matrices`].
    pub fn world_matrix(&self) -> DMat4 {
        self.world
    }
}

/// Rooted bone tree. Node 0 is the model root; parents always precede their children.
#[derive(Clone, Debug)]
pub struct Skeleton {
    bones: Vec<Bone>,
    by_name: HashMap<String, BoneIdx>,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}

impl Skeleton {
    /// Skeleton holding only the model root.
    pub fn new() -> Self {
        Self {
            bones: vec![Bone::new(
                MODEL_ROOT_NAME.to_owned(),
                None,
                BaseTransform::default(),
            )],
            by_name: HashMap::new(),
        }
    }

    /// Add a bone under its named parent (or the model root).
    pub fn add_bone(&mut self, spec: BoneSpec) -> CemResult<BoneIdx> {
        if spec.name.is_empty() {
            return Err(CemError::validation("bone name must not be empty"));
        }
        if self.by_name.contains_key(&spec.name) {
            return Err(CemError::validation(format!(
                "duplicate bone name '{}'",
                spec.name
            )));
        }
        let parent = match &spec.parent {
            None => BoneIdx::ROOT,
            Some(p) => self.find(p).ok_or_else(|| {
                CemError::validation(format!(
                    "bone '{}' references unknown parent '{p}'",
                    spec.name
                ))
            })?,
        };
        let idx = BoneIdx(
            u32::try_from(self.bones.len())
                .map_err(|_| CemError::validation("too many bones"))?,
        );
        let mut bone = Bone::new(spec.name.clone(), Some(parent), spec.base);
        bone.invert_axis = spec.invert_axis;
        bone.origin_px = spec.origin_px;
        bone.boxes = spec.boxes;
        self.bones.push(bone);
        self.bones[parent.index()].children.push(idx);
        self.by_name.insert(spec.name, idx);
        Ok(idx)
    }

    /// The synthetic model root.
    pub fn root(&self) -> BoneIdx {
        BoneIdx::ROOT
    }

    /// Index of the bone called `name`.
    pub fn find(&self, name: &str) -> Option<BoneIdx> {
        self.by_name.get(name).copied()
    }

    /// Bone at `idx`.
    pub fn bone(&self, idx: BoneIdx) -> &Bone {
        &self.bones[idx.index()]
    }

    /// Mutable bone at `idx`.
    pub fn bone_mut(&mut self, idx: BoneIdx) -> &mut Bone {
        &mut self.bones[idx.index()]
    }

    /// Bone called `name`.
    pub fn get(&self, name: &str) -> Option<&Bone> {
        self.find(name).map(|i| self.bone(i))
    }

    /// Named bones (model root excluded), parents first.
    pub fn bones(&self) -> impl Iterator<Item = (BoneIdx, &Bone)> {
        self.bones
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, b)| (BoneIdx(i as u32), b))
    }

    /// Number of named bones.
    pub fn len(&self) -> usize {
        self.bones.len() - 1
    }

    /// True when no named bone exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for bones attached directly to the model root.
    pub fn is_root_child(&self, idx: BoneIdx) -> bool {
        self.bone(idx).parent == Some(BoneIdx::ROOT)
    }

    /// Every bone below `idx`, depth first.
    pub fn descendants(&self, idx: BoneIdx) -> Vec<BoneIdx> {
        let mut out = Vec::new();
        let mut stack: Vec<BoneIdx> = self.bone(idx).children.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            out.push(i);
            stack.extend(self.bone(i).children.iter().rev().copied());
        }
        out
    }

    /// Rest position relative to the model root, in pixels (scene orientation).
    pub fn root_relative_px(&self, idx: BoneIdx, ppu: f64) -> DVec3 {
        let mut acc = DVec3::ZERO;
        let mut cur = Some(idx);
        while let Some(i) = cur {
            if i == BoneIdx::ROOT {
                break;
            }
            let b = self.bone(i);
            acc += b.base.position;
            cur = b.parent;
        }
        acc * ppu
    }

    /// Entity-space pivot in CEM pixels: the loader's `origin_px`, else the rest
    /// root-relative position with `invertAxis` applied.
    pub fn origin_px(&self, idx: BoneIdx, ppu: f64) -> DVec3 {
        let bone = self.bone(idx);
        if let Some(o) = bone.origin_px {
            return o;
        }
        let rel = self.root_relative_px(idx, ppu);
        DVec3::new(
            rel.x * bone.sign(Axis::X),
            rel.y * bone.sign(Axis::Y),
            rel.z * bone.sign(Axis::Z),
        )
    }

    /// Reset every node, model root included, to its rest transform.
    pub fn reset_to_rest(&mut self) {
        for b in &mut self.bones {
            b.reset_to_base();
        }
    }

    /// Recompute world matrices from the current local poses.
    pub fn update_world_matrices(&mut self) {
        for i in 0..self.bones.len() {
            let local = self.bones[i].local_matrix();
            let world = match self.bones[i].parent {
                Some(p) => self.bones[p.index()].world * local,
                None => local,
            };
            self.bones[i].world = world;
        }
    }

    /// World-space origin of the bone.
    pub fn world_position(&self, idx: BoneIdx) -> DVec3 {
        self.bone(idx).world.transform_point3(DVec3::ZERO)
    }

    /// Posed world bounds of the bone's own boxes.
    pub fn world_bounds(&self, idx: BoneIdx) -> Option<Aabb> {
        let bone = self.bone(idx);
        bone.boxes
            .iter()
            .map(|b| b.transformed(&bone.world))
            .reduce(Aabb::union)
    }

    /// Drop every bone; the model root remains.
    pub fn clear(&mut self) {
        self.bones.truncate(1);
        self.bones[0].children.clear();
        self.by_name.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/skeleton.rs"]
mod tests;
