//! Scene description as plain data.
//!
//! A drawable part is a [`ShapeKind`] tag with a transform and a surface. Parts
//! that hang off one another (a rig's limbs, the shrine's beacon) live on a
//! [`JointTree`]; world transforms come from composing joint locals from the
//! root down, with a [`TransformStack`] carrying the running product.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::surface::Surface;

/// A handle referencing an uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

/// What geometry a primitive uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Box spanning `[-1, 1]` on every axis before transform.
    Cube,
    Cylinder { segments: u16 },
    Sphere { stacks: u16, slices: u16 },
    Mesh(MeshHandle),
}

/// One drawable part with its world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub kind: ShapeKind,
    pub transform: Mat4,
    pub surface: Surface,
}

impl Primitive {
    /// Center and half extents of an axis-aligned cube primitive.
    ///
    /// `None` for other shapes or when the transform is not finite.
    pub fn as_unit_volume(&self) -> Option<(Vec3, Vec3)> {
        if self.kind != ShapeKind::Cube || !self.transform.is_finite() {
            return None;
        }
        let (scale, _, translation) = self.transform.to_scale_rotation_translation();
        Some((translation, scale))
    }
}

/// Explicit push/pop stack of composed matrices.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
        }
    }

    pub fn current(&self) -> Mat4 {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Save the current matrix.
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the last saved matrix. Popping an empty stack resets to identity.
    pub fn pop(&mut self) {
        self.current = self.saved.pop().unwrap_or(Mat4::IDENTITY);
    }

    /// Post-multiply: `m` applies in the current local frame.
    pub fn apply(&mut self, m: Mat4) {
        self.current *= m;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.apply(Mat4::from_translation(offset));
    }

    pub fn scale(&mut self, scale: Vec3) {
        self.apply(Mat4::from_scale(scale));
    }

    pub fn rotate_y(&mut self, degrees: f32) {
        self.apply(Mat4::from_rotation_y(degrees.to_radians()));
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("joint {0:?} does not exist")]
    UnknownJoint(JointId),
    #[error("joint name {0:?} is already taken")]
    DuplicateName(String),
}

/// Index of a joint within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(usize);

/// Shape hung on a joint, offset by `local` from the joint frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Attachment {
    kind: ShapeKind,
    local: Mat4,
    surface: Surface,
}

/// A named frame in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    pub parent: Option<JointId>,
    /// Transform relative to the parent joint.
    pub local: Mat4,
    attachment: Option<Attachment>,
    children: Vec<JointId>,
}

/// Tree of named joints; children inherit their parent's frame.
#[derive(Debug, Clone, Default)]
pub struct JointTree {
    joints: Vec<Joint>,
}

impl JointTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<JointId> {
        self.joints.iter().position(|j| j.name == name).map(JointId)
    }

    pub fn add_root(&mut self, name: &str, local: Mat4) -> Result<JointId, SceneError> {
        self.insert(name, None, local)
    }

    pub fn add_child(
        &mut self,
        parent: JointId,
        name: &str,
        local: Mat4,
    ) -> Result<JointId, SceneError> {
        if parent.0 >= self.joints.len() {
            return Err(SceneError::UnknownJoint(parent));
        }
        let id = self.insert(name, Some(parent), local)?;
        self.joints[parent.0].children.push(id);
        Ok(id)
    }

    fn insert(
        &mut self,
        name: &str,
        parent: Option<JointId>,
        local: Mat4,
    ) -> Result<JointId, SceneError> {
        if self.find(name).is_some() {
            return Err(SceneError::DuplicateName(name.to_string()));
        }
        let id = JointId(self.joints.len());
        self.joints.push(Joint {
            name: name.to_string(),
            parent,
            local,
            attachment: None,
            children: Vec::new(),
        });
        Ok(id)
    }

    /// Hang a shape on a joint, replacing any previous one.
    pub fn attach(
        &mut self,
        joint: JointId,
        kind: ShapeKind,
        local: Mat4,
        surface: Surface,
    ) -> Result<(), SceneError> {
        let j = self
            .joints
            .get_mut(joint.0)
            .ok_or(SceneError::UnknownJoint(joint))?;
        j.attachment = Some(Attachment {
            kind,
            local,
            surface,
        });
        Ok(())
    }

    /// Replace a joint's local transform (the animation entry point).
    pub fn set_local(&mut self, joint: JointId, local: Mat4) -> Result<(), SceneError> {
        let j = self
            .joints
            .get_mut(joint.0)
            .ok_or(SceneError::UnknownJoint(joint))?;
        j.local = local;
        Ok(())
    }

    /// World transform of a joint frame, composed from its root.
    pub fn world_transform(&self, joint: JointId) -> Option<Mat4> {
        let mut j = self.joints.get(joint.0)?;
        let mut m = j.local;
        while let Some(parent) = j.parent {
            j = &self.joints[parent.0];
            m = j.local * m;
        }
        Some(m)
    }

    /// Every attached shape with its composed world transform, depth first.
    pub fn primitives(&self) -> Vec<Primitive> {
        let mut stack = TransformStack::new();
        let mut out = Vec::new();
        for (i, joint) in self.joints.iter().enumerate() {
            if joint.parent.is_none() {
                self.collect(JointId(i), &mut stack, &mut out);
            }
        }
        out
    }

    fn collect(&self, id: JointId, stack: &mut TransformStack, out: &mut Vec<Primitive>) {
        let joint = &self.joints[id.0];
        stack.push();
        stack.apply(joint.local);
        if let Some(att) = &joint.attachment {
            out.push(Primitive {
                kind: att.kind,
                transform: stack.current() * att.local,
                surface: att.surface,
            });
        }
        for &child in &joint.children {
            self.collect(child, stack, out);
        }
        stack.pop();
    }
}
