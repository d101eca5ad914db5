use glam::{Vec2, Vec3};

use crate::{Projection, ViewPose, clamp_pitch};

/// First-person camera driven by yaw and pitch in degrees.
///
/// Yaw 0 looks down +X; increasing yaw turns toward +Z. The look point is
/// always `eye + forward()`, computed on demand so it can never go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonCamera {
    eye: Vec3,
    yaw: f32,
    pitch: f32,
    pub projection: Projection,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new(Vec3::new(2.5, 1.6, 2.5), 0.0, 0.0)
    }
}

impl FirstPersonCamera {
    pub fn new(eye: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            eye,
            yaw,
            pitch: clamp_pitch(pitch),
            projection: Projection::default(),
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Move the eye. Collision resolution is the caller's job.
    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
    }

    /// Unit view direction from yaw and pitch.
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(pitch.cos() * yaw.cos(), pitch.sin(), pitch.cos() * yaw.sin())
    }

    pub fn look_point(&self) -> Vec3 {
        self.eye + self.forward()
    }

    pub fn pan_left(&mut self, degrees: f32) {
        self.yaw += degrees;
    }

    pub fn pan_right(&mut self, degrees: f32) {
        self.yaw -= degrees;
    }

    pub fn pan_up(&mut self, degrees: f32) {
        self.pitch = clamp_pitch(self.pitch + degrees);
    }

    pub fn pan_down(&mut self, degrees: f32) {
        self.pitch = clamp_pitch(self.pitch - degrees);
    }

    /// Horizontal walking basis `(forward, right)` on the XZ plane, with
    /// `right = (-forward.z, forward.x)`.
    pub fn planar_basis(&self) -> (Vec2, Vec2) {
        let f = self.forward();
        let planar = Vec2::new(f.x, f.z);
        let len = planar.length();
        let forward = if len > 0.0 { planar / len } else { planar };
        (forward, Vec2::new(-forward.y, forward.x))
    }
}

impl ViewPose for FirstPersonCamera {
    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn target(&self) -> Vec3 {
        self.look_point()
    }

    fn projection(&self) -> &Projection {
        &self.projection
    }
}
