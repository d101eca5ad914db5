use glam::Vec3;

use crate::{Projection, ViewPose, clamp_pitch};

/// Camera circling a center point on a sphere of `radius`.
///
/// Angles are in degrees. Yaw 0 and pitch 0 put the eye on +Z of the center.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    center: Vec3,
    yaw: f32,
    pitch: f32,
    radius: f32,
    base_fov: f32,
    /// Degrees of rotation per pixel of drag.
    pub sensitivity: f32,
    pub projection: Projection,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 5.0)
    }
}

impl OrbitCamera {
    pub const MIN_RADIUS: f32 = 1.0;
    pub const MAX_RADIUS: f32 = 50.0;
    /// Fractional radius change per unit of scroll.
    pub const DOLLY_SPEED: f32 = 0.0025;

    pub fn new(center: Vec3, radius: f32) -> Self {
        let projection = Projection::default();
        Self {
            center,
            yaw: 0.0,
            pitch: 0.0,
            radius: radius.clamp(Self::MIN_RADIUS, Self::MAX_RADIUS),
            base_fov: projection.fov_degrees,
            sensitivity: 0.3,
            projection,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Rotate around the vertical axis only.
    pub fn pan(&mut self, degrees: f32) {
        self.yaw += degrees;
    }

    /// Drag-based rotation; `dy` is screen-space, so dragging up raises the eye.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = clamp_pitch(self.pitch - dy * self.sensitivity);
    }

    /// Scroll zoom: positive `delta_y` moves the eye away.
    pub fn dolly(&mut self, delta_y: f32) {
        self.radius = (self.radius * (1.0 + delta_y * Self::DOLLY_SPEED))
            .clamp(Self::MIN_RADIUS, Self::MAX_RADIUS);
        tracing::trace!(radius = self.radius, "dolly");
    }

    /// Translate eye and center together along the view direction.
    pub fn move_forward(&mut self, distance: f32) {
        let dir = (self.center - self.eye()).normalize_or_zero();
        self.center += dir * distance;
    }

    /// Scale the field of view relative to the one the camera started with.
    pub fn zoom(&mut self, scale: f32) {
        self.projection.fov_degrees = (self.base_fov * scale).clamp(1.0, 179.0);
    }
}

impl ViewPose for OrbitCamera {
    fn eye(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.center
            + self.radius
                * Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), yaw.cos() * pitch.cos())
    }

    fn target(&self) -> Vec3 {
        self.center
    }

    fn projection(&self) -> &Projection {
        &self.projection
    }
}
