//! Cameras: a first-person walker camera and an orbit camera.
//!
//! # Invariants
//! - Pitch is clamped to `[-PITCH_LIMIT, PITCH_LIMIT]` degrees in both modes.
//! - The look point (first-person) and eye (orbit) are derived state,
//!   recomputed on every change and never set directly.
//! - Camera motion lives outside the kernel; collision decides where the
//!   first-person eye may go and hands the result back.

mod camera;
mod orbit;
mod projection;

pub use camera::FirstPersonCamera;
pub use orbit::OrbitCamera;
pub use projection::Projection;

use glam::{Mat4, Vec3};

/// Largest pitch magnitude, in degrees, either camera accepts.
pub const PITCH_LIMIT: f32 = 80.0;

/// The look-at contract both camera modes expose to a renderer.
pub trait ViewPose {
    fn eye(&self) -> Vec3;

    /// Point the camera looks at.
    fn target(&self) -> Vec3;

    fn projection(&self) -> &Projection;

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target(), Vec3::Y)
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection().matrix()
    }

    fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

pub(crate) fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
}
