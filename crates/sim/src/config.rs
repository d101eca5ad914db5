use std::path::Path;

use blockyard_cull::VisibilitySelector;
use blockyard_input::InputConfig;
use blockyard_kernel::{CarveParams, CollisionParams, GoalDetector};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where and how the walker starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartPose {
    pub eye: Vec3,
    /// Degrees.
    pub yaw: f32,
    /// Degrees, clamped by the camera.
    pub pitch: f32,
}

impl Default for StartPose {
    fn default() -> Self {
        Self {
            eye: Vec3::new(2.5, 1.6, 2.5),
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

/// Session tunables. Every field has a default, so a config file only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Cells farther than this from the eye are not drawn.
    pub render_radius: f32,
    /// Walking distance per frame, in cells.
    pub move_speed: f32,
    /// Degrees turned per frame while a turn key is held.
    pub turn_speed: f32,
    /// Distance from the goal center that counts as arriving.
    pub goal_threshold: f32,
    /// Orbit camera travel per W/S press.
    pub orbit_move_speed: f32,
    /// Orbit camera swing per A/D press, in degrees.
    pub orbit_pan_step: f32,
    pub start: StartPose,
    pub collision: CollisionParams,
    pub carve: CarveParams,
    pub input: InputConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            render_radius: VisibilitySelector::DEFAULT_RADIUS,
            move_speed: 0.16,
            turn_speed: 2.5,
            goal_threshold: GoalDetector::DEFAULT_THRESHOLD,
            orbit_move_speed: 0.2,
            orbit_pan_step: 5.0,
            start: StartPose::default(),
            collision: CollisionParams::default(),
            carve: CarveParams::default(),
            input: InputConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the collision model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let radius = self.collision.agent_radius;
        if !(radius > 0.0 && radius < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "agent_radius must be in (0, 0.5), got {radius}"
            )));
        }
        // A step longer than the gap between footprint edges could skip a cell.
        let max_step = 1.0 - 2.0 * radius;
        if !(self.move_speed >= 0.0 && self.move_speed <= max_step) {
            return Err(ConfigError::Invalid(format!(
                "move_speed must be in [0, {max_step}], got {}",
                self.move_speed
            )));
        }
        // Both feed `f32::clamp`, which panics on an inverted or NaN range.
        let margin = self.collision.boundary_margin;
        if !(margin >= 0.0 && margin < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "boundary_margin must be in [0, 0.5), got {margin}"
            )));
        }
        let step = self.input.max_drag_step;
        if !(step.is_finite() && step >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_drag_step must be finite and non-negative, got {step}"
            )));
        }
        if !self.input.drag_sensitivity.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "drag_sensitivity must be finite, got {}",
                self.input.drag_sensitivity
            )));
        }
        if !(self.render_radius >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "render_radius must be non-negative, got {}",
                self.render_radius
            )));
        }
        if !(self.goal_threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "goal_threshold must be positive, got {}",
                self.goal_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_object_gives_defaults() {
        let config = SimConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn partial_override() {
        let json = r#"{
            "render_radius": 6.0,
            "carve": { "corridor": 3 },
            "start": { "eye": [5.5, 1.6, 5.5], "yaw": 90.0 }
        }"#;
        let config = SimConfig::from_json_str(json).unwrap();
        assert_eq!(config.render_radius, 6.0);
        assert_eq!(config.carve.corridor, 3);
        assert_eq!(config.carve.ring, 3);
        assert_eq!(config.start.eye, Vec3::new(5.5, 1.6, 5.5));
        assert_eq!(config.move_speed, 0.16);
    }

    #[test]
    fn round_trips_through_json() {
        let json = SimConfig::default().to_json_pretty().unwrap();
        assert_eq!(SimConfig::from_json_str(&json).unwrap(), SimConfig::default());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SimConfig::from_json_str("{ render_radius: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn rejects_step_longer_than_footprint_gap() {
        let json = r#"{ "move_speed": 0.9 }"#;
        assert!(matches!(
            SimConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_bad_agent_radius() {
        let mut config = SimConfig::default();
        config.collision.agent_radius = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_boundary_margin_outside_a_cell() {
        for json in [
            r#"{ "collision": { "boundary_margin": 20.0 } }"#,
            r#"{ "collision": { "boundary_margin": -0.1 } }"#,
        ] {
            assert!(matches!(
                SimConfig::from_json_str(json),
                Err(ConfigError::Invalid(_))
            ));
        }
        let mut config = SimConfig::default();
        config.collision.boundary_margin = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_or_nan_drag_step() {
        let json = r#"{ "input": { "max_drag_step": -1.0 } }"#;
        assert!(matches!(
            SimConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
        let mut config = SimConfig::default();
        config.input.max_drag_step = f32::NAN;
        assert!(config.validate().is_err());
        config.input.max_drag_step = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_carve_params_pass_validation() {
        // Carving clips them, so they are not a config error.
        let config = SimConfig::from_json_str(r#"{ "carve": { "ring": 1073741824 } }"#).unwrap();
        assert_eq!(config.carve.ring, 1 << 30);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
