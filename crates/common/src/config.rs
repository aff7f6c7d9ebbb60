//! Viewer configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides:
//! ```yaml
//! window:
//!   width: 1280
//!   height: 720
//! camera:
//!   speed: 20.0
//! input:
//!   latch_toggles: true
//! ```

use crate::types::ProjectionMode;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "cartonview".into(),
        }
    }
}

/// Startup pose and movement speed. `reset` returns the camera to this pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Degrees. -90 looks down -Z.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    /// World units per second.
    pub speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -3.0, 10.0),
            yaw: -90.0,
            pitch: 0.0,
            speed: 10.0,
            min_speed: 1.0,
            max_speed: 55.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Pixels per world unit in orthographic mode.
    pub ortho_scale: f32,
    pub ortho_near: f32,
    pub ortho_far: f32,
    /// Mode used for the first frame.
    pub start: ProjectionMode,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            ortho_scale: 100.0,
            ortho_near: -50.0,
            ortho_far: 50.0,
            start: ProjectionMode::Perspective,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Degrees of yaw/pitch per pixel of pointer travel.
    pub sensitivity: f32,
    /// Fire P/F once per press instead of every frame while held.
    pub latch_toggles: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            latch_toggles: false,
        }
    }
}

impl ViewerConfig {
    /// Load a YAML config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.min_speed > 0.0 && cam.min_speed <= cam.max_speed) {
            return Err(ConfigError::Invalid(format!(
                "speed bounds must satisfy 0 < min_speed <= max_speed (got {} .. {})",
                cam.min_speed, cam.max_speed
            )));
        }
        let proj = &self.projection;
        if !(proj.near > 0.0 && proj.near < proj.far) {
            return Err(ConfigError::Invalid(format!(
                "perspective planes must satisfy 0 < near < far (got {} .. {})",
                proj.near, proj.far
            )));
        }
        if proj.ortho_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "ortho_scale must be positive (got {})",
                proj.ortho_scale
            )));
        }
        if !(proj.fov_degrees > 0.0 && proj.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must lie in (0, 180) (got {})",
                proj.fov_degrees
            )));
        }
        Ok(())
    }
}
