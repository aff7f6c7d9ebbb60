//! Shared vocabulary for the cartonview crates: viewport, projection mode,
//! movement directions and the viewer configuration.
//!
//! # Invariants
//! - Configuration defaults reproduce the stock viewer exactly.
//! - A loaded configuration is validated before anything consumes it.

pub mod config;
pub mod types;

pub use config::{
    CameraConfig, ConfigError, InputConfig, ProjectionConfig, ViewerConfig, WindowConfig,
};
pub use types::{MoveDirection, ProjectionMode, Viewport};
