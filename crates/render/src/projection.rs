use cartonview_common::{ProjectionConfig, ProjectionMode, Viewport};
use glam::Mat4;

/// Builds the projection matrix for the current mode and viewport.
///
/// Output targets wgpu clip space (depth in [0, 1]).
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSelector {
    config: ProjectionConfig,
}

impl Default for ProjectionSelector {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

impl ProjectionSelector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn matrix(&self, mode: ProjectionMode, viewport: Viewport) -> Mat4 {
        match mode {
            ProjectionMode::Perspective => self.perspective(viewport),
            ProjectionMode::Orthographic => self.orthographic(viewport),
        }
    }

    pub fn perspective(&self, viewport: Viewport) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fov_degrees.to_radians(),
            viewport.aspect(),
            self.config.near,
            self.config.far,
        )
    }

    /// Half extents are the viewport in pixels over `ortho_scale`, so the
    /// default camera distance sees roughly what perspective shows.
    pub fn orthographic(&self, viewport: Viewport) -> Mat4 {
        let half_w = viewport.width.max(1) as f32 / self.config.ortho_scale;
        let half_h = viewport.height.max(1) as f32 / self.config.ortho_scale;
        Mat4::orthographic_rh(
            -half_w,
            half_w,
            -half_h,
            half_h,
            self.config.ortho_near,
            self.config.ortho_far,
        )
    }
}
