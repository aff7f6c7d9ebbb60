use cartonview_common::{ProjectionMode, Viewport, ViewerConfig};
use cartonview_input::Intent;
use cartonview_render::{FlyCamera, FrameView, ProjectionSelector};
use glam::Mat4;

/// What the frame loop should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Exit,
}

/// Camera, projection mode and viewport for the lifetime of the process.
///
/// Single writer: only the frame loop holds it mutably.
#[derive(Debug, Clone)]
pub struct ViewerState {
    camera: FlyCamera,
    projection: ProjectionSelector,
    mode: ProjectionMode,
    viewport: Viewport,
    frame: u64,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            camera: FlyCamera::new(&config.camera),
            projection: ProjectionSelector::new(config.projection.clone()),
            mode: config.projection.start,
            viewport: Viewport::new(config.window.width, config.window.height),
            frame: 0,
        }
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of steps applied so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Apply one frame's intents. `dt` is the elapsed time of this frame in
    /// seconds and scales every movement intent.
    ///
    /// An exit intent does not cut the frame short; the rest of the batch
    /// is still applied so the final state matches what was drawn.
    pub fn step(&mut self, intents: &[Intent], dt: f32) -> StepOutcome {
        self.frame += 1;
        self.camera.begin_frame(dt);

        let mut outcome = StepOutcome::Continue;
        for intent in intents {
            match *intent {
                Intent::Look { yaw, pitch } => self.camera.apply_look(yaw, pitch),
                Intent::AdjustSpeed(scroll) => {
                    self.camera.adjust_speed(scroll);
                    tracing::debug!("camera speed {:.1}", self.camera.speed());
                }
                Intent::Move(direction) => {
                    let step = self.camera.frame_step();
                    self.camera.apply_translation(direction, step);
                }
                Intent::ToggleProjection => {
                    self.mode.toggle();
                    tracing::info!("projection: {}", self.mode);
                }
                Intent::ResetCamera => {
                    self.camera.reset();
                    tracing::info!("camera reset");
                }
                Intent::Exit => outcome = StepOutcome::Exit,
            }
        }
        outcome
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix(self.mode, self.viewport)
    }

    /// Matrices and camera readouts for the frame just stepped.
    pub fn frame_view(&self) -> FrameView {
        FrameView {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
            mode: self.mode,
            viewport: self.viewport,
            eye: self.camera.position,
            front: self.camera.front(),
            yaw: self.camera.yaw(),
            pitch: self.camera.pitch(),
            speed: self.camera.speed(),
        }
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}
