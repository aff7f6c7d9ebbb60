use cartonview_common::MoveDirection;

/// A camera command produced by the input mapper.
///
/// The frame loop consumes intents, never raw window events, so the same
/// camera logic runs under the desktop window and the headless simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Translate one frame step along a camera-relative axis.
    Move(MoveDirection),
    /// Rotate by yaw/pitch deltas in degrees, sensitivity already applied.
    Look { yaw: f32, pitch: f32 },
    /// Scroll offset in lines. Subtracted from the movement speed.
    AdjustSpeed(f32),
    /// Switch between perspective and orthographic projection.
    ToggleProjection,
    /// Return the camera to its startup pose.
    ResetCamera,
    /// Leave the frame loop.
    Exit,
}
