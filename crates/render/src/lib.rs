//! Rendering Adapter: camera model, projection and the fixed scene,
//! independent of any GPU backend.
//!
//! # Invariants
//! - Front and right are unit length and perpendicular; right stays
//!   horizontal and up stays at world-up, so there is no roll.
//! - Pitch never leaves [-89, 89] degrees; speed never leaves its bounds.
//! - Renderers read a [`FrameView`] and never mutate camera state.

pub mod camera;
pub mod projection;
mod renderer;
pub mod scene;

pub use camera::FlyCamera;
pub use projection::ProjectionSelector;
pub use renderer::{DebugTextRenderer, FrameView, Renderer, Transforms};
pub use scene::{MeshData, Vertex, carton_scene};

pub fn crate_info() -> &'static str {
    "cartonview-render v0.1.0"
}
