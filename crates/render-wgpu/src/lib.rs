//! wgpu render backend for the carton viewer.
//!
//! Uploads the four static meshes once, then each frame writes the
//! model/view/projection block for every mesh and draws it.
//!
//! # Invariants
//! - Vertex buffers are immutable after creation.
//! - The renderer never mutates camera state.
//! - Adapter and device acquisition failures are fatal.

mod context;
mod gpu;
mod shaders;

pub use context::{GpuContext, GpuError};
pub use gpu::WgpuRenderer;
