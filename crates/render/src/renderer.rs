use crate::scene::MeshData;
use cartonview_common::{ProjectionMode, Viewport};
use glam::{Mat4, Vec3};
use std::fmt::Write;

/// Everything a renderer needs from the camera for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub view: Mat4,
    pub projection: Mat4,
    pub mode: ProjectionMode,
    pub viewport: Viewport,
    /// Camera position in world space.
    pub eye: Vec3,
    pub front: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
}

/// Per-draw uniform block: model, view, projection.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Transforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl Transforms {
    pub fn new(model: Mat4, frame: &FrameView) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            projection: frame.projection.to_cols_array_2d(),
        }
    }

    /// `projection * view * model`, the product the vertex stage applies.
    pub fn clip_from_object(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
            * Mat4::from_cols_array_2d(&self.view)
            * Mat4::from_cols_array_2d(&self.model)
    }
}

/// Renderer-agnostic interface. Reads the scene and a frame view, never
/// mutates camera state.
pub trait Renderer {
    type Output;

    fn render(&mut self, scene: &[MeshData], frame: &FrameView) -> Self::Output;
}

/// Text renderer for the headless tools and for logging.
///
/// Reports the camera and, per mesh, where its first vertex lands in clip
/// space.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &[MeshData], frame: &FrameView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame ({} {}x{}) ===",
            frame.mode, frame.viewport.width, frame.viewport.height
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) front=({:.3}, {:.3}, {:.3}) yaw={:.1} pitch={:.1} speed={:.1}",
            frame.eye.x,
            frame.eye.y,
            frame.eye.z,
            frame.front.x,
            frame.front.y,
            frame.front.z,
            frame.yaw,
            frame.pitch,
            frame.speed
        );

        for mesh in scene {
            let clip = Transforms::new(mesh.model_matrix(), frame).clip_from_object();
            let first = mesh
                .vertices
                .first()
                .map(|v| clip.project_point3(Vec3::from(v.position)));
            match first {
                Some(p) => {
                    let _ = writeln!(
                        out,
                        "  [{}] vertices={} first=({:.3}, {:.3}, {:.3})",
                        mesh.name,
                        mesh.vertex_count(),
                        p.x,
                        p.y,
                        p.z
                    );
                }
                None => {
                    let _ = writeln!(out, "  [{}] empty", mesh.name);
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::carton_scene;

    fn frame() -> FrameView {
        FrameView {
            view: Mat4::look_at_rh(Vec3::new(0.0, -3.0, 10.0), Vec3::new(0.0, -3.0, 9.0), Vec3::Y),
            projection: Mat4::perspective_rh(45f32.to_radians(), 4.0 / 3.0, 0.1, 100.0),
            mode: ProjectionMode::Perspective,
            viewport: Viewport::new(640, 480),
            eye: Vec3::new(0.0, -3.0, 10.0),
            front: Vec3::NEG_Z,
            yaw: -90.0,
            pitch: 0.0,
            speed: 10.0,
        }
    }

    #[test]
    fn transforms_block_is_three_matrices() {
        assert_eq!(std::mem::size_of::<Transforms>(), 3 * 64);
    }

    #[test]
    fn clip_from_object_order() {
        let f = frame();
        let model = Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0));
        let t = Transforms::new(model, &f);
        assert_eq!(t.clip_from_object(), f.projection * f.view * model);
    }

    #[test]
    fn debug_renderer_lists_meshes() {
        let out = DebugTextRenderer::new().render(&carton_scene(), &frame());
        assert!(out.contains("perspective 640x480"));
        assert!(out.contains("[ground] vertices=6"));
        assert!(out.contains("[carton top] vertices=42"));
        assert!(out.contains("eye=(0.00, -3.00, 10.00)"));
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let out = DebugTextRenderer::new().render(&[], &frame());
        assert!(out.contains("Camera:"));
        assert_eq!(out.lines().count(), 2);
    }
}
