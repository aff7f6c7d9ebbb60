use cartonview_kernel::ViewerState;
use egui::Context as EguiContext;

const BINDINGS: &str = "WASD: Move | Q/E: Down/Up | Mouse: Look | Wheel: Speed\n\
                        P: Projection | F: Reset | F1: HUD | Esc: Quit";

/// Read-only overlay with the camera readouts.
pub fn draw_hud(ctx: &EguiContext, state: &ViewerState, adapter: &str, frame_time: f32) {
    let camera = state.camera();
    let viewport = state.viewport();

    egui::Window::new("cartonview")
        .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.label(format!(
                "Position: ({:.2}, {:.2}, {:.2})",
                camera.position.x, camera.position.y, camera.position.z
            ));
            ui.label(format!(
                "Yaw: {:.1}  Pitch: {:.1}",
                camera.yaw(),
                camera.pitch()
            ));
            ui.label(format!("Speed: {:.1} u/s", camera.speed()));
            ui.label(format!("Projection: {}", state.mode()));
            ui.label(format!("Viewport: {}x{}", viewport.width, viewport.height));
            if frame_time > 0.0 {
                ui.label(format!(
                    "Frame: {:.2} ms ({:.0} fps)",
                    frame_time * 1000.0,
                    1.0 / frame_time
                ));
            }
            ui.label(format!("GPU: {adapter}"));
            ui.separator();
            ui.small(BINDINGS);
        });
}
