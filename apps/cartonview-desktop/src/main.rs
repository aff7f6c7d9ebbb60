mod hud;

use anyhow::{Context as _, Result};
use cartonview_common::{ProjectionMode, ViewerConfig, Viewport};
use cartonview_input::{InputMapper, Key};
use cartonview_kernel::{StepOutcome, ViewerState};
use cartonview_render::carton_scene;
use cartonview_render_wgpu::{GpuContext, GpuError, WgpuRenderer};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "cartonview-desktop", about = "Fly a camera around the carton scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Start in orthographic projection
    #[arg(long)]
    orthographic: bool,
}

impl Cli {
    fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ViewerConfig::default(),
        };
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if self.orthographic {
            config.projection.start = ProjectionMode::Orthographic;
        }
        config.validate()?;
        Ok(config)
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::KeyE => Some(Key::E),
        KeyCode::KeyP => Some(Key::P),
        KeyCode::KeyF => Some(Key::F),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

/// State the frame loop owns and mutates.
struct AppState {
    viewer: ViewerState,
    mapper: InputMapper,
    show_hud: bool,
    last_frame: Instant,
    frame_time: f32,
}

impl AppState {
    fn new(config: &ViewerConfig) -> Self {
        Self {
            viewer: ViewerState::new(config),
            mapper: InputMapper::new(&config.input),
            show_hud: true,
            last_frame: Instant::now(),
            frame_time: 0.0,
        }
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool, repeat: bool) {
        if code == KeyCode::F1 && pressed && !repeat {
            self.show_hud = !self.show_hud;
            return;
        }
        let Some(key) = map_key(code) else {
            return;
        };
        if pressed {
            self.mapper.key_pressed(key);
        } else {
            self.mapper.key_released(key);
        }
    }

    fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(_, y) => self.mapper.scrolled(y),
            MouseScrollDelta::PixelDelta(pos) => self.mapper.scrolled_pixels(pos.y as f32),
        }
    }

    /// Advance one frame: drain queued input and apply it.
    fn update(&mut self, viewport: Viewport) -> StepOutcome {
        let now = Instant::now();
        self.frame_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.viewer.set_viewport(viewport);
        let intents = self.mapper.drain_intents();
        self.viewer.step(&intents, self.frame_time)
    }
}

/// GPU resources, created on `resumed` and dropped after the loop exits.
struct Gpu {
    context: GpuContext,
    /// Adapter name and backend, shown in the HUD.
    adapter: String,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    config: ViewerConfig,
    state: AppState,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: ViewerConfig) -> Self {
        Self {
            state: AppState::new(&config),
            config,
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("creating window")?,
        );

        let size = window.inner_size();
        let context = GpuContext::new(window.clone(), size.width, size.height)
            .context("initializing GPU")?;
        let renderer = WgpuRenderer::new(
            &context.device,
            context.format(),
            size.width,
            size.height,
            &carton_scene(),
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&context.device, context.format(), None, 1, false);

        let info = context.adapter_info();
        let adapter = format!("{} ({})", info.name, info.backend.to_str());

        tracing::info!(
            "scene ready: {} meshes, {}x{}",
            renderer.mesh_count(),
            size.width,
            size.height
        );

        self.state
            .viewer
            .set_viewport(Viewport::new(size.width, size.height));
        self.window = Some(window);
        self.gpu = Some(Gpu {
            context,
            adapter,
            renderer,
            egui_winit,
            egui_renderer,
        });
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) -> Result<(), GpuError> {
        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return Ok(());
        };

        let (width, height) = gpu.context.size();
        if self.state.update(Viewport::new(width, height)) == StepOutcome::Exit {
            tracing::info!("exit requested");
            event_loop.exit();
            return Ok(());
        }

        let Some(output) = gpu.context.acquire_frame()? else {
            window.request_redraw();
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &gpu.context.device;
        let queue = &gpu.context.queue;
        gpu.renderer
            .render(device, queue, &view, &self.state.viewer.frame_view());

        if self.state.show_hud {
            let raw_input = gpu.egui_winit.take_egui_input(window);
            let full_output = self.egui_ctx.run(raw_input, |ctx| {
                hud::draw_hud(ctx, &self.state.viewer, &gpu.adapter, self.state.frame_time);
            });
            gpu.egui_winit
                .handle_platform_output(window, full_output.platform_output);

            let paint_jobs = self
                .egui_ctx
                .tessellate(full_output.shapes, full_output.pixels_per_point);
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [width, height],
                pixels_per_point: full_output.pixels_per_point,
            };

            for (id, image_delta) in &full_output.textures_delta.set {
                gpu.egui_renderer
                    .update_texture(device, queue, *id, image_delta);
            }
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("hud_encoder"),
            });
            gpu.egui_renderer.update_buffers(
                device,
                queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("hud_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    })
                    .forget_lifetime();
                gpu.egui_renderer
                    .render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            queue.submit(std::iter::once(encoder.finish()));
            for id in &full_output.textures_delta.free {
                gpu.egui_renderer.free_texture(id);
            }
        }

        output.present();
        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // The HUD is read-only: egui sees events while it is shown but never
        // swallows camera input.
        if self.state.show_hud {
            if let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) {
                let _ = gpu.egui_winit.on_window_event(window, &event);
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.context.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.context.size();
                    gpu.renderer.resize(&gpu.context.device, width, height);
                    self.state.viewer.set_viewport(Viewport::new(width, height));
                }
            }
            WindowEvent::Focused(false) => {
                self.state.mapper.release_all();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(code, key_state == ElementState::Pressed, repeat);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .mapper
                    .pointer_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.handle_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(event_loop) {
                    self.fail(event_loop, err.into());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = cli.viewer_config()?;
    tracing::info!("cartonview-desktop starting");

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    // GPU resources go before the window they draw into.
    drop(app.gpu.take());
    drop(app.window.take());

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartonview_common::MoveDirection;
    use cartonview_input::Intent;

    #[test]
    fn movement_keys_mapped() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::KeyQ), Some(Key::Q));
        assert_eq!(map_key(KeyCode::KeyP), Some(Key::P));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::Space), None);
    }

    #[test]
    fn f1_toggles_hud_once_per_press() {
        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_key(KeyCode::F1, true, false);
        assert!(!state.show_hud);
        state.handle_key(KeyCode::F1, true, true);
        assert!(!state.show_hud);
        state.handle_key(KeyCode::F1, false, false);
        state.handle_key(KeyCode::F1, true, false);
        assert!(state.show_hud);
    }

    #[test]
    fn key_events_reach_mapper() {
        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_key(KeyCode::KeyD, true, false);
        assert_eq!(
            state.mapper.drain_intents(),
            vec![Intent::Move(MoveDirection::Right)]
        );
        state.handle_key(KeyCode::KeyD, false, false);
        assert!(state.mapper.drain_intents().is_empty());
    }

    #[test]
    fn line_scroll_lowers_speed() {
        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_scroll(MouseScrollDelta::LineDelta(0.0, 3.0));
        state.update(Viewport::default());
        assert_eq!(state.viewer.camera().speed(), 7.0);
    }

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from([
            "cartonview-desktop",
            "--width",
            "1024",
            "--orthographic",
        ]);
        let config = cli.viewer_config().unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.projection.start, ProjectionMode::Orthographic);
    }
}
