//! Mountain Viewer
//!
//! Opens a window showing a randomly displaced, rock-textured mountain with
//! a live parameter panel. Changing any Mountains Settings slider rebuilds
//! the mountain from scratch.
//!
//! Run with: `cargo run --bin mountain_viewer [config.json]`
//!
//! Controls:
//! - Left mouse drag: Orbit camera (or drag a panel control)
//! - Middle mouse drag: Dolly camera
//! - Right mouse drag: Pan camera
//! - Scroll wheel: Zoom camera
//! - H: Toggle parameter panel
//! - R: Reset camera
//! - ESC: Exit

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use rand::rngs::ThreadRng;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use ridgeline_engine::camera::{OrbitCamera, OrbitMouseButton};
use ridgeline_engine::game::{MountainDemo, PanelEvent, ViewerConfig};
use ridgeline_engine::render::{
    FrameContext, GpuContext, GpuContextConfig, MeshRenderPass, RenderContext, RenderPass,
    SceneUniforms, TextureSet, UiRenderPass, render_in_order,
};

// ============================================================================
// GPU RESOURCES
// ============================================================================

struct ViewerGpu {
    context: GpuContext,
    mesh_pass: MeshRenderPass,
    ui_pass: UiRenderPass,
}

impl ViewerGpu {
    fn new(window: Arc<Window>, config: &ViewerConfig) -> anyhow::Result<Self> {
        let context = GpuContext::new(
            window,
            GpuContextConfig {
                vsync: config.vsync,
                ..Default::default()
            },
        )?;

        let textures = TextureSet::load(&context.device, &context.queue, &config.texture_dir);
        tracing::info!(
            loaded = textures.loaded_count(),
            dir = %config.texture_dir.display(),
            "rock textures ready"
        );

        let mut mesh_pass = MeshRenderPass::new(textures);
        let mut ui_pass = UiRenderPass::new();
        {
            let (width, height) = context.dimensions();
            let ctx = RenderContext {
                device: &context.device,
                queue: &context.queue,
                surface_format: context.format(),
                width,
                height,
            };
            mesh_pass.initialize(&ctx);
            ui_pass.initialize(&ctx);
        }

        Ok(Self {
            context,
            mesh_pass,
            ui_pass,
        })
    }
}

// ============================================================================
// APPLICATION
// ============================================================================

struct MountainViewerApp {
    config: ViewerConfig,
    demo: MountainDemo,
    camera: OrbitCamera,
    rng: ThreadRng,
    window: Option<Arc<Window>>,
    gpu: Option<ViewerGpu>,
    start_time: Instant,
    current_mouse: (f32, f32),
    /// Set when startup fails inside the event loop
    fatal: Option<anyhow::Error>,
}

impl MountainViewerApp {
    fn new(config: ViewerConfig) -> Self {
        let (width, height) = (config.window_width as f32, config.window_height as f32);
        let mut rng = rand::rng();
        let demo = MountainDemo::new(config.parameters.clone(), (width, height), &mut rng);

        Self {
            config,
            demo,
            camera: OrbitCamera::new(width / height.max(1.0)),
            rng,
            window: None,
            gpu: None,
            start_time: Instant::now(),
            current_mouse: (0.0, 0.0),
            fatal: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attrs = WindowAttributes::default()
            .with_title("Ridgeline - Mountain Viewer")
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = ViewerGpu::new(window.clone(), &self.config)?;
        let (width, height) = gpu.context.dimensions();
        self.camera.resize(width, height);
        self.demo.panel.resize(width as f32, height as f32);

        self.gpu = Some(gpu);
        self.window = Some(window);
        Ok(())
    }

    fn apply(&mut self, event: Option<PanelEvent>) {
        let Some(event) = event else {
            return;
        };
        if self.demo.handle_event(event, &mut self.rng) {
            tracing::info!(
                generation = self.demo.terrain.generation(),
                vertices = self.demo.params.vertex_count(),
                "mountain rebuilt"
            );
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyH => self.demo.panel.toggle_visible(),
            KeyCode::KeyR => self.camera.reset(),
            _ => {}
        }
    }

    // -- Mouse input: panel gets first dibs, then the camera --
    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        let (mx, my) = self.current_mouse;

        if pressed {
            if button == MouseButton::Left {
                let input = self.demo.panel.on_mouse_press(mx, my);
                if input.consumed {
                    self.apply(input.event);
                    return;
                }
            } else if self.demo.panel.covers(mx, my) {
                return;
            }
        } else if button == MouseButton::Left && self.demo.panel.on_mouse_release() {
            return;
        }

        let orbit_button = match button {
            MouseButton::Left => OrbitMouseButton::Left,
            MouseButton::Middle => OrbitMouseButton::Middle,
            MouseButton::Right => OrbitMouseButton::Right,
            _ => return,
        };
        self.camera.handle_mouse_button(orbit_button, pressed);
    }

    fn handle_cursor(&mut self, x: f32, y: f32) {
        self.current_mouse = (x, y);
        if self.demo.panel.is_dragging() {
            let event = self.demo.panel.on_mouse_move(x, y);
            self.apply(event);
        }
        // Always tracked so the next camera drag starts from here
        self.camera.handle_mouse_move(x, y);
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(gpu) = &mut self.gpu {
            gpu.context.resize(width, height);
        }
        self.camera.resize(width, height);
        self.demo.panel.resize(width as f32, height as f32);
    }

    fn render(&mut self) {
        let elapsed = self.start_time.elapsed().as_secs_f32();
        self.demo.animate(elapsed);
        self.camera.update();

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.context.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.context.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory");
                return;
            }
            Err(e) => {
                tracing::warn!(error = ?e, "failed to acquire frame");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (width, height) = gpu.context.dimensions();
        let ctx = RenderContext {
            device: &gpu.context.device,
            queue: &gpu.context.queue,
            surface_format: gpu.context.format(),
            width,
            height,
        };

        let uniforms = SceneUniforms::new(
            self.camera.view_projection_matrix(),
            self.camera.eye(),
            &self.demo.scene,
        );
        gpu.mesh_pass.prepare(&ctx, &self.demo.scene, &uniforms);
        gpu.ui_pass.prepare(&ctx, &self.demo.panel.generate_ui_mesh());

        let mut encoder = gpu
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let [r, g, b] = self.demo.clear_color();
        {
            let mut frame = FrameContext {
                encoder: &mut encoder,
                color_view: &view,
                depth_view: &gpu.context.depth_view,
                clear_color: wgpu::Color { r, g, b, a: 1.0 },
            };
            let mut passes: [&dyn RenderPass; 2] = [&gpu.mesh_pass, &gpu.ui_pass];
            render_in_order(&mut passes, &ctx, &mut frame);
        }

        gpu.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl ApplicationHandler for MountainViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.fatal.is_some() {
            return;
        }
        if let Err(err) = self.initialize(event_loop) {
            tracing::error!(error = %err, "viewer startup failed");
            self.fatal = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state != ElementState::Pressed || event.repeat {
                        return;
                    }
                    if key == KeyCode::Escape {
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(key);
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                self.handle_mouse_button(button, state == ElementState::Pressed);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (mx, my) = self.current_mouse;
                if self.demo.panel.covers(mx, my) {
                    return;
                }
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.camera.handle_scroll(scroll);
            }

            WindowEvent::Resized(size) => self.handle_resize(size.width, size.height),

            WindowEvent::RedrawRequested => self.render(),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ViewerConfig::from_args(std::env::args()).context("failed to load viewer config")?;

    tracing::info!("=== Ridgeline Mountain Viewer ===");
    tracing::info!("Left drag: orbit | Middle drag: dolly | Right drag: pan | Wheel: zoom");
    tracing::info!("H: toggle panel | R: reset camera | ESC: exit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = MountainViewerApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
