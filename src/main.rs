//! Raging sea - an animated procedural ocean
//!
//! A subdivided plane displaced on the GPU by a sine swell and layered
//! Perlin chop, orbited by a damped camera, with a debug panel that edits
//! the shader uniforms live.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use egui_wgpu::ScreenDescriptor;
use glam::Vec2;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use raging_sea::camera::DragMode;
use raging_sea::cli::Args;
use raging_sea::panel::DebugPanel;
use raging_sea::params::RenderConfig;
use raging_sea::render_loop::{LoopState, MonotonicClock, RenderLoop};
use raging_sea::rendering::{RenderSystem, UiFrame};
use raging_sea::scene::{SceneParams, SceneState, Viewport};

/// Pixels one wheel "line" is worth when the platform reports pixel deltas
const PIXELS_PER_LINE: f64 = 40.0;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,

    // Scene and loop
    scene: SceneState,
    panel: DebugPanel,
    render_loop: RenderLoop<MonotonicClock>,

    // Configuration
    render_config: RenderConfig,

    /// Last pointer position (logical pixels)
    cursor: Vec2,

    /// First fatal error; ends the event loop
    error: Option<anyhow::Error>,
}

impl App {
    fn new(render_config: RenderConfig) -> Result<Self> {
        let viewport = Viewport::new(
            render_config.window_width as f64,
            render_config.window_height as f64,
            1.0,
        );
        let scene = SceneState::new(&SceneParams::default(), &render_config, viewport)
            .context("invalid default colors")?;
        let panel = DebugPanel::new(render_config.panel_width, render_config.panel_open);

        Ok(Self {
            window: None,
            render_system: None,
            egui_ctx: egui::Context::default(),
            egui_state: None,
            scene,
            panel,
            render_loop: RenderLoop::new(MonotonicClock::new()),
            render_config,
            cursor: Vec2::ZERO,
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Raging Sea")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let scale_factor = window.scale_factor();
        let logical = window.inner_size().to_logical::<f64>(scale_factor);
        let draw_target = self
            .scene
            .resize(logical.width, logical.height, scale_factor);

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.scene.geometry,
            draw_target,
            self.render_config.clear_color,
        ))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(scale_factor as f32),
            window.theme(),
            Some(render_system.device.limits().max_texture_dimension_2d as usize),
        );

        info!(
            "water plane: {} vertices, {} triangles",
            self.scene.geometry.vertices.len(),
            self.scene.geometry.index_count() / 3
        );
        info!("drag to orbit, right-drag to pan, scroll to zoom, ESC to quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.egui_state = Some(egui_state);
        Ok(())
    }

    /// Viewport-size-changed handler; zero-area sizes (minimized) are ignored
    fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        let logical = size.to_logical::<f64>(scale_factor);
        let draw_target = self
            .scene
            .resize(logical.width, logical.height, scale_factor);

        if let Some(render_system) = self.render_system.as_mut() {
            render_system.resize(size, draw_target);
        }
    }

    fn pointer_input(&mut self, state: ElementState, button: MouseButton) {
        let mode = match button {
            MouseButton::Left => DragMode::Rotate,
            MouseButton::Right | MouseButton::Middle => DragMode::Pan,
            _ => return,
        };
        match state {
            ElementState::Pressed if !self.egui_ctx.is_pointer_over_area() => {
                self.scene.controls.pointer_down(mode, self.cursor);
            }
            ElementState::Pressed => {}
            ElementState::Released => self.scene.controls.pointer_up(),
        }
    }

    fn wheel_input(&mut self, delta: MouseScrollDelta) {
        if self.egui_ctx.is_pointer_over_area() {
            return;
        }
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y as f64,
            MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_LINE,
        };
        self.scene.controls.zoom(lines as f32);
    }

    /// Build the panel, then run one loop iteration
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_system), Some(egui_state)) = (
            self.window.as_ref(),
            self.render_system.as_mut(),
            self.egui_state.as_mut(),
        ) else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);
        let panel = &self.panel;
        let scene = &mut self.scene;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            panel.show(ctx, &mut scene.uniforms, &mut scene.colors);
        });
        egui_state.handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let (width, height) = render_system.surface_size();
        render_system.set_ui(UiFrame {
            paint_jobs: self
                .egui_ctx
                .tessellate(full_output.shapes, pixels_per_point),
            textures_delta: full_output.textures_delta,
            screen: ScreenDescriptor {
                size_in_pixels: [width, height],
                pixels_per_point,
            },
        });

        match self.render_loop.frame(&mut self.scene, render_system) {
            Ok(LoopState::Continue) => {}
            Ok(LoopState::Stopped) => event_loop.exit(),
            Err(e) => self.fail(event_loop, e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(e) = self.init_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if let Some(egui_state) = self.egui_state.as_mut() {
            let _ = egui_state.on_window_event(&window, &event);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size, window.scale_factor()),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.resize(window.inner_size(), scale_factor)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(window.scale_factor());
                self.cursor = Vec2::new(logical.x, logical.y);
                let viewport_height = self.scene.viewport.height as f32;
                self.scene
                    .controls
                    .pointer_move(self.cursor, viewport_height, &self.scene.camera);
            }
            WindowEvent::MouseInput { state, button, .. } => self.pointer_input(state, button),
            WindowEvent::MouseWheel { delta, .. } => self.wheel_input(delta),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mut app = App::new(args.render_config())?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
