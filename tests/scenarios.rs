//! End-to-end scenarios over the scene, loop and panel bindings (no GPU).

use anyhow::Result;

use raging_sea::color::Color;
use raging_sea::panel::{color_controls, numeric_controls, ColorField, BIG_WAVES};
use raging_sea::params::RenderConfig;
use raging_sea::render_loop::{FrameRenderer, LoopState, ManualClock, RenderLoop};
use raging_sea::scene::{SceneParams, SceneState, Viewport};
use raging_sea::uniforms::{names, WaterUniforms};

fn scene() -> SceneState {
    let config = RenderConfig {
        plane_segments: 16,
        ..RenderConfig::default()
    };
    SceneState::new(
        &SceneParams::default(),
        &config,
        Viewport::new(1280.0, 720.0, 1.0),
    )
    .unwrap()
}

/// Keeps the packed uniform block of every frame
#[derive(Default)]
struct Capture {
    frames: Vec<WaterUniforms>,
}

impl FrameRenderer for Capture {
    fn draw(&mut self, scene: &SceneState) -> Result<()> {
        self.frames.push(scene.water_uniforms()?);
        Ok(())
    }
}

#[test]
fn test_drawn_time_tracks_clock() {
    let mut scene = scene();
    let mut capture = Capture::default();
    let mut render_loop = RenderLoop::new(ManualClock::new());

    for t in [0.0, 0.25, 2.0, 90.5] {
        render_loop.clock_mut().set(t);
        assert_eq!(
            render_loop.frame(&mut scene, &mut capture).unwrap(),
            LoopState::Continue
        );
    }

    let times: Vec<f32> = capture.frames.iter().map(|u| u.time).collect();
    assert_eq!(times, vec![0.0, 0.25, 2.0, 90.5]);
}

#[test]
fn test_panel_edit_reaches_next_frame() {
    let mut scene = scene();
    let mut capture = Capture::default();
    let mut render_loop = RenderLoop::new(ManualClock::new());

    let elevation = numeric_controls()
        .into_iter()
        .find(|c| c.folder == BIG_WAVES && c.label == "Elevation")
        .unwrap();
    assert_eq!(elevation.apply(&mut scene.uniforms, 0.5).unwrap(), 0.5);

    let surface = color_controls()
        .into_iter()
        .find(|c| c.field == ColorField::Surface)
        .unwrap();
    let depth_before = scene.uniforms.color(names::DEPTH_COLOR).unwrap();
    surface
        .apply(&mut scene.colors, &mut scene.uniforms, "#ff0000")
        .unwrap();

    render_loop.frame(&mut scene, &mut capture).unwrap();
    let drawn = capture.frames.last().unwrap();

    assert_eq!(drawn.big_waves_elevation, 0.5);
    let red = Color::from_hex("#ff0000").unwrap();
    assert_eq!(drawn.surface_color, red.to_array());
    assert!((red.r - 1.0).abs() < 1e-5 && red.g == 0.0 && red.b == 0.0);
    assert_eq!(drawn.depth_color, depth_before.to_array());
    assert_eq!(scene.colors.surface_color, "#ff0000");
}

#[test]
fn test_every_control_clamps_and_snaps() {
    let mut scene = scene();

    for control in numeric_controls() {
        assert_eq!(
            control.apply(&mut scene.uniforms, control.max + 100.0).unwrap(),
            control.max,
            "{} / {}",
            control.folder,
            control.label
        );
        assert_eq!(
            control.apply(&mut scene.uniforms, control.min - 100.0).unwrap(),
            control.min
        );

        // A value between grid points lands on the nearest one
        let between = control.min + control.step * 2.4;
        let stored = control.apply(&mut scene.uniforms, between).unwrap();
        let steps = (stored - control.min) / control.step;
        assert!((steps - steps.round()).abs() < 1e-9);
        assert!((stored - (control.min + control.step * 2.0)).abs() < 1e-9);
    }
}

#[test]
fn test_resize_scenario() {
    let mut scene = scene();
    let target = scene.resize(800.0, 600.0, 3.0);

    assert_eq!(target.pixel_ratio, 2.0);
    assert_eq!(target.buffer_size(), (1600, 1200));
    assert!((scene.camera.aspect - 4.0 / 3.0).abs() < 1e-6);

    let projection_once = scene.water_uniforms().unwrap().projection;
    scene.resize(800.0, 600.0, 3.0);
    assert_eq!(scene.water_uniforms().unwrap().projection, projection_once);
}

#[test]
fn test_orbit_drag_settles_within_limits() {
    let mut scene = scene();
    let mut capture = Capture::default();
    let mut render_loop = RenderLoop::new(ManualClock::new());

    scene.controls.rotate(300.0, -900.0, 720.0);
    for _ in 0..30 {
        scene.controls.zoom(1.0);
    }

    let mut last = scene.camera.position;
    let mut final_step = f32::MAX;
    for _ in 0..400 {
        render_loop.clock_mut().advance(1.0 / 60.0);
        render_loop.frame(&mut scene, &mut capture).unwrap();
        final_step = (scene.camera.position - last).length();
        last = scene.camera.position;

        let offset = scene.camera.position - scene.camera.target;
        let distance = offset.length();
        assert!(distance >= 0.75 - 1e-4 && distance <= 5.0 + 1e-4);
        let polar = (offset.y / distance).acos();
        assert!(polar <= scene.controls.params.max_polar_angle + 1e-4);
    }
    assert!(final_step < 1e-4);
}

#[test]
fn test_default_colors_are_linear() {
    let scene = scene();
    let surface = scene.uniforms.color(names::SURFACE_COLOR).unwrap();
    assert_eq!(surface, Color::from_hex("#9bd8ff").unwrap());
    assert_eq!(surface.to_hex(), "#9bd8ff");
    assert!(surface.r < 155.0 / 255.0);
}
