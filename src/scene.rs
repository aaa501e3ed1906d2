//! Scene state: the water mesh, its uniforms, the camera and the viewport.
//!
//! Everything the render loop and the event handlers touch lives in
//! [`SceneState`], passed to them explicitly.

use glam::Mat4;
use log::debug;

use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::color::{Color, ColorParseError};
use crate::mesh::{water_model_matrix, PlaneGeometry};
use crate::panel::DebugColors;
use crate::params::{
    CameraParams, ColorDefaults, OrbitParams, RenderConfig, WaveParams, MAX_PIXEL_RATIO,
};
use crate::uniforms::{UniformError, UniformSet, WaterUniforms};

/// Window size in logical pixels plus the display's pixel density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    /// Drawing-buffer pixels per logical pixel, capped at [`MAX_PIXEL_RATIO`]
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    pub fn draw_target(&self) -> DrawTarget {
        DrawTarget {
            width: self.width,
            height: self.height,
            pixel_ratio: self.pixel_ratio(),
        }
    }
}

/// Size the renderer draws the scene at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTarget {
    /// Logical width
    pub width: f64,
    /// Logical height
    pub height: f64,
    pub pixel_ratio: f64,
}

impl DrawTarget {
    /// Drawing-buffer size in pixels (never zero)
    pub fn buffer_size(&self) -> (u32, u32) {
        let scale = |v: f64| ((v * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// Starting values for everything in the scene
#[derive(Debug, Clone, Default)]
pub struct SceneParams {
    pub waves: WaveParams,
    pub colors: ColorDefaults,
    pub camera: CameraParams,
    pub orbit: OrbitParams,
}

/// The water scene and the state its handlers share
pub struct SceneState {
    pub uniforms: UniformSet,
    pub colors: DebugColors,
    pub geometry: PlaneGeometry,
    pub model: Mat4,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub viewport: Viewport,
}

impl SceneState {
    pub fn new(
        params: &SceneParams,
        render_config: &RenderConfig,
        viewport: Viewport,
    ) -> Result<Self, ColorParseError> {
        let colors = DebugColors::from(&params.colors);
        let uniforms = UniformSet::water(
            &params.waves,
            Color::from_hex(&colors.surface_color)?,
            Color::from_hex(&colors.depth_color)?,
        );

        let geometry = PlaneGeometry::new(
            render_config.plane_size,
            render_config.plane_size,
            render_config.plane_segments,
        );

        Ok(Self {
            uniforms,
            colors,
            geometry,
            model: water_model_matrix(),
            camera: PerspectiveCamera::new(&params.camera, viewport.aspect()),
            controls: OrbitControls::new(params.orbit.clone()),
            viewport,
        })
    }

    /// Viewport-size-changed handler: store the size, refit the camera and
    /// return the new drawing target. Safe to call repeatedly.
    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> DrawTarget {
        self.viewport = Viewport::new(width, height, device_pixel_ratio);

        self.camera.aspect = self.viewport.aspect();
        self.camera.update_projection_matrix();

        let target = self.viewport.draw_target();
        debug!(
            "resize {}x{} @{} -> buffer {:?}",
            width,
            height,
            target.pixel_ratio,
            target.buffer_size()
        );
        target
    }

    /// GPU uniform block for the current camera and parameters
    pub fn water_uniforms(&self) -> Result<WaterUniforms, UniformError> {
        WaterUniforms::pack(
            &self.uniforms,
            self.model,
            self.camera.view_matrix(),
            self.camera.projection_matrix(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_scene() -> SceneState {
        let config = RenderConfig {
            plane_segments: 8,
            ..RenderConfig::default()
        };
        SceneState::new(
            &SceneParams::default(),
            &config,
            Viewport::new(1280.0, 720.0, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_scene() {
        let scene = small_scene();
        assert_eq!(scene.geometry.vertices.len(), 81);
        assert!((scene.camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
        assert_eq!(scene.colors.surface_color, "#9bd8ff");
        assert_eq!(scene.colors.depth_color, "#186691");
    }

    #[test]
    fn test_resize_caps_pixel_ratio() {
        let mut scene = small_scene();
        let target = scene.resize(800.0, 600.0, 3.0);

        assert_eq!(target.pixel_ratio, 2.0);
        assert_eq!((target.width, target.height), (800.0, 600.0));
        assert_eq!(target.buffer_size(), (1600, 1200));
        assert!((scene.camera.aspect - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_keeps_low_ratios() {
        let mut scene = small_scene();
        assert_eq!(scene.resize(800.0, 600.0, 1.5).pixel_ratio, 1.5);
        assert_eq!(scene.resize(800.0, 600.0, 1.0).buffer_size(), (800, 600));
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut scene = small_scene();
        let first = scene.resize(1024.0, 768.0, 2.0);
        let camera_after_first = scene.camera.clone();

        let second = scene.resize(1024.0, 768.0, 2.0);
        assert_eq!(first, second);
        assert_eq!(scene.camera, camera_after_first);
        assert_eq!(scene.viewport, Viewport::new(1024.0, 768.0, 2.0));
    }

    #[test]
    fn test_bad_default_color_is_reported() {
        let params = SceneParams {
            colors: ColorDefaults {
                depth_color: "navy".to_string(),
                ..ColorDefaults::default()
            },
            ..SceneParams::default()
        };
        let result = SceneState::new(
            &params,
            &RenderConfig::default(),
            Viewport::new(10.0, 10.0, 1.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_water_uniforms_follow_camera() {
        let mut scene = small_scene();
        let before = scene.water_uniforms().unwrap();
        scene.resize(500.0, 500.0, 1.0);
        let after = scene.water_uniforms().unwrap();

        assert_ne!(before.projection, after.projection);
        assert_eq!(before.view, after.view);
        assert_eq!(after.model, water_model_matrix().to_cols_array_2d());
    }
}
