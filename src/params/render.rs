//! Window and drawing-buffer configuration.

/// Upper bound on drawing-buffer pixels per logical pixel
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Initial window width (logical pixels)
    pub window_width: u32,

    /// Initial window height (logical pixels)
    pub window_height: u32,

    /// Plane subdivisions per side (512 = 263,169 vertices)
    pub plane_segments: u32,

    /// Plane edge length (world units)
    pub plane_size: f32,

    /// Width of the debug panel (logical pixels)
    pub panel_width: f32,

    /// Show the debug panel expanded at startup
    pub panel_open: bool,

    /// Background behind the water
    pub clear_color: [f64; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            plane_segments: 512,
            plane_size: 2.0,
            panel_width: 340.0,
            panel_open: false,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}
