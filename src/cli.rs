//! Command-line argument parsing.

use clap::Parser;

use crate::params::RenderConfig;

/// Largest accepted `--segments`; mesh buffers must fit the default device limits
pub const MAX_SEGMENTS: u32 = 2048;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "raging-sea")]
#[command(about = "Animated procedural ocean with a live shader debug panel", long_about = None)]
pub struct Args {
    /// Initial window width (logical pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1280)]
    pub width: u32,

    /// Initial window height (logical pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 720)]
    pub height: u32,

    /// Plane subdivisions per side (1..=2048)
    #[arg(
        long,
        value_name = "N",
        default_value_t = 512,
        value_parser = clap::value_parser!(u32).range(1..=MAX_SEGMENTS as i64)
    )]
    pub segments: u32,

    /// Start with the debug panel expanded
    #[arg(long)]
    pub open_panel: bool,
}

impl Args {
    /// Rendering configuration with the command-line overrides applied
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            plane_segments: self.segments,
            panel_open: self.open_panel,
            ..RenderConfig::default()
        }
    }
}
