//! Parameter definitions with units and documented semantics.
//!
//! Every tunable starting value lives here:
//! - Wave and color defaults fed to the water shader
//! - Camera lens and orbit-control limits
//! - Window and drawing-buffer configuration

mod camera;
mod ocean;
mod render;

// Re-export all types
pub use camera::{CameraParams, OrbitParams};
pub use ocean::{ColorDefaults, WaveParams};
pub use render::{RenderConfig, MAX_PIXEL_RATIO};
