//! Raging sea - animated procedural ocean with a live shader debug panel

pub mod camera;
pub mod cli;
pub mod color;
pub mod mesh;
pub mod panel;
pub mod params;
pub mod render_loop;
pub mod rendering;
pub mod scene;
pub mod uniforms;
