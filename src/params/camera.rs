//! Camera lens and orbit-control configuration.

use std::f32::consts::FRAC_PI_2;

/// Perspective camera starting state
#[derive(Debug, Clone)]
pub struct CameraParams {
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Initial eye position (world units)
    pub position: [f32; 3],

    /// Point the camera orbits around
    pub target: [f32; 3],
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 100.0,
            position: [1.0, 1.0, 1.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Orbit-control behaviour and clamps
#[derive(Debug, Clone)]
pub struct OrbitParams {
    /// Smooth input across frames instead of applying it at once
    pub enable_damping: bool,

    /// Fraction of pending input applied per update (0..1)
    pub damping_factor: f32,

    /// Smallest polar angle from +Y (radians)
    pub min_polar_angle: f32,

    /// Largest polar angle from +Y (radians); below PI/2 keeps the camera above the water
    pub max_polar_angle: f32,

    /// Closest allowed eye-to-target distance (world units)
    pub min_distance: f32,

    /// Farthest allowed eye-to-target distance (world units)
    pub max_distance: f32,

    /// Drag-to-rotate sensitivity multiplier
    pub rotate_speed: f32,

    /// Wheel-to-dolly sensitivity multiplier
    pub zoom_speed: f32,

    /// Drag-to-pan sensitivity multiplier
    pub pan_speed: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            min_polar_angle: 0.0,
            max_polar_angle: FRAC_PI_2 - 0.5,
            min_distance: 0.75,
            max_distance: 5.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
        }
    }
}
