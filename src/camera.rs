//! Perspective camera and damped orbit controls.

use std::f32::consts::TAU;

use glam::{Mat4, Vec2, Vec3};

use crate::params::{CameraParams, OrbitParams};

/// Keeps the polar angle off the poles so the view basis never degenerates
const POLAR_EPSILON: f32 = 1e-6;

/// Per-wheel-step dolly factor before `zoom_speed` is applied
const ZOOM_BASE: f32 = 0.95;

/// Perspective camera looking at a target point, +Y up
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(params: &CameraParams, aspect: f32) -> Self {
        let mut camera = Self {
            fov_degrees: params.fov_degrees,
            aspect,
            near: params.near_plane,
            far: params.far_plane,
            position: Vec3::from_array(params.position),
            target: Vec3::from_array(params.target),
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Recompute the cached projection after a lens or aspect change
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        // Always keep Y as up vector (camera never rolls)
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Camera-space right and up axes in world space
    fn basis(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        (right, up)
    }
}

/// Which gesture a held pointer button drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

/// Orbit, dolly and pan a camera around its target.
///
/// Input accumulates into pending deltas; `update` applies them once per
/// frame, with damping easing them out over subsequent frames.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub params: OrbitParams,
    /// Pending azimuth change (radians)
    theta_delta: f32,
    /// Pending polar change (radians)
    phi_delta: f32,
    /// Pending distance multiplier
    scale: f32,
    /// Pending target translation (world units)
    pan_offset: Vec3,
    drag: Option<DragMode>,
    last_pointer: Option<Vec2>,
}

impl OrbitControls {
    pub fn new(params: OrbitParams) -> Self {
        Self {
            params,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            drag: None,
            last_pointer: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Queue a rotation from a pointer movement of (dx, dy) logical pixels
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.theta_delta -= TAU * dx / height * self.params.rotate_speed;
        self.phi_delta -= TAU * dy / height * self.params.rotate_speed;
    }

    /// Queue a dolly step; positive moves closer, negative moves away
    pub fn zoom(&mut self, direction: f32) {
        let step = ZOOM_BASE.powf(self.params.zoom_speed);
        if direction > 0.0 {
            self.scale *= step;
        } else if direction < 0.0 {
            self.scale /= step;
        }
    }

    /// Queue a screen-space pan from a pointer movement of (dx, dy) logical pixels
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32, camera: &PerspectiveCamera) {
        let height = viewport_height.max(1.0);
        let (dx, dy) = (dx * self.params.pan_speed, dy * self.params.pan_speed);

        // Scale so the point under the cursor at target depth follows it
        let half_fov = (camera.fov_degrees.to_radians() / 2.0).tan();
        let target_distance = (camera.position - camera.target).length() * half_fov;

        let (right, up) = camera.basis();
        self.pan_offset -= right * (2.0 * dx * target_distance / height);
        self.pan_offset += up * (2.0 * dy * target_distance / height);
    }

    pub fn pointer_down(&mut self, mode: DragMode, position: Vec2) {
        self.drag = Some(mode);
        self.last_pointer = Some(position);
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
        self.last_pointer = None;
    }

    /// Track pointer motion, feeding the active drag gesture
    pub fn pointer_move(
        &mut self,
        position: Vec2,
        viewport_height: f32,
        camera: &PerspectiveCamera,
    ) {
        let Some(mode) = self.drag else {
            return;
        };
        let delta = self
            .last_pointer
            .map(|last| position - last)
            .unwrap_or(Vec2::ZERO);
        self.last_pointer = Some(position);

        match mode {
            DragMode::Rotate => self.rotate(delta.x, delta.y, viewport_height),
            DragMode::Pan => self.pan(delta.x, delta.y, viewport_height, camera),
        }
    }

    /// Apply pending input to the camera; returns whether the camera moved
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let p = &self.params;
        let offset = camera.position - camera.target;

        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        let applied = if p.enable_damping { p.damping_factor } else { 1.0 };

        theta += self.theta_delta * applied;
        phi += self.phi_delta * applied;
        phi = phi
            .clamp(p.min_polar_angle, p.max_polar_angle)
            .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);

        radius = (radius * self.scale).clamp(p.min_distance, p.max_distance);

        let previous_position = camera.position;
        let previous_target = camera.target;

        camera.target += self.pan_offset * applied;

        let offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.position = camera.target + offset;

        if p.enable_damping {
            let decay = 1.0 - p.damping_factor;
            self.theta_delta *= decay;
            self.phi_delta *= decay;
            self.pan_offset *= decay;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(previous_position) > 1e-12
            || camera.target.distance_squared(previous_target) > 1e-12
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (PerspectiveCamera, OrbitControls) {
        let camera = PerspectiveCamera::new(&CameraParams::default(), 16.0 / 9.0);
        let controls = OrbitControls::new(OrbitParams::default());
        (camera, controls)
    }

    fn polar_angle(camera: &PerspectiveCamera) -> f32 {
        let offset = camera.position - camera.target;
        (offset.y / offset.length()).acos()
    }

    #[test]
    fn test_idle_update_keeps_camera_still() {
        let (mut camera, mut controls) = setup();
        let start = camera.position;
        for _ in 0..10 {
            controls.update(&mut camera);
        }
        assert!((camera.position - start).length() < 1e-5);
    }

    #[test]
    fn test_projection_follows_aspect() {
        let (mut camera, _) = setup();
        let before = camera.projection_matrix();
        camera.aspect = 1.0;
        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
        assert_eq!(
            camera.projection_matrix(),
            Mat4::perspective_rh(75f32.to_radians(), 1.0, 0.1, 100.0)
        );
    }

    #[test]
    fn test_distance_clamps() {
        let (mut camera, mut controls) = setup();

        for _ in 0..200 {
            controls.zoom(1.0);
            controls.update(&mut camera);
        }
        let near = (camera.position - camera.target).length();
        assert!((near - 0.75).abs() < 1e-4, "distance {near}");

        for _ in 0..200 {
            controls.zoom(-1.0);
            controls.update(&mut camera);
        }
        let far = (camera.position - camera.target).length();
        assert!((far - 5.0).abs() < 1e-4, "distance {far}");
    }

    #[test]
    fn test_polar_angle_stays_above_water() {
        let (mut camera, mut controls) = setup();
        let max_polar = controls.params.max_polar_angle;

        // Drag far downward: pushes the camera toward the horizon and beyond
        controls.rotate(0.0, -5000.0, 720.0);
        for _ in 0..300 {
            controls.update(&mut camera);
            assert!(polar_angle(&camera) <= max_polar + 1e-4);
        }
        assert!(camera.position.y > 0.0);
    }

    #[test]
    fn test_damping_eases_out() {
        let (mut camera, mut controls) = setup();
        controls.rotate(100.0, 0.0, 720.0);

        let mut last = camera.position;
        let mut steps = Vec::new();
        for _ in 0..50 {
            controls.update(&mut camera);
            steps.push((camera.position - last).length());
            last = camera.position;
        }

        // Each frame moves less than the one before
        assert!(steps.windows(2).all(|w| w[1] <= w[0] + 1e-6));
        assert!(steps[0] > 0.0);
        assert!(*steps.last().unwrap() < steps[0] * 0.2);
    }

    #[test]
    fn test_without_damping_applies_at_once() {
        let (mut camera, _) = setup();
        let mut controls = OrbitControls::new(OrbitParams {
            enable_damping: false,
            ..OrbitParams::default()
        });

        controls.rotate(100.0, 0.0, 720.0);
        assert!(controls.update(&mut camera));
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_pan_moves_target() {
        let (mut camera, mut controls) = setup();
        controls.pointer_down(DragMode::Pan, Vec2::new(100.0, 100.0));
        controls.pointer_move(Vec2::new(150.0, 100.0), 720.0, &camera);
        controls.pointer_up();
        assert!(!controls.is_dragging());

        for _ in 0..200 {
            controls.update(&mut camera);
        }
        assert!(camera.target.length() > 0.01);
        let distance = (camera.position - camera.target).length();
        assert!((distance - 3f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_move_without_drag_is_ignored() {
        let (mut camera, mut controls) = setup();
        controls.pointer_move(Vec2::new(10.0, 10.0), 720.0, &camera);
        assert!(!controls.update(&mut camera));
    }
}
