//! Orbit Camera
//!
//! A spherical-coordinate perspective camera that orbits a target point,
//! with inertia: input accumulates pending motion and `update()` applies a
//! fraction of it each frame, letting the rest decay.
//!
//! Controls:
//! - Left mouse drag: Orbit (rotate around target)
//! - Middle mouse drag: Dolly (move toward/away from target)
//! - Right mouse drag: Pan (translate target point)
//! - Scroll wheel: Zoom

use glam::{Mat4, Vec3};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Vertical field of view in degrees.
pub const DEFAULT_FOV: f32 = 75.0;
/// Near clip plane.
pub const DEFAULT_NEAR: f32 = 0.1;
/// Far clip plane.
pub const DEFAULT_FAR: f32 = 100.0;
/// Initial eye position.
pub const DEFAULT_EYE: Vec3 = Vec3::new(0.0, 1.05, 1.1);

/// Fraction of pending motion applied per `update()`.
pub const DAMPING_FACTOR: f32 = 0.05;

const MIN_DISTANCE: f32 = 0.2;
const MAX_DISTANCE: f32 = 50.0;
const MIN_ELEVATION: f32 = -89.0;
const MAX_ELEVATION: f32 = 89.0;

/// Orbit sensitivity: degrees per pixel of mouse movement.
const ORBIT_SENSITIVITY: f32 = 0.3;
/// Pan sensitivity factor: multiplied by distance for depth-proportional panning.
const PAN_SENSITIVITY: f32 = 0.002;
/// Scroll zoom factor: how much each scroll tick affects distance.
const SCROLL_FACTOR: f32 = 0.1;
/// Dolly per pixel of vertical middle-drag.
const DOLLY_SENSITIVITY: f32 = 0.005;

/// Pending motion below this is dropped.
const SETTLE_EPSILON: f32 = 1e-5;

// ============================================================================
// MOUSE BUTTON ENUM
// ============================================================================

/// Mouse buttons the orbit camera reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitMouseButton {
    /// Orbit
    Left,
    /// Dolly
    Middle,
    /// Pan
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pose {
    azimuth: f32,
    elevation: f32,
    distance: f32,
    target: Vec3,
}

// ============================================================================
// ORBIT CAMERA
// ============================================================================

/// Damped orbit camera.
///
/// # Coordinate System
/// - Azimuth: horizontal angle in degrees, 0 looks down -Z from +Z
/// - Elevation: vertical angle in degrees (clamped -89 to 89)
/// - Distance: from target (clamped 0.2 to 50.0)
/// - Y is up
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
    pub target: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    // Pending motion, drained by update()
    azimuth_delta: f32,
    elevation_delta: f32,
    pan_delta: Vec3,
    zoom_scale: f32,

    orbiting: bool,
    dollying: bool,
    panning: bool,
    last_mouse: Option<[f32; 2]>,
    home: Pose,
}

impl OrbitCamera {
    /// Camera at the default eye position looking at the origin.
    pub fn new(aspect: f32) -> Self {
        Self::looking_at(DEFAULT_EYE, Vec3::ZERO, aspect)
    }

    /// Camera placed at `eye` orbiting `target`.
    pub fn looking_at(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
        let home = Pose {
            azimuth: offset.x.atan2(offset.z).to_degrees(),
            elevation: offset
                .y
                .atan2(horizontal)
                .to_degrees()
                .clamp(MIN_ELEVATION, MAX_ELEVATION),
            distance,
            target,
        };

        Self {
            azimuth: home.azimuth,
            elevation: home.elevation,
            distance: home.distance,
            target,
            aspect,
            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            azimuth_delta: 0.0,
            elevation_delta: 0.0,
            pan_delta: Vec3::ZERO,
            zoom_scale: 1.0,
            orbiting: false,
            dollying: false,
            panning: false,
            last_mouse: None,
            home,
        }
    }

    // ========================================================================
    // MATRIX COMPUTATION
    // ========================================================================

    /// Unit vector from target toward the eye.
    fn direction(&self) -> Vec3 {
        let azim = self.azimuth.to_radians();
        let elev = self.elevation.to_radians();
        let cos_elev = elev.cos();
        Vec3::new(cos_elev * azim.sin(), elev.sin(), cos_elev * azim.cos())
    }

    /// World-space eye position.
    pub fn eye(&self) -> Vec3 {
        self.target + self.direction() * self.distance
    }

    /// Column-major look-at matrix.
    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y).to_cols_array_2d()
    }

    /// Perspective projection with wgpu's [0, 1] depth range.
    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        self.projection().to_cols_array_2d()
    }

    /// `projection * view`
    pub fn view_projection_matrix(&self) -> [[f32; 4]; 4] {
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        (self.projection() * view).to_cols_array_2d()
    }

    fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    // ========================================================================
    // INPUT HANDLING
    // ========================================================================

    /// Start or stop a drag with `button`.
    pub fn handle_mouse_button(&mut self, button: OrbitMouseButton, pressed: bool) {
        match button {
            OrbitMouseButton::Left => self.orbiting = pressed,
            OrbitMouseButton::Middle => self.dollying = pressed,
            OrbitMouseButton::Right => self.panning = pressed,
        }
    }

    /// Handle cursor movement. Call on every `CursorMoved` event.
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) {
        let Some([last_x, last_y]) = self.last_mouse.replace([x, y]) else {
            return;
        };
        let dx = x - last_x;
        let dy = y - last_y;

        if self.orbiting {
            self.azimuth_delta -= dx * ORBIT_SENSITIVITY;
            self.elevation_delta += dy * ORBIT_SENSITIVITY;
        }
        if self.dollying {
            self.zoom_scale *= 1.0 + dy * DOLLY_SENSITIVITY;
        }
        if self.panning {
            self.pan(-dx * PAN_SENSITIVITY * self.distance, dy * PAN_SENSITIVITY * self.distance);
        }
    }

    /// Handle scroll wheel input. Positive delta zooms in.
    pub fn handle_scroll(&mut self, delta: f32) {
        self.zoom_scale *= (1.0 - delta * SCROLL_FACTOR).max(0.1);
    }

    /// Queue a pan of the target in camera-local right/up directions.
    fn pan(&mut self, dx: f32, dy: f32) {
        let toward_eye = self.direction();
        let right = Vec3::Y.cross(toward_eye).normalize_or_zero();
        let up = toward_eye.cross(right).normalize_or_zero();
        self.pan_delta += right * dx + up * dy;
    }

    /// Apply damped motion. Call once per frame.
    pub fn update(&mut self) {
        self.azimuth += self.azimuth_delta * DAMPING_FACTOR;
        self.elevation = (self.elevation + self.elevation_delta * DAMPING_FACTOR)
            .clamp(MIN_ELEVATION, MAX_ELEVATION);
        self.target += self.pan_delta * DAMPING_FACTOR;
        self.distance = (self.distance * self.zoom_scale).clamp(MIN_DISTANCE, MAX_DISTANCE);

        let decay = 1.0 - DAMPING_FACTOR;
        self.azimuth_delta *= decay;
        self.elevation_delta *= decay;
        self.pan_delta *= decay;
        self.zoom_scale = 1.0;

        if self.azimuth_delta.abs() < SETTLE_EPSILON {
            self.azimuth_delta = 0.0;
        }
        if self.elevation_delta.abs() < SETTLE_EPSILON {
            self.elevation_delta = 0.0;
        }
        if self.pan_delta.length_squared() < SETTLE_EPSILON * SETTLE_EPSILON {
            self.pan_delta = Vec3::ZERO;
        }
    }

    /// Update the viewport aspect ratio after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// `true` while a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.orbiting || self.dollying || self.panning
    }

    /// `true` while damped motion is still pending.
    pub fn is_moving(&self) -> bool {
        self.azimuth_delta != 0.0 || self.elevation_delta != 0.0 || self.pan_delta != Vec3::ZERO
    }

    /// Return to the starting pose and drop pending motion.
    pub fn reset(&mut self) {
        self.azimuth = self.home.azimuth;
        self.elevation = self.home.elevation;
        self.distance = self.home.distance;
        self.target = self.home.target;
        self.azimuth_delta = 0.0;
        self.elevation_delta = 0.0;
        self.pan_delta = Vec3::ZERO;
        self.zoom_scale = 1.0;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn settle(cam: &mut OrbitCamera) {
        for _ in 0..1000 {
            cam.update();
        }
    }

    #[test]
    fn test_new_starts_at_default_eye() {
        let cam = OrbitCamera::new(16.0 / 9.0);
        let eye = cam.eye();
        assert!((eye - DEFAULT_EYE).length() < EPSILON, "eye {eye:?}");
        assert!(approx_eq(cam.fov, 75.0));
        assert!(approx_eq(cam.near, 0.1));
        assert!(approx_eq(cam.far, 100.0));
    }

    #[test]
    fn test_first_move_only_records_position() {
        let mut cam = OrbitCamera::new(1.0);
        cam.handle_mouse_button(OrbitMouseButton::Left, true);
        cam.handle_mouse_move(500.0, 500.0);
        assert!(!cam.is_moving());
    }

    #[test]
    fn test_orbit_is_damped_and_converges() {
        let mut cam = OrbitCamera::new(1.0);
        let start = cam.azimuth;
        cam.handle_mouse_move(100.0, 100.0);
        cam.handle_mouse_button(OrbitMouseButton::Left, true);
        cam.handle_mouse_move(200.0, 100.0);

        // Nothing moves until update
        assert!(approx_eq(cam.azimuth, start));

        cam.update();
        let after_one = cam.azimuth;
        assert!(approx_eq(after_one, start - 100.0 * ORBIT_SENSITIVITY * DAMPING_FACTOR));

        settle(&mut cam);
        assert!((cam.azimuth - (start - 100.0 * ORBIT_SENSITIVITY)).abs() < 1e-2);
        assert!(!cam.is_moving());
    }

    #[test]
    fn test_elevation_clamped() {
        let mut cam = OrbitCamera::new(1.0);
        cam.handle_mouse_move(100.0, 100.0);
        cam.handle_mouse_button(OrbitMouseButton::Left, true);
        cam.handle_mouse_move(100.0, 5000.0);
        settle(&mut cam);
        assert!(cam.elevation <= MAX_ELEVATION);

        cam.handle_mouse_move(100.0, -20000.0);
        settle(&mut cam);
        assert!(cam.elevation >= MIN_ELEVATION);
    }

    #[test]
    fn test_scroll_zoom_and_clamp() {
        let mut cam = OrbitCamera::new(1.0);
        let initial = cam.distance;
        cam.handle_scroll(1.0);
        cam.update();
        assert!(cam.distance < initial);

        for _ in 0..200 {
            cam.handle_scroll(5.0);
            cam.update();
        }
        assert!(cam.distance >= MIN_DISTANCE);

        for _ in 0..200 {
            cam.handle_scroll(-5.0);
            cam.update();
        }
        assert!(cam.distance <= MAX_DISTANCE);
    }

    #[test]
    fn test_pan_moves_target() {
        let mut cam = OrbitCamera::new(1.0);
        cam.handle_mouse_move(100.0, 100.0);
        cam.handle_mouse_button(OrbitMouseButton::Right, true);
        cam.handle_mouse_move(200.0, 200.0);
        settle(&mut cam);
        assert!(cam.target != Vec3::ZERO, "Panning should move the target");
    }

    #[test]
    fn test_no_movement_without_drag() {
        let mut cam = OrbitCamera::new(1.0);
        let before = (cam.azimuth, cam.elevation, cam.target);
        cam.handle_mouse_move(100.0, 100.0);
        cam.handle_mouse_move(300.0, 250.0);
        settle(&mut cam);
        assert_eq!((cam.azimuth, cam.elevation, cam.target), before);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut cam = OrbitCamera::new(1.5);
        cam.resize(1920, 1080);
        assert!(approx_eq(cam.aspect, 1920.0 / 1080.0));
        cam.resize(0, 0);
        assert!(approx_eq(cam.aspect, 1920.0 / 1080.0), "Zero resize should be ignored");
    }

    #[test]
    fn test_is_active() {
        let mut cam = OrbitCamera::new(1.0);
        assert!(!cam.is_active());
        cam.handle_mouse_button(OrbitMouseButton::Left, true);
        assert!(cam.is_active());
        cam.handle_mouse_button(OrbitMouseButton::Left, false);
        assert!(!cam.is_active());
        cam.handle_mouse_button(OrbitMouseButton::Right, true);
        assert!(cam.is_active());
    }

    #[test]
    fn test_reset_returns_home() {
        let mut cam = OrbitCamera::new(1.0);
        cam.azimuth = 180.0;
        cam.distance = 20.0;
        cam.target = Vec3::new(5.0, 3.0, 1.0);
        cam.reset();
        assert!((cam.eye() - DEFAULT_EYE).length() < EPSILON);
    }

    #[test]
    fn test_view_projection_combines_correctly() {
        let cam = OrbitCamera::new(16.0 / 9.0);
        let vp = cam.view_projection_matrix();
        let view = Mat4::from_cols_array_2d(&cam.view_matrix());
        let proj = Mat4::from_cols_array_2d(&cam.projection_matrix());
        let expected = (proj * view).to_cols_array_2d();

        for i in 0..4 {
            for j in 0..4 {
                assert!(
                    (vp[i][j] - expected[i][j]).abs() < 1e-4,
                    "VP matrix mismatch at [{i}][{j}]: {} vs {}",
                    vp[i][j],
                    expected[i][j]
                );
            }
        }
    }
}
