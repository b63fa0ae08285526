//! Camera Tests - Orbit, Damping and Matrices
//!
//! Tests for the damped orbit camera driven the way the viewer drives it.

use glam::{Mat4, Vec3, Vec4};
use ridgeline_engine::camera::{DAMPING_FACTOR, OrbitCamera, OrbitMouseButton};

fn settle(camera: &mut OrbitCamera) {
    for _ in 0..2000 {
        camera.update();
    }
}

// ============================================================================
// Initial Pose
// ============================================================================

#[test]
fn test_default_eye_and_target() {
    let camera = OrbitCamera::new(16.0 / 9.0);
    let eye = camera.eye();
    assert!((eye - Vec3::new(0.0, 1.05, 1.1)).length() < 1e-5);
    assert_eq!(camera.target, Vec3::ZERO);
    assert_eq!(camera.fov, 75.0);
    assert_eq!(camera.near, 0.1);
    assert_eq!(camera.far, 100.0);
}

#[test]
fn test_target_projects_to_screen_center() {
    let camera = OrbitCamera::new(1.5);
    let vp = Mat4::from_cols_array_2d(&camera.view_projection_matrix());
    let clip = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = clip / clip.w;
    assert!(ndc.x.abs() < 1e-5);
    assert!(ndc.y.abs() < 1e-5);
    assert!((0.0..=1.0).contains(&ndc.z));
}

#[test]
fn test_view_projection_is_product() {
    let camera = OrbitCamera::new(1.0);
    let view = Mat4::from_cols_array_2d(&camera.view_matrix());
    let proj = Mat4::from_cols_array_2d(&camera.projection_matrix());
    let vp = Mat4::from_cols_array_2d(&camera.view_projection_matrix());
    assert!((proj * view).abs_diff_eq(vp, 1e-5));
}

// ============================================================================
// Damped Motion
// ============================================================================

#[test]
fn test_orbit_drag_moves_gradually() {
    let mut camera = OrbitCamera::new(1.0);
    let start = camera.azimuth;

    camera.handle_mouse_move(100.0, 100.0);
    camera.handle_mouse_button(OrbitMouseButton::Left, true);
    camera.handle_mouse_move(110.0, 100.0);
    camera.handle_mouse_button(OrbitMouseButton::Left, false);
    assert!(camera.is_moving());

    camera.update();
    let first_step = camera.azimuth - start;
    // -10px * 0.3 deg/px, damped
    assert!((first_step + 3.0 * DAMPING_FACTOR).abs() < 1e-4);

    settle(&mut camera);
    assert!(!camera.is_moving());
    assert!((camera.azimuth - start + 3.0).abs() < 0.01);
}

#[test]
fn test_motion_without_button_is_ignored() {
    let mut camera = OrbitCamera::new(1.0);
    camera.handle_mouse_move(0.0, 0.0);
    camera.handle_mouse_move(300.0, 200.0);
    assert!(!camera.is_moving());
    assert!(!camera.is_active());
}

#[test]
fn test_elevation_clamped() {
    let mut camera = OrbitCamera::new(1.0);
    camera.handle_mouse_move(0.0, 0.0);
    camera.handle_mouse_button(OrbitMouseButton::Left, true);
    camera.handle_mouse_move(0.0, 100_000.0);
    settle(&mut camera);
    assert!(camera.elevation <= 89.0);
    assert!(camera.eye().y > 0.0);
}

#[test]
fn test_scroll_zoom_clamped() {
    let mut camera = OrbitCamera::new(1.0);
    let start = camera.distance;
    camera.handle_scroll(1.0);
    camera.update();
    assert!(camera.distance < start);

    for _ in 0..500 {
        camera.handle_scroll(5.0);
        camera.update();
    }
    assert!(camera.distance >= 0.2);

    for _ in 0..500 {
        camera.handle_scroll(-5.0);
        camera.update();
    }
    assert!(camera.distance <= 50.0);
}

#[test]
fn test_pan_moves_target() {
    let mut camera = OrbitCamera::new(1.0);
    camera.handle_mouse_move(0.0, 0.0);
    camera.handle_mouse_button(OrbitMouseButton::Right, true);
    camera.handle_mouse_move(50.0, 0.0);
    settle(&mut camera);
    assert!(camera.target.length() > 0.0);
    assert!(camera.target.y.abs() < 1e-4);
}

#[test]
fn test_reset_restores_home() {
    let mut camera = OrbitCamera::new(1.0);
    let eye = camera.eye();
    camera.handle_scroll(2.0);
    camera.handle_mouse_move(0.0, 0.0);
    camera.handle_mouse_button(OrbitMouseButton::Left, true);
    camera.handle_mouse_move(80.0, 40.0);
    settle(&mut camera);

    camera.reset();
    assert!((camera.eye() - eye).length() < 1e-5);
    assert!(!camera.is_moving());
}

#[test]
fn test_resize_updates_aspect() {
    let mut camera = OrbitCamera::new(1.0);
    camera.resize(1920, 1080);
    assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
    camera.resize(0, 1080);
    assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
}
