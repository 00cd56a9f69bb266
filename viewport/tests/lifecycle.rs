//! Integration tests for the viewport mount/resize/frame/unmount lifecycle
//!
//! Runs against recording doubles, so no GPU or browser is involved.

mod common;

use common::{TestHost, TestRenderer};
use viewport::{MountStatus, Viewport, ViewportConfig, ViewportError, ViewportState, WindowSize};

fn new_viewport() -> Viewport<TestRenderer> {
    Viewport::new(ViewportConfig::default(), TestRenderer::new())
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn test_missing_mount_point_creates_nothing() {
    let mut host = TestHost::without_mount_point(800, 600);
    let mut viewport = new_viewport();

    let status = viewport.mount(&mut host).unwrap();

    assert_eq!(status, MountStatus::MountPointMissing);
    assert_eq!(viewport.state(), ViewportState::Unmounted);
    assert!(host.listeners.is_empty());
    assert!(host.pending_frames.is_empty());
    assert!(viewport.scene().is_empty());
    assert!(viewport.renderer().size.is_none());
    assert_eq!(viewport.renderer().renders, 0);
}

#[test]
fn test_mount_attaches_exactly_one_output_element() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();

    assert_eq!(viewport.mount(&mut host).unwrap(), MountStatus::Mounted);

    assert_eq!(viewport.state(), ViewportState::Mounted);
    assert_eq!(host.children(), ["canvas-0".to_string()]);
    assert_eq!(host.listeners.len(), 1);
    assert_eq!(viewport.scene().len(), 1);
    assert_eq!(viewport.camera().position.z, 5.0);
    assert_eq!(viewport.renderer().clear_color, Some([0.0, 0.0, 0.0, 1.0]));
}

#[test]
fn test_mount_sizes_renderer_and_camera() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();

    let size = viewport.renderer().size.unwrap();
    assert_eq!((size.width, size.height), (800, 600));
    assert!(approx(viewport.camera().aspect, 800.0 / 600.0));
}

#[test]
fn test_mount_renders_first_frame_and_schedules_next() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();

    assert_eq!(viewport.renderer().renders, 1);
    assert_eq!(host.pending_frames.len(), 1);
}

#[test]
fn test_each_frame_rotates_cube_on_two_axes() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();

    for _ in 0..9 {
        host.tick(&mut viewport);
    }

    let rotation = viewport.cube().unwrap().rotation;
    assert!(approx(rotation.x, 0.1));
    assert!(approx(rotation.y, 0.1));
    assert_eq!(rotation.z, 0.0);
    assert_eq!(viewport.renderer().renders, 10);
    assert_eq!(viewport.frame_count(), 10);
    // Never more than one frame in flight
    assert_eq!(host.pending_frames.len(), 1);
}

#[test]
fn test_resize_updates_camera_and_renderer() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();

    host.resize(&mut viewport, 1024, 768);
    let size = viewport.renderer().size.unwrap();
    assert_eq!((size.width, size.height), (1024, 768));
    assert!(approx(viewport.camera().aspect, 1024.0 / 768.0));

    host.resize(&mut viewport, 1920, 1080);
    let size = viewport.renderer().size.unwrap();
    assert_eq!((size.width, size.height), (1920, 1080));
    assert!(approx(viewport.camera().aspect, 1920.0 / 1080.0));

    host.tick(&mut viewport);
    assert!(approx(viewport.renderer().last_aspect.unwrap(), 1920.0 / 1080.0));
}

#[test]
fn test_unmount_detaches_and_disposes_once() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();

    viewport.unmount(&mut host);

    assert_eq!(viewport.state(), ViewportState::Disposed);
    assert!(host.children().is_empty());
    assert!(host.listeners.is_empty());
    assert!(viewport.scene().is_empty());
    let renderer = viewport.renderer();
    assert_eq!(renderer.geometry_disposals, 1);
    assert_eq!(renderer.material_disposals, 1);
    assert_eq!(renderer.renderer_disposals, 1);

    // A second unmount is a no-op
    viewport.unmount(&mut host);
    let renderer = viewport.renderer();
    assert_eq!(renderer.geometry_disposals, 1);
    assert_eq!(renderer.material_disposals, 1);
    assert_eq!(renderer.renderer_disposals, 1);
}

#[test]
fn test_nothing_disposed_before_mount() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();

    viewport.unmount(&mut host);

    let renderer = viewport.renderer();
    assert_eq!(renderer.geometry_disposals, 0);
    assert_eq!(renderer.material_disposals, 0);
    assert_eq!(renderer.renderer_disposals, 0);
    assert_eq!(viewport.state(), ViewportState::Unmounted);
}

#[test]
fn test_unmount_cancels_pending_frame() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();
    let pending = host.pending_frames[0];

    viewport.unmount(&mut host);

    assert!(host.pending_frames.is_empty());
    assert_eq!(host.cancelled_frames, vec![pending]);
}

#[test]
fn test_stale_frame_after_unmount_is_ignored() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();
    viewport.unmount(&mut host);
    let renders = viewport.renderer().renders;

    // A callback already dispatched by the platform still arrives
    viewport.on_frame(&mut host);

    assert_eq!(viewport.renderer().renders, renders);
    assert!(host.pending_frames.is_empty());
}

#[test]
fn test_resize_after_unmount_is_ignored() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();
    viewport.unmount(&mut host);

    host.size = WindowSize::new(1024, 768);
    viewport.on_resize(&host);

    let size = viewport.renderer().size.unwrap();
    assert_eq!((size.width, size.height), (800, 600));
}

#[test]
fn test_unmount_skips_detach_when_already_removed() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();

    // Something else cleared the mount point
    host.mount_point = Some(Vec::new());
    viewport.unmount(&mut host);

    assert!(host.children().is_empty());
    assert_eq!(viewport.renderer().renderer_disposals, 1);
}

#[test]
fn test_mount_twice_is_rejected() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();

    let err = viewport.mount(&mut host).unwrap_err();

    assert!(matches!(err, ViewportError::AlreadyMounted));
    assert_eq!(host.children().len(), 1);
    assert_eq!(host.listeners.len(), 1);
}

#[test]
fn test_remount_after_dispose_is_rejected() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();
    viewport.mount(&mut host).unwrap();
    viewport.unmount(&mut host);

    let err = viewport.mount(&mut host).unwrap_err();

    assert!(matches!(err, ViewportError::Disposed));
    assert!(host.children().is_empty());
}

#[test]
fn test_failed_listener_registration_rolls_back() {
    let mut host = TestHost::new(800, 600);
    host.fail_listener = true;
    let mut viewport = new_viewport();

    let err = viewport.mount(&mut host).unwrap_err();

    assert!(matches!(err, ViewportError::Host(_)));
    assert_eq!(viewport.state(), ViewportState::Unmounted);
    assert!(host.children().is_empty());
    assert!(viewport.scene().is_empty());
    assert!(host.pending_frames.is_empty());
}

#[test]
fn test_rollback_reports_listener_error_when_detach_fails() {
    let mut host = TestHost::new(800, 600);
    host.fail_listener = true;
    host.fail_detach = true;
    let mut viewport = new_viewport();

    let err = viewport.mount(&mut host).unwrap_err();

    assert_eq!(err.to_string(), "Host error: listener registration refused");
    assert_eq!(viewport.state(), ViewportState::Unmounted);
    assert!(viewport.scene().is_empty());
    assert!(host.listeners.is_empty());
}

#[test]
fn test_render_failure_keeps_animating() {
    let mut host = TestHost::new(800, 600);
    let mut renderer = TestRenderer::new();
    renderer.fail_render = true;
    let mut viewport = Viewport::new(ViewportConfig::default(), renderer);
    viewport.mount(&mut host).unwrap();

    host.tick(&mut viewport);

    assert_eq!(viewport.frame_count(), 0);
    assert_eq!(host.pending_frames.len(), 1);
    assert!(approx(viewport.cube().unwrap().rotation.x, 0.02));
}

#[test]
fn test_rendering_resumes_after_surface_recovers() {
    let mut host = TestHost::new(800, 600);
    let mut renderer = TestRenderer::new();
    renderer.lost_frames = 2;
    let mut viewport = Viewport::new(ViewportConfig::default(), renderer);
    viewport.mount(&mut host).unwrap();

    host.tick(&mut viewport);
    assert_eq!(viewport.frame_count(), 0);

    host.tick(&mut viewport);
    host.tick(&mut viewport);
    assert_eq!(viewport.frame_count(), 2);
    assert_eq!(viewport.renderer().renders, 2);
    assert!(approx(viewport.renderer().last_rotation.unwrap().x, 0.04));
    assert_eq!(host.pending_frames.len(), 1);
}

#[test]
fn test_config_drives_scene() {
    let config = ViewportConfig::from_toml_str(
        r#"
        background = [0.1, 0.1, 0.2, 1.0]
        [camera]
        distance = 3.0
        [cube]
        width = 2.0
        color = 0xff0000
        [animation]
        rotation_step = 0.5
        "#,
    )
    .unwrap();
    let mut host = TestHost::new(800, 600);
    let mut viewport = Viewport::new(config, TestRenderer::new());
    viewport.mount(&mut host).unwrap();

    assert_eq!(viewport.config().animation.rotation_step, 0.5);
    let cube = viewport.cube().unwrap();
    assert_eq!(cube.geometry.width, 2.0);
    assert_eq!(cube.material.color(), [1.0, 0.0, 0.0, 1.0]);
    assert!(approx(cube.rotation.x, 0.5));
    assert_eq!(viewport.camera().position.z, 3.0);
    assert_eq!(viewport.renderer().clear_color, Some([0.1, 0.1, 0.2, 1.0]));
}

#[test]
fn test_scenario_800x600_to_1024x768() {
    let mut host = TestHost::new(800, 600);
    let mut viewport = new_viewport();

    viewport.mount(&mut host).unwrap();
    assert!(approx(viewport.camera().aspect, 1.3333334));

    host.resize(&mut viewport, 1024, 768);
    assert!(approx(viewport.camera().aspect, 1.3333334));
    let size = viewport.renderer().size.unwrap();
    assert_eq!((size.width, size.height), (1024, 768));

    viewport.unmount(&mut host);
    assert!(host.children().is_empty());
    assert_eq!(viewport.renderer().renderer_disposals, 1);
}
