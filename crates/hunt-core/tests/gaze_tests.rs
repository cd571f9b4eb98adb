use glam::Vec3;
use hunt_core::{detect, ray_sphere, GazeRay, HeadPose};

fn gaze_from(origin: Vec3, dir: Vec3) -> GazeRay {
    GazeRay {
        origin,
        dir,
        active: true,
    }
}

#[test]
fn ray_sphere_hit_in_front() {
    let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0);
    assert!(t.is_some());
    let t = t.unwrap();
    assert!(t > 0.0 && t < 10.0);
}

#[test]
fn ray_sphere_miss() {
    let t = ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 5.0), 2.0);
    assert!(t.is_none());
}

#[test]
fn ray_sphere_behind_origin_is_rejected() {
    let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 2.0);
    assert!(t.is_none());
}

#[test]
fn detect_returns_hit_point_on_sphere() {
    let gaze = gaze_from(Vec3::ZERO, Vec3::Z);
    let head = HeadPose {
        position: Vec3::ZERO,
        forward: Vec3::Z,
    };
    let center = Vec3::new(0.0, 0.0, 1.0);
    let hit = detect(&gaze, &head, center, 0.1, None).expect("straight-on gaze should hit");
    // Entry point of the ray is the near side of the sphere.
    assert!((hit.z - 0.9).abs() < 1e-4);
}

#[test]
fn detect_requires_active_tracking() {
    let gaze = GazeRay {
        origin: Vec3::ZERO,
        dir: Vec3::Z,
        active: false,
    };
    let head = HeadPose::default();
    assert!(detect(&gaze, &head, Vec3::new(0.0, 0.0, 1.0), 0.5, None).is_none());
}

#[test]
fn distance_gate_blocks_far_targets() {
    let gaze = gaze_from(Vec3::ZERO, Vec3::Z);
    let head = HeadPose {
        position: Vec3::ZERO,
        forward: Vec3::Z,
    };
    let center = Vec3::new(0.0, 0.0, 3.0);
    // Hunt-mode gate: player is 3m away, gate is 2m.
    assert!(detect(&gaze, &head, center, 0.2, Some(2.0)).is_none());
    // Design mode has no gate.
    assert!(detect(&gaze, &head, center, 0.2, None).is_some());
}

#[test]
fn unnormalized_gaze_direction_is_tolerated() {
    let gaze = gaze_from(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0));
    let head = HeadPose {
        position: Vec3::ZERO,
        forward: Vec3::Z,
    };
    assert!(detect(&gaze, &head, Vec3::new(0.0, 0.0, 1.0), 0.1, None).is_some());
}
