use glam::Vec3;

/// Per-tick eye-tracking sample. `active` is false whenever the tracking
/// hardware has no valid fix; a stale ray must not trigger detection.
#[derive(Clone, Copy, Debug)]
pub struct GazeRay {
    pub origin: Vec3,
    pub dir: Vec3,
    pub active: bool,
}

impl GazeRay {
    pub fn inactive() -> Self {
        Self {
            origin: Vec3::ZERO,
            dir: Vec3::NEG_Z,
            active: false,
        }
    }
}

/// Per-tick head-pose sample from the tracking service.
#[derive(Clone, Copy, Debug)]
pub struct HeadPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Default for HeadPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
        }
    }
}

/// Everything the engine consumes from the outside world in one tick.
#[derive(Clone, Copy, Debug)]
pub struct TickInput {
    pub dt: f32,
    pub gaze: GazeRay,
    pub head: HeadPose,
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Pure per-tick gaze query against one spherical detection zone.
///
/// Returns the world-space hit point, or `None` when tracking is inactive,
/// the head is beyond `max_distance` from the zone center (the Hunt-mode
/// proximity gate; pass `None` in Design mode), or the ray misses.
pub fn detect(
    gaze: &GazeRay,
    head: &HeadPose,
    center: Vec3,
    radius: f32,
    max_distance: Option<f32>,
) -> Option<Vec3> {
    if !gaze.active {
        return None;
    }
    if let Some(max) = max_distance {
        if head.position.distance(center) >= max {
            return None;
        }
    }
    let dir = gaze.dir.normalize_or_zero();
    ray_sphere(gaze.origin, dir, center, radius).map(|t| gaze.origin + dir * t)
}
