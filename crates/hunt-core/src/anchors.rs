use glam::Mat4;

use crate::pose::Pose;

/// World-locked origin all anchors of one save batch are made relative to,
/// so a whole scene re-resolves consistently after restart or drift
/// correction. Created once per save call, never reused across batches.
#[derive(Clone, Copy, Debug)]
pub struct ReferenceFrame {
    origin: Pose,
}

impl ReferenceFrame {
    pub fn new(origin: Pose) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> Pose {
        self.origin
    }

    fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.origin.orientation, self.origin.position)
    }

    /// Express a world-space pose relative to this frame's origin.
    pub fn world_to_frame(&self, pose: &Pose) -> Pose {
        pose.transformed_by(&self.matrix().inverse())
    }

    /// Resolve a frame-relative pose back into world space.
    pub fn frame_to_world(&self, pose: &Pose) -> Pose {
        pose.transformed_by(&self.matrix())
    }
}

/// Durable world-anchor service. Anchors are keyed by target name and
/// survive restarts; saves may silently fail (`save` returns false).
///
/// The service owns drift correction: `resolve` returns the current
/// world-space pose for an anchor, and the engine pulls it every tick
/// instead of subscribing to adjustment callbacks.
pub trait AnchorStore: Send + Sync {
    /// Names of every anchor currently persisted.
    fn list_saved(&self) -> Vec<String>;
    /// Current world-space pose for `name`, if the anchor still resolves.
    fn resolve(&self, name: &str) -> Option<Pose>;
    /// Persist `pose_in_frame` (relative to the batch reference frame)
    /// under `name`, replacing any previous anchor. False on failure.
    fn save(&self, name: &str, frame: &ReferenceFrame, pose_in_frame: &Pose) -> bool;
    fn remove(&self, name: &str);
    /// A fresh world-locked frame at the device's current location.
    fn reference_frame(&self) -> ReferenceFrame;
}
