use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World-space position and orientation of a target or reference origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// World transform of this pose, optionally uniformly scaled.
    pub fn to_matrix(&self, scale: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(scale), self.orientation, self.position)
    }

    pub fn transformed_by(&self, m: &Mat4) -> Pose {
        let (_, rot, _) = m.to_scale_rotation_translation();
        Pose {
            position: m.transform_point3(self.position),
            orientation: (rot * self.orientation).normalize(),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::IDENTITY
    }
}
