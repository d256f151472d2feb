//! Position + orientation of a single object.

use glam::{DQuat, DVec3};

/// World pose. Local axes: right = +X, up = +Y, forward = -Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// Origin, no rotation.
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        orientation: DQuat::IDENTITY,
    };

    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// World direction of local +X.
    pub fn right(&self) -> DVec3 {
        self.orientation * DVec3::X
    }

    /// World direction of local +Y.
    pub fn up(&self) -> DVec3 {
        self.orientation * DVec3::Y
    }

    /// World direction of local -Z.
    pub fn forward(&self) -> DVec3 {
        self.orientation * DVec3::NEG_Z
    }

    /// Convert an offset in (right, up, forward) units into a world vector.
    pub fn local_offset(&self, offset: DVec3) -> DVec3 {
        self.right() * offset.x + self.up() * offset.y + self.forward() * offset.z
    }
}
