//! Camera state shared by every camera controller.

use b612_surface::look_rotation;
use glam::{DQuat, DVec3};

/// World-space camera. `up` is always assigned from a surface normal or a
/// rotation of the previous up, never accumulated by blending.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: DVec3,
    pub up: DVec3,
    /// Look target and orbit pivot.
    pub target: DVec3,
    /// Derived from the other three by [`CameraState::look_at_target`].
    pub orientation: DQuat,
}

impl CameraState {
    /// Camera at `position` looking at `target` with `up` as its up hint.
    pub fn new(position: DVec3, target: DVec3, up: DVec3) -> Self {
        let mut camera = Self {
            position,
            up,
            target,
            orientation: DQuat::IDENTITY,
        };
        camera.look_at_target();
        camera
    }

    /// Point local -Z at the target. Keeps the previous orientation when the
    /// view is degenerate (camera on the target or looking along `up`).
    pub fn look_at_target(&mut self) {
        if let Some(orientation) = look_rotation(self.position, self.target, self.up) {
            self.orientation = orientation;
        }
    }

    /// Unit view direction; falls back to the orientation's forward axis
    /// when the camera sits on its target.
    pub fn view_dir(&self) -> DVec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(self.orientation * DVec3::NEG_Z)
    }
}
