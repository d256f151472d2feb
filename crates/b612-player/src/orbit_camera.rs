//! Free-orbit camera: slow automatic rotation around the scene.

use glam::{DQuat, DVec3};

use crate::CameraState;

/// Automatic rotation about the world +Y axis through the camera target.
///
/// `speed` uses orbit-controls units: at speed 1 and 60 updates per second
/// the camera makes one revolution per minute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoOrbit {
    pub speed: f64,
}

impl Default for AutoOrbit {
    fn default() -> Self {
        Self { speed: 0.5 }
    }
}

impl AutoOrbit {
    /// Rotation angle per update, in radians.
    pub fn angle_per_frame(&self) -> f64 {
        std::f64::consts::TAU / 60.0 / 60.0 * self.speed
    }

    /// Rotate the camera one update around its target.
    pub fn update(&self, camera: &mut CameraState) {
        let rotation = DQuat::from_rotation_y(self.angle_per_frame());
        camera.position = camera.target + rotation * (camera.position - camera.target);
        camera.up = DVec3::Y;
        camera.look_at_target();
    }
}
