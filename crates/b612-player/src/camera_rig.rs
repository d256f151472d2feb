//! On-surface camera rig: smooth follow while the agent walks, manual orbit
//! around the look target otherwise.
//!
//! Both modes treat the surface normal as "up". In follow mode the camera's
//! up is hard-assigned from the agent's local up every frame; in manual orbit
//! it is only ever rotated (or pinned), never blended.

use b612_input::OrbitAxes;
use b612_surface::{Pose, SoftPushBack, Sphere};
use glam::{DQuat, DVec3};
use tracing::trace;

use crate::CameraState;

/// What happens to `camera.up` when the camera is tilted up or down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpPolicy {
    /// Tilting rotates `up` by the same rotation as the position, so the
    /// camera can roll over a sphere whose "up" is not world +Y.
    #[default]
    RotateWithTilt,
    /// `up` is forced to world +Y and never rotates.
    PinnedWorldY,
}

/// The thing being followed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowTarget {
    pub position: DVec3,
    /// Direction the target is facing; the camera sits behind it.
    pub direction: DVec3,
    /// Surface normal at the target.
    pub local_up: DVec3,
}

impl FollowTarget {
    pub fn from_pose(pose: &Pose) -> Self {
        Self {
            position: pose.position,
            direction: pose.forward(),
            local_up: pose.up(),
        }
    }
}

/// One of the two mutually exclusive per-frame updates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RigMode {
    Follow(FollowTarget),
    ManualOrbit(OrbitAxes),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub back_distance: f64,
    pub lift_height: f64,
    /// Lerp factor per frame toward the follow position.
    pub smoothing: f64,
    /// Orbit angle per frame in radians.
    pub rotate_step: f64,
    pub up_policy: UpPolicy,
    /// Keeps the camera from swinging through the sphere it orbits.
    pub push_back: Option<SoftPushBack>,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            back_distance: 10.0,
            lift_height: 2.0,
            smoothing: 0.1,
            rotate_step: 0.02,
            up_policy: UpPolicy::RotateWithTilt,
            push_back: Some(SoftPushBack::default()),
        }
    }
}

impl CameraRig {
    /// Run one frame of `mode`, apply push-back against `sphere`, and point
    /// the camera at its target.
    pub fn update(&self, camera: &mut CameraState, mode: RigMode, sphere: Option<&Sphere>) {
        match mode {
            RigMode::Follow(target) => self.follow(camera, &target),
            RigMode::ManualOrbit(axes) => self.orbit(camera, axes),
        }
        if let (Some(push_back), Some(sphere)) = (self.push_back, sphere) {
            push_back.apply(&mut camera.position, sphere);
        }
        camera.look_at_target();
        trace!(
            position = ?camera.position,
            up = ?camera.up,
            target = ?camera.target,
            "camera rig"
        );
    }

    fn follow(&self, camera: &mut CameraState, target: &FollowTarget) {
        let local_up = target.local_up.normalize_or_zero();
        let offset = -target.direction * self.back_distance + local_up * self.lift_height;
        let desired = target.position + offset;

        camera.position = camera.position.lerp(desired, self.smoothing);
        if local_up != DVec3::ZERO {
            camera.up = target.local_up;
        }
        camera.target = target.position;
    }

    fn orbit(&self, camera: &mut CameraState, axes: OrbitAxes) {
        if self.up_policy == UpPolicy::PinnedWorldY {
            camera.up = DVec3::Y;
        }
        let Some(up) = camera.up.try_normalize() else {
            return;
        };
        let pivot = camera.target;

        if axes.yaw != 0 {
            let rotation = DQuat::from_axis_angle(up, self.rotate_step * f64::from(axes.yaw));
            camera.position = pivot + rotation * (camera.position - pivot);
        }

        if axes.pitch != 0 {
            let from_target = (camera.position - pivot).normalize_or_zero();
            // Looking straight along `up`: there is no tilt axis.
            let Some(axis) = from_target.cross(up).try_normalize() else {
                return;
            };
            let rotation = DQuat::from_axis_angle(axis, self.rotate_step * f64::from(axes.pitch));
            camera.position = pivot + rotation * (camera.position - pivot);
            if self.up_policy == UpPolicy::RotateWithTilt {
                camera.up = (rotation * up).normalize();
            }
        }
    }
}
