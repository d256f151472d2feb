//! The walking agent.

use b612_surface::{
    Locomotion, Pose, Sphere, SphereId, StepOutcome, SurfaceError, build_frame_or_fallback,
    tangent_component,
};
use glam::DVec3;
use tracing::{debug, warn};

use crate::FollowTarget;

/// Canonical spawn direction on a sphere, as angles from its +Y pole.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    /// Angle from +Y in radians.
    pub polar: f64,
    /// Angle around Y in radians, 0 at +Z.
    pub azimuth: f64,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self {
            polar: std::f64::consts::FRAC_PI_4,
            azimuth: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub pose: Pose,
    /// The sphere the agent is pinned to.
    pub sphere: SphereId,
    pub locomotion: Locomotion,
    pub visible: bool,
    /// True while the last step moved; drives the walk cycle.
    pub walking: bool,
}

impl Agent {
    /// Create a visible agent at `spawn` on `sphere`, standing upright and
    /// facing the sphere's +Y pole (any tangent when standing on a pole).
    pub fn spawn(id: SphereId, sphere: &Sphere, spawn: SpawnPoint, locomotion: Locomotion) -> Self {
        let mut agent = Self {
            pose: Pose::IDENTITY,
            sphere: id,
            locomotion,
            visible: true,
            walking: false,
        };
        agent.respawn(id, sphere, spawn);
        agent
    }

    /// Move the agent to `spawn` on another (or the same) sphere.
    pub fn respawn(&mut self, id: SphereId, sphere: &Sphere, spawn: SpawnPoint) {
        let position = sphere.point_at(spawn.polar, spawn.azimuth, self.locomotion.surface_offset);
        let up = (position - sphere.center()).normalize_or_zero();
        let toward_pole = tangent_component(DVec3::Y, up);

        self.pose = Pose::new(position, build_frame_or_fallback(up, -toward_pole));
        self.sphere = id;
        self.visible = true;
        self.walking = false;
        debug!(sphere = %id, ?position, "agent spawned");
    }

    /// One locomotion step. Errors are logged and leave the agent in place.
    pub fn walk(&mut self, sphere: &Sphere, input_dir: DVec3, dt: f64) -> StepOutcome {
        match self.locomotion.step(&mut self.pose, sphere, input_dir, dt) {
            Ok(outcome) => {
                self.walking = outcome.is_moving();
                outcome
            }
            Err(err) => {
                warn!(sphere = %self.sphere, %err, "agent step skipped");
                self.walking = false;
                StepOutcome::Idle
            }
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.walking = false;
    }

    pub fn follow_target(&self) -> FollowTarget {
        FollowTarget::from_pose(&self.pose)
    }

    /// Surface normal under the agent.
    pub fn local_up(&self, sphere: &Sphere) -> Result<DVec3, SurfaceError> {
        sphere.outward_normal(self.pose.position)
    }
}
