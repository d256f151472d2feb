//! Walking an agent across a sphere surface.
//!
//! Each step moves the agent along its input direction and then re-pins it
//! at `radius + surface_offset`, so radial error is discarded every step
//! instead of accumulating. Movement is a tangent-plane approximation, not a
//! great-circle interpolation.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::frame::{any_perpendicular, build_frame};
use crate::{Pose, Sphere, SurfaceError};

/// Inputs shorter than this are treated as "no input".
const IDLE_EPSILON_SQ: f64 = 1e-12;

/// How `speed` is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepMode {
    /// `speed` world units per update, regardless of `dt`.
    #[default]
    PerFrame,
    /// `speed` world units per second, scaled by `dt`.
    PerSecond,
}

/// Result of a single [`Locomotion::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Input was near zero; the pose was not touched.
    Idle,
    /// The agent moved and now faces `heading`.
    Moved { heading: DVec3 },
}

impl StepOutcome {
    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Per-agent locomotion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Locomotion {
    pub speed: f64,
    pub surface_offset: f64,
    pub step_mode: StepMode,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            speed: 0.1,
            surface_offset: 0.05,
            step_mode: StepMode::PerFrame,
        }
    }
}

impl Locomotion {
    /// Distance covered by one step of length `dt` seconds.
    pub fn step_length(&self, dt: f64) -> f64 {
        match self.step_mode {
            StepMode::PerFrame => self.speed,
            StepMode::PerSecond => self.speed * dt,
        }
    }

    /// Advance `pose` one step along `input_dir` and re-pin it on `sphere`.
    ///
    /// The new orientation has local +Y pointing away from the center (so
    /// local "down" faces the center) and local -Z along the tangential part
    /// of `input_dir`. If the input is purely radial the previous facing is
    /// kept, projected onto the new tangent plane.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::AtCenter`] if the candidate position coincides with the
    /// sphere center; `pose` is left unchanged.
    pub fn step(
        &self,
        pose: &mut Pose,
        sphere: &Sphere,
        input_dir: DVec3,
        dt: f64,
    ) -> Result<StepOutcome, SurfaceError> {
        if input_dir.length_squared() < IDLE_EPSILON_SQ || !input_dir.is_finite() {
            return Ok(StepOutcome::Idle);
        }
        let direction = input_dir.normalize();

        let candidate = pose.position + direction * self.step_length(dt);
        let radial = sphere.outward_normal(candidate)?;
        let position = sphere.center() + radial * (sphere.radius() + self.surface_offset);

        let heading = tangent_heading(direction, radial, pose.forward());
        let orientation = build_frame(radial, -heading)?;

        pose.position = position;
        pose.orientation = orientation;
        Ok(StepOutcome::Moved { heading })
    }
}

/// Component of `v` lying in the plane perpendicular to the unit `normal`.
pub fn tangent_component(v: DVec3, normal: DVec3) -> DVec3 {
    v - normal * v.dot(normal)
}

fn tangent_heading(direction: DVec3, radial: DVec3, previous_forward: DVec3) -> DVec3 {
    tangent_component(direction, radial)
        .try_normalize()
        .or_else(|| tangent_component(previous_forward, radial).try_normalize())
        .unwrap_or_else(|| any_perpendicular(radial))
}

/// Turn camera-relative walk axes into a world direction on the tangent plane
/// at a point whose outward normal is `surface_up`.
///
/// `forward` walks where the camera looks, `right` walks to the view's right.
/// Returns `None` when both axes are zero or the view is straight along the
/// normal, where "forward" has no tangential meaning.
pub fn camera_relative_direction(
    view_dir: DVec3,
    surface_up: DVec3,
    forward: f64,
    right: f64,
) -> Option<DVec3> {
    if forward == 0.0 && right == 0.0 {
        return None;
    }
    let up = surface_up.try_normalize()?;
    let view_forward = tangent_component(view_dir, up).try_normalize()?;
    let view_right = view_forward.cross(up);
    (view_forward * forward + view_right * right).try_normalize()
}
