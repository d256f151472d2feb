//! ORBIT -> ZOOMING -> SURFACE -> ORBIT.
//!
//! Exactly one mode is active. Zoom data lives inside the `Zooming` variant
//! and disappears with it. Requests a mode does not accept are returned as
//! [`TransitionError`]s and leave the machine untouched.

use std::fmt;

use b612_player::{CameraSnapshot, CameraState, EasingFunction, ZoomTransition};
use b612_surface::{Ray, SphereId, SphereRegistry};
use glam::DVec3;
use tracing::info;

/// The active view mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewMode {
    /// Free camera auto-rotating around the scene; every sphere pickable.
    Orbit,
    /// Camera flying toward `sphere`.
    Zooming {
        sphere: SphereId,
        transition: ZoomTransition,
    },
    /// Agent walking on `sphere`.
    Surface { sphere: SphereId },
}

/// [`ViewMode`] without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewModeKind {
    Orbit,
    Zooming,
    Surface,
}

impl fmt::Display for ViewModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Orbit => "ORBIT",
            Self::Zooming => "ZOOMING",
            Self::Surface => "SURFACE",
        };
        f.write_str(name)
    }
}

impl ViewMode {
    pub fn kind(&self) -> ViewModeKind {
        match self {
            Self::Orbit => ViewModeKind::Orbit,
            Self::Zooming { .. } => ViewModeKind::Zooming,
            Self::Surface { .. } => ViewModeKind::Surface,
        }
    }

    /// The sphere being zoomed to or walked on.
    pub fn sphere(&self) -> Option<SphereId> {
        match self {
            Self::Orbit => None,
            Self::Zooming { sphere, .. } | Self::Surface { sphere } => Some(*sphere),
        }
    }
}

/// User requests that change the mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewAction {
    Pick,
    Back,
}

/// A rejected request. Never fatal; the frame carries on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("{action:?} is not accepted in {from}")]
    InvalidTransition {
        from: ViewModeKind,
        action: ViewAction,
    },
    #[error("pick ray hit no visible sphere")]
    NoSphereHit,
}

/// Zoom parameters, fixed for the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomSettings {
    pub duration_frames: u32,
    /// End position relative to the sphere center, in radii.
    pub offset_radii: DVec3,
    pub easing: EasingFunction,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            duration_frames: 60,
            offset_radii: DVec3::new(0.0, 1.5, 2.5),
            easing: EasingFunction::Linear,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ViewStateMachine {
    mode: ViewMode,
    zoom: ZoomSettings,
}

impl ViewStateMachine {
    /// Starts in [`ViewMode::Orbit`].
    pub fn new(zoom: ZoomSettings) -> Self {
        Self {
            mode: ViewMode::Orbit,
            zoom,
        }
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn kind(&self) -> ViewModeKind {
        self.mode.kind()
    }

    /// Pick the nearest visible sphere hit by `ray` and start zooming to it.
    /// Only accepted in ORBIT.
    pub fn pick(
        &mut self,
        ray: &Ray,
        spheres: &SphereRegistry,
        camera: &CameraState,
    ) -> Result<SphereId, TransitionError> {
        self.accepts(ViewAction::Pick)?;
        let (id, _) = spheres.pick(ray).ok_or(TransitionError::NoSphereHit)?;
        let sphere = spheres.sphere(id).ok_or(TransitionError::NoSphereHit)?;

        let transition = ZoomTransition::new(
            CameraSnapshot::from_camera(camera),
            CameraSnapshot::close_up(sphere.center(), sphere.radius(), self.zoom.offset_radii),
            self.zoom.duration_frames,
            self.zoom.easing,
        );
        info!(sphere = %id, frames = transition.duration_frames(), "ORBIT -> ZOOMING");
        self.mode = ViewMode::Zooming {
            sphere: id,
            transition,
        };
        Ok(id)
    }

    /// One zoom frame: write the camera pose for the current frame, then
    /// either enter SURFACE (last frame) or move to the next frame.
    ///
    /// Returns the sphere when SURFACE was entered by this call. Does nothing
    /// outside ZOOMING.
    pub fn advance_zoom(&mut self, camera: &mut CameraState) -> Option<SphereId> {
        let ViewMode::Zooming { sphere, transition } = &mut self.mode else {
            return None;
        };
        transition.apply(camera);
        if !transition.is_complete() {
            transition.advance();
            return None;
        }
        let sphere = *sphere;
        info!(%sphere, "ZOOMING -> SURFACE");
        self.mode = ViewMode::Surface { sphere };
        Some(sphere)
    }

    /// Leave the surface immediately. Only accepted in SURFACE.
    pub fn back(&mut self) -> Result<SphereId, TransitionError> {
        self.accepts(ViewAction::Back)?;
        let sphere = self.mode.sphere().ok_or(TransitionError::InvalidTransition {
            from: self.kind(),
            action: ViewAction::Back,
        })?;
        info!(%sphere, "SURFACE -> ORBIT");
        self.mode = ViewMode::Orbit;
        Ok(sphere)
    }

    fn accepts(&self, action: ViewAction) -> Result<(), TransitionError> {
        let accepted = matches!(
            (self.kind(), action),
            (ViewModeKind::Orbit, ViewAction::Pick) | (ViewModeKind::Surface, ViewAction::Back)
        );
        if accepted {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition {
                from: self.kind(),
                action,
            })
        }
    }
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new(ZoomSettings::default())
    }
}
