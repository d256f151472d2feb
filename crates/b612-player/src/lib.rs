//! The agent and the cameras that watch it.

pub mod agent;
pub mod camera;
pub mod camera_rig;
pub mod orbit_camera;
pub mod zoom_transition;

pub use agent::{Agent, SpawnPoint};
pub use camera::CameraState;
pub use camera_rig::{CameraRig, FollowTarget, RigMode, UpPolicy};
pub use orbit_camera::AutoOrbit;
pub use zoom_transition::{CameraSnapshot, EasingFunction, ZoomTransition};
