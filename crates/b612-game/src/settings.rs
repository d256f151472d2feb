//! Config sections mapped onto the runtime types that use them.

use b612_config::{Config, StepModeSetting, UpPolicySetting, ZoomEasingSetting};
use b612_player::{AutoOrbit, CameraRig, CameraSnapshot, EasingFunction, SpawnPoint, UpPolicy};
use b612_surface::{Locomotion, SoftPushBack, StepMode};
use glam::DVec3;

use crate::ZoomSettings;

/// Everything a [`Session`](crate::Session) needs from the config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    pub zoom: ZoomSettings,
    /// Camera pose restored by "back" and used at startup.
    pub home: CameraSnapshot,
    pub auto_orbit: AutoOrbit,
    pub rig: CameraRig,
    pub locomotion: Locomotion,
    pub spawn: SpawnPoint,
    /// Log every camera pose at `debug`.
    pub trace_camera: bool,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        let view = &config.view;
        let camera = &config.camera;
        let locomotion = &config.locomotion;
        Self {
            zoom: ZoomSettings {
                duration_frames: view.zoom_duration_frames,
                offset_radii: DVec3::from_array(view.zoom_offset_radii),
                easing: easing(view.zoom_easing),
            },
            home: CameraSnapshot {
                position: DVec3::from_array(view.home_camera_position),
                target: DVec3::from_array(view.home_camera_target),
            },
            auto_orbit: AutoOrbit {
                speed: view.auto_rotate_speed,
            },
            rig: CameraRig {
                back_distance: camera.back_distance,
                lift_height: camera.lift_height,
                smoothing: camera.smoothing,
                rotate_step: camera.rotate_step,
                up_policy: up_policy(camera.up_policy),
                push_back: (camera.clearance > 0.0).then_some(SoftPushBack {
                    clearance: camera.clearance,
                    strength: camera.push_back_strength,
                }),
            },
            locomotion: Locomotion {
                speed: locomotion.speed,
                surface_offset: locomotion.surface_offset,
                step_mode: step_mode(locomotion.step_mode),
            },
            spawn: SpawnPoint {
                polar: locomotion.spawn_polar_angle,
                azimuth: locomotion.spawn_azimuth,
            },
            trace_camera: config.debug.trace_camera,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn easing(setting: ZoomEasingSetting) -> EasingFunction {
    match setting {
        ZoomEasingSetting::Linear => EasingFunction::Linear,
        ZoomEasingSetting::EaseIn => EasingFunction::EaseIn,
        ZoomEasingSetting::EaseOut => EasingFunction::EaseOut,
        ZoomEasingSetting::EaseInOut => EasingFunction::EaseInOut,
    }
}

fn up_policy(setting: UpPolicySetting) -> UpPolicy {
    match setting {
        UpPolicySetting::RotateWithTilt => UpPolicy::RotateWithTilt,
        UpPolicySetting::PinnedWorldY => UpPolicy::PinnedWorldY,
    }
}

fn step_mode(setting: StepModeSetting) -> StepMode {
    match setting {
        StepModeSetting::PerFrame => StepMode::PerFrame,
        StepModeSetting::PerSecond => StepMode::PerSecond,
    }
}
