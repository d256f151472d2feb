//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Free-orbit view and zoom transition.
    pub view: ViewConfig,
    /// Agent movement on a sphere surface.
    pub locomotion: LocomotionConfig,
    /// Follow / manual-orbit camera rig.
    pub camera: CameraConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Easing applied to the zoom transition's progress.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ZoomEasingSetting {
    /// `alpha = frame / duration`, unmodified.
    #[default]
    Linear,
    /// Slow start, fast end.
    EaseIn,
    /// Fast start, slow end.
    EaseOut,
    /// Slow start and end.
    EaseInOut,
}

/// Free-orbit view and ORBIT -> SURFACE zoom settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// Number of frames the zoom transition lasts.
    pub zoom_duration_frames: u32,
    /// Zoom end position relative to the picked sphere's center, in multiples
    /// of its radius.
    pub zoom_offset_radii: [f64; 3],
    /// Easing applied to the zoom progress.
    pub zoom_easing: ZoomEasingSetting,
    /// Camera position restored by the "back" action.
    pub home_camera_position: [f64; 3],
    /// Look target restored by the "back" action.
    pub home_camera_target: [f64; 3],
    /// Auto-rotation speed in ORBIT. At 1.0 the camera completes one
    /// revolution every 60 seconds at 60 fps.
    pub auto_rotate_speed: f64,
}

/// How locomotion speed is interpreted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum StepModeSetting {
    /// `speed` is a displacement per frame; `dt` is ignored.
    #[default]
    PerFrame,
    /// `speed` is a displacement per second, scaled by `dt`.
    PerSecond,
}

/// Agent movement settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Movement speed (see `step_mode`).
    pub speed: f64,
    /// Interpretation of `speed`.
    pub step_mode: StepModeSetting,
    /// Height above the sphere surface the agent is pinned at.
    pub surface_offset: f64,
    /// Spawn polar angle in radians, measured from the sphere's +Y pole.
    pub spawn_polar_angle: f64,
    /// Spawn azimuth in radians around the sphere's Y axis, 0 at +Z.
    pub spawn_azimuth: f64,
}

/// Camera up-vector handling during manual-orbit tilt.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum UpPolicySetting {
    /// Tilting rotates the camera's up vector together with its position.
    #[default]
    RotateWithTilt,
    /// The up vector is forced to world +Y before every manual-orbit update.
    PinnedWorldY,
}

/// Camera rig settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance behind the follow target.
    pub back_distance: f64,
    /// Lift along the local surface normal.
    pub lift_height: f64,
    /// Exponential smoothing factor applied per frame in follow mode.
    pub smoothing: f64,
    /// Angle in radians applied per frame while an orbit key is held.
    pub rotate_step: f64,
    /// Up-vector policy for manual-orbit tilt.
    pub up_policy: UpPolicySetting,
    /// Minimum distance the camera keeps from the current sphere's surface.
    pub clearance: f64,
    /// Fraction of the clearance violation corrected per frame.
    pub push_back_strength: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log every camera pose at `debug` level.
    pub trace_camera: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_duration_frames: 60,
            zoom_offset_radii: [0.0, 1.5, 2.5],
            zoom_easing: ZoomEasingSetting::Linear,
            home_camera_position: [0.0, 5.0, 15.0],
            home_camera_target: [0.0, 0.0, 0.0],
            auto_rotate_speed: 0.5,
        }
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            speed: 0.1,
            step_mode: StepModeSetting::PerFrame,
            surface_offset: 0.05,
            spawn_polar_angle: std::f64::consts::FRAC_PI_4,
            spawn_azimuth: 0.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            back_distance: 10.0,
            lift_height: 2.0,
            smoothing: 0.1,
            rotate_step: 0.02,
            up_policy: UpPolicySetting::RotateWithTilt,
            clearance: 1.0,
            push_back_strength: 0.25,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trace_camera: false,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Per-user configuration directory (`<config_dir>/b612`).
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("b612"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::Write)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::Write)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents =
            std::fs::read_to_string(config_dir.join(CONFIG_FILE)).map_err(ConfigError::Read)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
