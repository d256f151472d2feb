//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, UpPolicySetting};

/// Common command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "b612", about = "Walk on a small sphere")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory for JSON log files (debug builds only).
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Zoom transition length in frames.
    #[arg(long)]
    pub zoom_frames: Option<u32>,

    /// Agent movement speed.
    #[arg(long)]
    pub speed: Option<f64>,

    /// Pin the camera's up vector to world +Y while orbiting manually.
    #[arg(long)]
    pub pin_world_up: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(frames) = args.zoom_frames {
            self.view.zoom_duration_frames = frames;
        }
        if let Some(speed) = args.speed {
            self.locomotion.speed = speed;
        }
        if args.pin_world_up {
            self.camera.up_policy = UpPolicySetting::PinnedWorldY;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            zoom_frames: Some(90),
            pin_world_up: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.view.zoom_duration_frames, 90);
        assert_eq!(config.camera.up_policy, UpPolicySetting::PinnedWorldY);
        // Non-overridden fields retain defaults
        assert!((config.locomotion.speed - 0.1).abs() < 1e-12);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args =
            CliArgs::try_parse_from(["b612", "--speed", "0.3", "--log-level", "debug"]).unwrap();
        assert_eq!(args.speed, Some(0.3));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(!args.pin_world_up);
    }
}
