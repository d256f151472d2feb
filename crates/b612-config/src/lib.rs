//! Configuration for the B612 sphere-walking viewer.
//!
//! Runtime settings persist to disk as RON files. Supports CLI overrides via
//! clap, hot-reload detection, and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, LocomotionConfig, StepModeSetting, UpPolicySetting,
    ViewConfig, ZoomEasingSetting,
};
pub use error::ConfigError;
