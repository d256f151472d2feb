//! Keyboard state and action bindings for walking and manual camera orbit.

pub mod action_map;
pub mod keyboard;

pub use action_map::{Action, ActionMap, ActionState, OrbitAxes, WalkAxes};
pub use keyboard::{KeyboardState, RawKeyEvent};
