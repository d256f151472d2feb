//! Maps the viewer's actions onto physical keys.
//!
//! [`ActionMap`] is the binding table (RON-serializable); [`ActionState`] is
//! resolved from it once per frame and exposes the walk axes, the manual
//! orbit axes and the edge-triggered "back" action.

use crate::keyboard::KeyboardState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Serde helper for [`KeyCode`], which has no serde support of its own.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(codes: &[KeyCode], s: S) -> Result<S::Ok, S::Error> {
        codes
            .iter()
            .map(|code| format!("{code:?}"))
            .collect::<Vec<_>>()
            .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<KeyCode>, D::Error> {
        Vec::<String>::deserialize(d)?
            .into_iter()
            .map(|name| {
                super::keycode_from_name(&name)
                    .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
            })
            .collect()
    }
}

/// Parse the `Debug` name of a key code (`"KeyW"`, `"ArrowUp"`, ...).
///
/// Only keys that make sense for this viewer are recognised.
pub fn keycode_from_name(name: &str) -> Option<KeyCode> {
    Some(match name {
        "KeyW" => KeyCode::KeyW,
        "KeyA" => KeyCode::KeyA,
        "KeyS" => KeyCode::KeyS,
        "KeyD" => KeyCode::KeyD,
        "KeyQ" => KeyCode::KeyQ,
        "KeyE" => KeyCode::KeyE,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "Escape" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        _ => return None,
    })
}

/// Actions the viewer reacts to.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Walk toward where the camera looks.
    MoveForward,
    /// Walk away from where the camera looks.
    MoveBack,
    /// Walk to the camera's left.
    MoveLeft,
    /// Walk to the camera's right.
    MoveRight,
    /// Orbit the camera left around its up vector.
    OrbitLeft,
    /// Orbit the camera right around its up vector.
    OrbitRight,
    /// Tilt the camera up around its right axis.
    OrbitUp,
    /// Tilt the camera down around its right axis.
    OrbitDown,
    /// Leave the surface and return to the free-orbit view.
    Back,
}

/// Binding table from [`Action`] to keys. Any bound key triggers the action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionMap {
    bindings: HashMap<Action, Binding>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
struct Binding(#[serde(with = "keycode_serde")] Vec<KeyCode>);

impl Default for ActionMap {
    fn default() -> Self {
        let mut map = Self::new();
        map.bind(Action::MoveForward, &[KeyCode::KeyW]);
        map.bind(Action::MoveBack, &[KeyCode::KeyS]);
        map.bind(Action::MoveLeft, &[KeyCode::KeyA]);
        map.bind(Action::MoveRight, &[KeyCode::KeyD]);
        map.bind(Action::OrbitLeft, &[KeyCode::ArrowLeft]);
        map.bind(Action::OrbitRight, &[KeyCode::ArrowRight]);
        map.bind(Action::OrbitUp, &[KeyCode::ArrowUp]);
        map.bind(Action::OrbitDown, &[KeyCode::ArrowDown]);
        map.bind(Action::Back, &[KeyCode::Escape, KeyCode::Backspace]);
        map
    }
}

impl ActionMap {
    /// Create an empty map with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Replace the keys bound to `action`.
    pub fn bind(&mut self, action: Action, keys: &[KeyCode]) {
        self.bindings.insert(action, Binding(keys.to_vec()));
    }

    /// Keys bound to `action`.
    #[must_use]
    pub fn keys(&self, action: Action) -> &[KeyCode] {
        self.bindings
            .get(&action)
            .map(|b| b.0.as_slice())
            .unwrap_or_default()
    }

    /// Serialize to a RON string.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from a RON string.
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    fn held(&self, keyboard: &KeyboardState, action: Action) -> bool {
        self.keys(action)
            .iter()
            .any(|&code| keyboard.is_pressed(PhysicalKey::Code(code)))
    }

    fn pressed_this_frame(&self, keyboard: &KeyboardState, action: Action) -> bool {
        self.keys(action)
            .iter()
            .any(|&code| keyboard.just_pressed(PhysicalKey::Code(code)))
    }
}

/// Walk input in camera-relative units: `forward` along the view direction,
/// `right` along the view's right axis. Each lies in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WalkAxes {
    pub forward: f64,
    pub right: f64,
}

impl WalkAxes {
    /// True when no walk key is held (or opposite keys cancel out).
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.right == 0.0
    }
}

/// Manual orbit input. `yaw` is +1 for left, -1 for right; `pitch` is +1 for
/// up, -1 for down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrbitAxes {
    pub yaw: i8,
    pub pitch: i8,
}

impl OrbitAxes {
    /// True when no orbit key is held.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.yaw == 0 && self.pitch == 0
    }
}

/// Actions resolved for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionState {
    walk: WalkAxes,
    orbit: OrbitAxes,
    back: bool,
}

impl ActionState {
    /// Resolve the current frame's actions from keyboard state.
    #[must_use]
    pub fn resolve(keyboard: &KeyboardState, map: &ActionMap) -> Self {
        let axis = |positive: Action, negative: Action| -> i8 {
            i8::from(map.held(keyboard, positive)) - i8::from(map.held(keyboard, negative))
        };
        Self {
            walk: WalkAxes {
                forward: f64::from(axis(Action::MoveForward, Action::MoveBack)),
                right: f64::from(axis(Action::MoveRight, Action::MoveLeft)),
            },
            orbit: OrbitAxes {
                yaw: axis(Action::OrbitLeft, Action::OrbitRight),
                pitch: axis(Action::OrbitUp, Action::OrbitDown),
            },
            back: map.pressed_this_frame(keyboard, Action::Back),
        }
    }

    /// Walk axes for this frame.
    #[must_use]
    pub fn walk_axes(&self) -> WalkAxes {
        self.walk
    }

    /// Orbit axes for this frame.
    #[must_use]
    pub fn orbit_axes(&self) -> OrbitAxes {
        self.orbit
    }

    /// True on the frame a "back" key went down.
    #[must_use]
    pub fn back_requested(&self) -> bool {
        self.back
    }
}
