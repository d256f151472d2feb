//! Per-sphere lighting presets.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the preset used for spheres without their own.
pub const DEFAULT_PRESET: &str = "default";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightKind {
    Ambient,
    Point,
    Spot,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightDef {
    pub kind: LightKind,
    /// `0xRRGGBB`.
    pub color: u32,
    pub intensity: f64,
    /// World position; unused for ambient lights.
    #[serde(default)]
    pub position: Option<[f64; 3]>,
}

/// Lighting collaborator keyed by sphere name.
pub trait LightingPresets {
    /// Replace the active lights with the preset for `sphere`.
    fn apply(&mut self, sphere: &str);
    /// Remove all sphere-specific lights.
    fn clear(&mut self);
}

/// Table-backed presets; unknown spheres get [`DEFAULT_PRESET`].
#[derive(Clone, Debug, Default)]
pub struct PresetLighting {
    presets: FxHashMap<String, Vec<LightDef>>,
    active: Option<String>,
}

impl PresetLighting {
    pub fn new(presets: impl IntoIterator<Item = (String, Vec<LightDef>)>) -> Self {
        Self {
            presets: presets.into_iter().collect(),
            active: None,
        }
    }

    /// Name of the preset currently applied, if any.
    pub fn active_preset(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_lights(&self) -> &[LightDef] {
        self.active
            .as_ref()
            .and_then(|name| self.presets.get(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl LightingPresets for PresetLighting {
    fn apply(&mut self, sphere: &str) {
        let preset = if self.presets.contains_key(sphere) {
            sphere
        } else {
            DEFAULT_PRESET
        };
        debug!(sphere, preset, "lighting applied");
        self.active = Some(preset.to_owned());
    }

    fn clear(&mut self) {
        if let Some(preset) = self.active.take() {
            debug!(%preset, "lighting cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ambient(intensity: f64) -> LightDef {
        LightDef {
            kind: LightKind::Ambient,
            color: 0xffffff,
            intensity,
            position: None,
        }
    }

    fn lighting() -> PresetLighting {
        PresetLighting::new([
            (DEFAULT_PRESET.to_owned(), vec![ambient(0.5)]),
            (
                "drunkard".to_owned(),
                vec![LightDef {
                    kind: LightKind::Spot,
                    color: 0x330044,
                    intensity: 100.0,
                    position: Some([10.0, -100.0, -80.0]),
                }],
            ),
        ])
    }

    #[test]
    fn test_specific_preset_applied() {
        let mut lighting = lighting();
        lighting.apply("drunkard");
        assert_eq!(lighting.active_preset(), Some("drunkard"));
        assert_eq!(lighting.active_lights()[0].kind, LightKind::Spot);
    }

    #[test]
    fn test_unknown_sphere_falls_back_to_default() {
        let mut lighting = lighting();
        lighting.apply("king");
        assert_eq!(lighting.active_preset(), Some(DEFAULT_PRESET));
        assert_eq!(lighting.active_lights(), &[ambient(0.5)]);
    }

    #[test]
    fn test_clear_removes_lights() {
        let mut lighting = lighting();
        lighting.apply("drunkard");
        lighting.clear();
        assert!(lighting.active_preset().is_none());
        assert!(lighting.active_lights().is_empty());
    }
}
