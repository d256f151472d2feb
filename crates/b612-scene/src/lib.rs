//! Everything that lives on a sphere besides the agent: entities and their
//! load state, the placement graph that positions them, NPC dialogue,
//! lighting presets and the scene definition that ties them together.

pub mod dialogue;
pub mod entities;
pub mod error;
pub mod graph;
pub mod lighting;
pub mod rewards;
pub mod scene_def;

pub use dialogue::{
    DEFAULT_DISPLAY_FRAMES, DialogueEvent, DialogueLine, DialogueNode, DialogueScript,
    DialogueSink, NpcDialogue,
};
pub use entities::{AssetGroup, EntityHandle, EntityRegistry, LoadState};
pub use error::SceneError;
pub use graph::{AnchorRef, Placement, PlacementGraph, PlacementNode, PlacementReport};
pub use lighting::{DEFAULT_PRESET, LightDef, LightKind, LightingPresets, PresetLighting};
pub use rewards::RewardLedger;
pub use scene_def::{HostDef, LightingPresetDef, PropDef, SceneDef, SphereDef};
