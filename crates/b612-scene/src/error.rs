use b612_surface::{EntityId, SurfaceError};

/// Errors raised while loading or wiring up a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to parse scene definition: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("placement graph has a cycle through {0:?}")]
    PlacementCycle(Vec<EntityId>),

    #[error("placement of '{node}' is anchored to unknown entity '{anchor}'")]
    UnknownAnchor { node: EntityId, anchor: EntityId },

    #[error("entity '{0}' is placed more than once")]
    DuplicateNode(EntityId),

    #[error("dialogue of '{npc}' refers to unknown node '{node}'")]
    UnknownDialogueNode { npc: EntityId, node: String },

    #[error("no sphere named '{0}'")]
    UnknownSphere(String),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
