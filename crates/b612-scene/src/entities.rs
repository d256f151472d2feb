//! Registry of placeable entities and their load state.
//!
//! Every sub-model of a character is reserved up front as
//! [`LoadState::Pending`]. When the asset loader reports the whole group as
//! loaded, [`EntityRegistry::commit_group`] flips all of them to ready in one
//! call, so placement never sees half a character.

use b612_surface::{EntityId, Pose, SurfaceError};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::SceneError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoadState {
    Pending,
    /// Geometry is available; `bounding_radius` is its bounding sphere.
    Ready { bounding_radius: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntityHandle {
    pub pose: Pose,
    pub load: LoadState,
    pub visible: bool,
}

impl EntityHandle {
    pub fn is_ready(&self) -> bool {
        matches!(self.load, LoadState::Ready { .. })
    }

    pub fn bounding_radius(&self) -> Option<f64> {
        match self.load {
            LoadState::Ready { bounding_radius } => Some(bounding_radius),
            LoadState::Pending => None,
        }
    }
}

/// Load-completion report for one character's models.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssetGroup {
    pub name: String,
    /// Each member with its bounding radius.
    pub members: Vec<(EntityId, f64)>,
}

impl AssetGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn with(mut self, id: impl Into<EntityId>, bounding_radius: f64) -> Self {
        self.members.push((id.into(), bounding_radius));
        self
    }
}

#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: FxHashMap<EntityId, EntityHandle>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a hidden, pending entity. Returns `false` if the id exists.
    pub fn reserve(&mut self, id: EntityId) -> bool {
        if self.entities.contains_key(&id) {
            return false;
        }
        debug!(%id, "entity reserved");
        self.entities.insert(
            id,
            EntityHandle {
                pose: Pose::IDENTITY,
                load: LoadState::Pending,
                visible: false,
            },
        );
        true
    }

    /// Mark every member of `group` ready, or none of them.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::MissingEntity`] for the first member that was never
    /// reserved; the registry is unchanged.
    pub fn commit_group(&mut self, group: &AssetGroup) -> Result<(), SceneError> {
        if let Some((missing, _)) = group
            .members
            .iter()
            .find(|(id, _)| !self.entities.contains_key(id))
        {
            return Err(SurfaceError::MissingEntity(missing.clone()).into());
        }
        for (id, bounding_radius) in &group.members {
            if let Some(handle) = self.entities.get_mut(id) {
                handle.load = LoadState::Ready {
                    bounding_radius: *bounding_radius,
                };
            }
        }
        info!(group = %group.name, members = group.members.len(), "asset group ready");
        Ok(())
    }

    pub fn get(&self, id: &EntityId) -> Option<&EntityHandle> {
        self.entities.get(id)
    }

    /// The entity, provided its geometry has loaded.
    pub fn ready(&self, id: &EntityId) -> Result<&EntityHandle, SurfaceError> {
        let handle = self
            .entities
            .get(id)
            .ok_or_else(|| SurfaceError::MissingEntity(id.clone()))?;
        if !handle.is_ready() {
            return Err(SurfaceError::NotReady(id.clone()));
        }
        Ok(handle)
    }

    /// Pose of a loaded entity.
    pub fn pose_ready(&self, id: &EntityId) -> Result<Pose, SurfaceError> {
        self.ready(id).map(|h| h.pose)
    }

    /// Overwrite the pose of a loaded entity.
    pub fn set_pose(&mut self, id: &EntityId, pose: Pose) -> Result<(), SurfaceError> {
        self.ready(id)?;
        if let Some(handle) = self.entities.get_mut(id) {
            handle.pose = pose;
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: &EntityId, visible: bool) {
        if let Some(handle) = self.entities.get_mut(id) {
            handle.visible = visible;
        }
    }

    pub fn hide_all(&mut self) {
        for handle in self.entities.values_mut() {
            handle.visible = false;
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &EntityHandle)> {
        self.entities.iter()
    }
}
