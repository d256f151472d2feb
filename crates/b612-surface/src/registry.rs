//! Sphere registry: named bodies, visibility and picking.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ray::{Ray, ray_sphere_intersect};
use crate::{Sphere, SurfaceError};

/// Stable index of a registered sphere. Spheres are never removed, so ids
/// stay valid for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SphereId(pub usize);

impl fmt::Display for SphereId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sphere#{}", self.0)
    }
}

/// A registered sphere and its per-frame flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereEntry {
    pub name: String,
    pub sphere: Sphere,
    pub visible: bool,
    pub pickable: bool,
}

/// All spheres in the session, looked up by id or name.
#[derive(Debug, Default)]
pub struct SphereRegistry {
    entries: Vec<SphereEntry>,
    name_index: FxHashMap<String, SphereId>,
}

impl SphereRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a visible, pickable sphere.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::DuplicateSphere`] if the name is taken, or
    /// [`SurfaceError::SphereOverlap`] if it intersects a registered sphere.
    pub fn register(&mut self, name: &str, sphere: Sphere) -> Result<SphereId, SurfaceError> {
        if self.name_index.contains_key(name) {
            return Err(SurfaceError::DuplicateSphere(name.to_owned()));
        }
        if let Some(existing) = self.entries.iter().find(|e| e.sphere.overlaps(&sphere)) {
            return Err(SurfaceError::SphereOverlap {
                new: name.to_owned(),
                existing: existing.name.clone(),
            });
        }

        let id = SphereId(self.entries.len());
        self.name_index.insert(name.to_owned(), id);
        self.entries.push(SphereEntry {
            name: name.to_owned(),
            sphere,
            visible: true,
            pickable: true,
        });
        debug!(%id, name, radius = sphere.radius(), "sphere registered");
        Ok(id)
    }

    pub fn get(&self, id: SphereId) -> Option<&SphereEntry> {
        self.entries.get(id.0)
    }

    pub fn sphere(&self, id: SphereId) -> Option<&Sphere> {
        self.get(id).map(|e| &e.sphere)
    }

    pub fn id_of(&self, name: &str) -> Option<SphereId> {
        self.name_index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SphereId, &SphereEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (SphereId(i), e))
    }

    /// Nearest visible, pickable sphere hit by `ray`, with its hit distance.
    pub fn pick(&self, ray: &Ray) -> Option<(SphereId, f64)> {
        self.iter()
            .filter(|(_, e)| e.visible && e.pickable)
            .filter_map(|(id, e)| ray_sphere_intersect(ray, &e.sphere).map(|t| (id, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Hide and disable picking on every sphere except `id`.
    pub fn show_only(&mut self, id: SphereId) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let keep = i == id.0;
            entry.visible = keep;
            entry.pickable = keep;
        }
    }

    /// Make every sphere visible and pickable again.
    pub fn show_all(&mut self) {
        for entry in &mut self.entries {
            entry.visible = true;
            entry.pickable = true;
        }
    }

    /// Nearest sphere whose surface is within `margin` of `point`.
    pub fn nearest_within(&self, point: glam::DVec3, margin: f64) -> Option<SphereId> {
        self.iter()
            .map(|(id, e)| (id, e.sphere.altitude(point)))
            .filter(|&(_, altitude)| altitude < margin)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}
