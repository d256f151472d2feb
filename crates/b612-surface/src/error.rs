//! Geometry and placement errors.
//!
//! Every variant is recoverable: the caller skips the failed operation for
//! this frame and retries later (e.g. once an asset group has loaded).

use crate::EntityId;

/// Errors raised by surface geometry and placement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The entity exists but its geometry (and bounding radius) has not
    /// finished loading.
    #[error("entity '{0}' is not loaded yet")]
    NotReady(EntityId),

    /// No entity with this id is registered.
    #[error("entity '{0}' does not exist")]
    MissingEntity(EntityId),

    /// The up vector and forward hint are parallel, anti-parallel, or zero.
    #[error("cannot build a frame: up and forward hint are colinear or zero-length")]
    DegenerateBasis,

    /// A point sits on the sphere center, so it has no radial direction.
    #[error("point coincides with the sphere center")]
    AtCenter,

    /// Sphere radius must be positive and finite.
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// A sphere with this name is already registered.
    #[error("sphere named '{0}' already exists")]
    DuplicateSphere(String),

    /// The new sphere intersects an existing one.
    #[error("sphere '{new}' overlaps existing sphere '{existing}'")]
    SphereOverlap {
        /// Name of the sphere being registered.
        new: String,
        /// Name of the sphere it overlaps.
        existing: String,
    },
}
