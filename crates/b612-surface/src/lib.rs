//! Geometry for standing on small spheres.
//!
//! Builds orthonormal frames from an up vector and a forward hint, pins
//! objects onto a sphere relative to an anchor's local frame, walks an agent
//! across the surface without radial drift, and picks spheres with rays.
//! All math is `f64` so surface distances hold to well under 1e-6 relative
//! error even far from the origin.

pub mod entity;
pub mod error;
pub mod frame;
pub mod locomotion;
pub mod placement;
pub mod pose;
pub mod pushback;
pub mod ray;
pub mod registry;
pub mod sphere;

pub use entity::EntityId;
pub use error::SurfaceError;
pub use frame::{any_perpendicular, build_frame, build_frame_or_fallback, look_rotation};
pub use locomotion::{
    Locomotion, StepMode, StepOutcome, camera_relative_direction, tangent_component,
};
pub use placement::{EulerXyz, HostPlacement, PlacementSpec, place, place_ahead_of};
pub use pose::Pose;
pub use pushback::SoftPushBack;
pub use ray::{Ray, ray_sphere_intersect};
pub use registry::{SphereEntry, SphereId, SphereRegistry};
pub use sphere::Sphere;
