//! Sphere: the immutable body everything is pinned to.

use glam::DVec3;

use crate::SurfaceError;

/// A fixed-radius sphere. Radius is positive, finite, and never changes
/// after construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    center: DVec3,
    radius: f64,
}

impl Sphere {
    /// Create a sphere.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::InvalidRadius`] if `radius` is not positive and finite.
    pub fn new(center: DVec3, radius: f64) -> Result<Self, SurfaceError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SurfaceError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Unit vector from the center toward `point` ("local up" at that point).
    pub fn outward_normal(&self, point: DVec3) -> Result<DVec3, SurfaceError> {
        (point - self.center)
            .try_normalize()
            .ok_or(SurfaceError::AtCenter)
    }

    /// Surface pin: keep `point`'s direction from the center, discard its
    /// distance, and return the point `radius + height` out on that ray.
    pub fn pin(&self, point: DVec3, height: f64) -> Result<DVec3, SurfaceError> {
        let normal = self.outward_normal(point)?;
        Ok(self.center + normal * (self.radius + height))
    }

    /// Point at `height` above the surface in the direction given by a polar
    /// angle from +Y and an azimuth around Y (0 at +Z, increasing toward +X).
    pub fn point_at(&self, polar: f64, azimuth: f64, height: f64) -> DVec3 {
        let (sin_p, cos_p) = polar.sin_cos();
        let (sin_a, cos_a) = azimuth.sin_cos();
        let direction = DVec3::new(sin_p * sin_a, cos_p, sin_p * cos_a);
        self.center + direction * (self.radius + height)
    }

    /// Height of `point` above the surface (negative inside).
    pub fn altitude(&self, point: DVec3) -> f64 {
        point.distance(self.center) - self.radius
    }

    /// True if the two spheres intersect.
    pub fn overlaps(&self, other: &Sphere) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }
}
