//! Pointer rays and ray/sphere intersection.

use glam::DVec3;

use crate::Sphere;

/// A ray with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: DVec3,
    direction: DVec3,
}

impl Ray {
    /// Build a ray; `direction` is normalized. `None` for a zero direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        Some(Self {
            origin,
            direction: direction.try_normalize()?,
        })
    }

    /// Ray from `origin` through `target`.
    pub fn through(origin: DVec3, target: DVec3) -> Option<Self> {
        Self::new(origin, target - origin)
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Distance along `ray` to the first point on `sphere`, or `None` on a miss.
///
/// A ray starting inside the sphere hits the far side. Hits behind the
/// origin are ignored.
pub fn ray_sphere_intersect(ray: &Ray, sphere: &Sphere) -> Option<f64> {
    let oc = ray.origin - sphere.center();
    let b = oc.dot(ray.direction);
    let c = oc.dot(oc) - sphere.radius() * sphere.radius();
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let (near, far) = (-b - sqrt_disc, -b + sqrt_disc);
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere() -> Sphere {
        Sphere::new(DVec3::new(10.0, 0.0, 0.0), 5.0).unwrap()
    }

    #[test]
    fn test_zero_direction_rejected() {
        assert!(Ray::new(DVec3::ZERO, DVec3::ZERO).is_none());
        assert!(Ray::through(DVec3::ONE, DVec3::ONE).is_none());
    }

    #[test]
    fn test_hit_from_outside_returns_near_side() {
        let ray = Ray::new(DVec3::ZERO, DVec3::new(3.0, 0.0, 0.0)).unwrap();
        let t = ray_sphere_intersect(&ray, &sphere()).unwrap();
        assert!((t - 5.0).abs() < 1e-12);
        assert!((ray.at(t) - DVec3::new(5.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_hit_from_inside_returns_far_side() {
        let ray = Ray::new(DVec3::new(10.0, 0.0, 0.0), DVec3::Y).unwrap();
        let t = ray_sphere_intersect(&ray, &sphere()).unwrap();
        assert!((t - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_miss_and_behind() {
        let sphere = sphere();
        let miss = Ray::new(DVec3::ZERO, DVec3::Y).unwrap();
        assert!(ray_sphere_intersect(&miss, &sphere).is_none());
        let behind = Ray::new(DVec3::ZERO, DVec3::NEG_X).unwrap();
        assert!(ray_sphere_intersect(&behind, &sphere).is_none());
    }

    #[test]
    fn test_ray_through_camera_hits_center_direction() {
        let ray = Ray::through(DVec3::new(0.0, 5.0, 15.0), DVec3::new(10.0, 0.0, 0.0)).unwrap();
        let t = ray_sphere_intersect(&ray, &sphere()).unwrap();
        let distance_to_center = DVec3::new(0.0, 5.0, 15.0).distance(DVec3::new(10.0, 0.0, 0.0));
        assert!((t - (distance_to_center - 5.0)).abs() < 1e-9);
    }
}
