//! Soft push-back: the only collision response there is.
//!
//! A point that gets closer than `radius + clearance` to a sphere center is
//! eased back toward that shell a fraction at a time. It never snaps, so a
//! camera being tilted into a planet slides along it instead of jittering.

use glam::DVec3;

use crate::Sphere;

/// Fraction of an inward velocity kept as outward bounce speed.
const BOUNCE_SCALE: f64 = 0.1;
/// Minimum outward bounce speed.
const BOUNCE_MIN: f64 = 0.05;
/// How quickly an inward velocity is turned around.
const VELOCITY_EASE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftPushBack {
    /// Distance above the surface that counts as "too close".
    pub clearance: f64,
    /// Lerp factor toward the clearance shell, applied once per call.
    pub strength: f64,
}

impl Default for SoftPushBack {
    fn default() -> Self {
        Self {
            clearance: 1.0,
            strength: 0.25,
        }
    }
}

impl SoftPushBack {
    /// Ease `point` out of the clearance shell. Returns `true` if it was
    /// inside the shell (and therefore moved).
    pub fn apply(&self, point: &mut DVec3, sphere: &Sphere) -> bool {
        let Some(outward) = self.intrusion(*point, sphere) else {
            return false;
        };
        let shell = sphere.center() + outward * (sphere.radius() + self.clearance);
        *point = point.lerp(shell, self.strength);
        true
    }

    /// Like [`Self::apply`], and also turns a velocity pointing into the
    /// sphere into a small outward one.
    pub fn apply_with_velocity(
        &self,
        point: &mut DVec3,
        velocity: &mut DVec3,
        sphere: &Sphere,
    ) -> bool {
        let Some(outward) = self.intrusion(*point, sphere) else {
            return false;
        };
        if velocity.dot(outward) < 0.0 {
            let bounce = outward * (velocity.length() * BOUNCE_SCALE + BOUNCE_MIN);
            *velocity = velocity.lerp(bounce, VELOCITY_EASE);
        }
        self.apply(point, sphere)
    }

    fn intrusion(&self, point: DVec3, sphere: &Sphere) -> Option<DVec3> {
        let offset = point - sphere.center();
        if offset.length() >= sphere.radius() + self.clearance {
            return None;
        }
        // A point exactly at the center has no direction; push it up.
        Some(offset.try_normalize().unwrap_or(DVec3::Y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere() -> Sphere {
        Sphere::new(DVec3::new(140.0, 0.0, 0.0), 5.0).unwrap()
    }

    #[test]
    fn test_point_outside_shell_is_untouched() {
        let push = SoftPushBack::default();
        let mut point = DVec3::new(140.0, 6.5, 0.0);
        assert!(!push.apply(&mut point, &sphere()));
        assert_eq!(point, DVec3::new(140.0, 6.5, 0.0));
    }

    #[test]
    fn test_point_inside_shell_moves_outward_gradually() {
        let push = SoftPushBack::default();
        let sphere = sphere();
        let mut point = DVec3::new(140.0, 5.2, 0.0);
        assert!(push.apply(&mut point, &sphere));
        // lerp(5.2, 6.0, 0.25) = 5.4
        assert!((point - DVec3::new(140.0, 5.4, 0.0)).length() < 1e-12);

        for _ in 0..200 {
            push.apply(&mut point, &sphere);
        }
        assert!((sphere.altitude(point) - push.clearance).abs() < 1e-9);
    }

    #[test]
    fn test_point_at_center_is_pushed_up() {
        let push = SoftPushBack {
            clearance: 1.0,
            strength: 1.0,
        };
        let sphere = sphere();
        let mut point = sphere.center();
        assert!(push.apply(&mut point, &sphere));
        assert!((point - DVec3::new(140.0, 6.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_inward_velocity_turns_outward() {
        let push = SoftPushBack::default();
        let sphere = sphere();
        let mut point = DVec3::new(140.0, 5.5, 0.0);
        let mut velocity = DVec3::new(0.0, -1.0, 0.0);
        assert!(push.apply_with_velocity(&mut point, &mut velocity, &sphere));
        // lerp(-1, 0.15, 0.2) = -0.77
        assert!((velocity - DVec3::new(0.0, -0.77, 0.0)).length() < 1e-12);

        let mut outward = DVec3::new(0.0, 2.0, 0.0);
        push.apply_with_velocity(&mut point, &mut outward, &sphere);
        assert_eq!(outward, DVec3::new(0.0, 2.0, 0.0));
    }
}
