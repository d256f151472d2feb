//! Placing objects on a sphere relative to an anchor's local frame.
//!
//! Positions are recomputed from scratch on every call; nothing accumulates,
//! so re-running a placement after its anchor moves is always safe.

use glam::{DQuat, DVec3};

use crate::frame::build_frame;
use crate::{Pose, Sphere, SurfaceError};

/// Sequential intrinsic rotation about the object's own X, then Y, then Z
/// axis, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerXyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerXyz {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_degrees(x: f64, y: f64, z: f64) -> Self {
        Self::new(x.to_radians(), y.to_radians(), z.to_radians())
    }

    /// Quaternion applying X, then Y, then Z about the already-rotated axes.
    pub fn to_quat(self) -> DQuat {
        DQuat::from_rotation_x(self.x) * DQuat::from_rotation_y(self.y) * DQuat::from_rotation_z(self.z)
    }
}

/// Where an object sits relative to its anchor, authored per
/// object-on-planet pairing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementSpec {
    /// Offset in the anchor's (right, up, forward) units.
    pub offset: DVec3,
    /// Facing hint in the anchor's local space.
    pub forward_hint: DVec3,
    /// Extra intrinsic X/Y/Z rotation applied on top of the surface frame.
    pub extra_rotation: EulerXyz,
    /// Distance above the sphere surface.
    pub height_offset: f64,
}

impl Default for PlacementSpec {
    fn default() -> Self {
        Self {
            offset: DVec3::ZERO,
            forward_hint: DVec3::Z,
            extra_rotation: EulerXyz::ZERO,
            height_offset: 0.05,
        }
    }
}

impl PlacementSpec {
    pub fn new(offset: DVec3, forward_hint: DVec3) -> Self {
        Self {
            offset,
            forward_hint,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, extra_rotation: EulerXyz) -> Self {
        self.extra_rotation = extra_rotation;
        self
    }

    pub fn with_height(mut self, height_offset: f64) -> Self {
        self.height_offset = height_offset;
        self
    }
}

/// Place `target` on `sphere` relative to `anchor`.
///
/// The anchor-local offset is converted to world space, the resulting point
/// is surface-pinned at `radius + height_offset`, and the orientation is the
/// frame built from the toward-center direction (local +Y) and the anchor's
/// rotated forward hint, followed by `extra_rotation`.
///
/// `target` is only written on success.
///
/// # Errors
///
/// - [`SurfaceError::AtCenter`] if the offset lands exactly on the center.
/// - [`SurfaceError::DegenerateBasis`] if the rotated hint is colinear with
///   the radial direction.
pub fn place(
    target: &mut Pose,
    anchor: &Pose,
    sphere: &Sphere,
    spec: &PlacementSpec,
) -> Result<(), SurfaceError> {
    let raw_pos = anchor.position + anchor.local_offset(spec.offset);
    let to_center = (sphere.center() - raw_pos)
        .try_normalize()
        .ok_or(SurfaceError::AtCenter)?;
    let final_pos = sphere.center() - to_center * (sphere.radius() + spec.height_offset);

    let actual_forward = anchor.orientation * spec.forward_hint;
    let base = build_frame(to_center, actual_forward)?;

    target.position = final_pos;
    target.orientation = (base * spec.extra_rotation.to_quat()).normalize();
    Ok(())
}

/// Placement of an NPC "host" in front of an anchor (usually the agent).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostPlacement {
    /// Distance ahead of the anchor along its forward axis.
    pub distance: f64,
    /// Height above the surface.
    pub height: f64,
    /// Extra turn about the host's own up axis, added to a half turn so the
    /// host faces back toward the anchor.
    pub yaw: f64,
}

/// Put `target` `host.distance` ahead of `anchor`, standing upright on
/// `sphere` (local -Y toward the center) and turned `π + host.yaw` about its
/// own +Y axis.
pub fn place_ahead_of(
    target: &mut Pose,
    anchor: &Pose,
    sphere: &Sphere,
    host: &HostPlacement,
) -> Result<(), SurfaceError> {
    let raw_pos = anchor.position + anchor.forward() * host.distance;
    let to_center = (sphere.center() - raw_pos)
        .try_normalize()
        .ok_or(SurfaceError::AtCenter)?;

    let upright = DQuat::from_rotation_arc(DVec3::NEG_Y, to_center);
    let turn = DQuat::from_rotation_y(std::f64::consts::PI + host.yaw);

    target.position = sphere.center() - to_center * (sphere.radius() + host.height);
    target.orientation = (upright * turn).normalize();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6};

    fn sphere() -> Sphere {
        Sphere::new(DVec3::new(10.0, 0.0, 0.0), 5.0).unwrap()
    }

    fn anchors() -> Vec<Pose> {
        let mut poses = Vec::new();
        for i in 0..8 {
            let angle = f64::from(i) * 0.7;
            let position = DVec3::new(10.0 + 5.0 * angle.cos(), 5.0 * angle.sin(), 1.3 * angle);
            let orientation = DQuat::from_euler(glam::EulerRot::YXZ, angle, 0.3 * angle, -angle);
            poses.push(Pose::new(position, orientation));
        }
        poses
    }

    #[test]
    fn test_surface_pin_invariant_holds_for_many_anchors() {
        let sphere = sphere();
        let specs = [
            PlacementSpec::new(DVec3::new(5.0, 0.0, 0.0), DVec3::Z).with_height(0.7),
            PlacementSpec::new(DVec3::new(150.0, 0.0, 100.0), DVec3::new(0.0, 0.0, 0.5)),
            PlacementSpec::new(DVec3::new(-6.0, -3.0, -10.0), DVec3::new(0.0, 0.0, -1.0))
                .with_height(2.7)
                .with_rotation(EulerXyz::new(0.0, 2.1, 0.0)),
            PlacementSpec::new(DVec3::new(0.0, 0.0, 0.3), DVec3::X).with_height(0.0),
        ];
        for anchor in anchors() {
            for spec in &specs {
                let mut target = Pose::IDENTITY;
                if place(&mut target, &anchor, &sphere, spec).is_err() {
                    continue;
                }
                let expected = sphere.radius() + spec.height_offset;
                let actual = target.position.distance(sphere.center());
                assert!(
                    ((actual - expected) / expected).abs() < 1e-9,
                    "distance {actual} != {expected}"
                );
            }
        }
    }

    #[test]
    fn test_placement_keeps_angular_direction() {
        let sphere = sphere();
        let anchor = Pose::new(DVec3::new(10.0, 5.0, 0.0), DQuat::IDENTITY);
        let spec = PlacementSpec::new(DVec3::new(0.0, 0.0, 5.0), DVec3::Z).with_height(0.0);
        let mut target = Pose::IDENTITY;
        place(&mut target, &anchor, &sphere, &spec).unwrap();
        // raw = (10, 5, -5): 45 degrees between +Y and -Z from the center.
        let expected = sphere.center() + DVec3::new(0.0, 1.0, -1.0).normalize() * 5.0;
        assert!((target.position - expected).length() < 1e-12);
    }

    #[test]
    fn test_orientation_up_column_points_to_center() {
        let sphere = sphere();
        let anchor = Pose::new(DVec3::new(10.0, 5.0, 0.0), DQuat::IDENTITY);
        let spec = PlacementSpec::new(DVec3::new(2.0, 0.0, 1.0), DVec3::Z);
        let mut target = Pose::IDENTITY;
        place(&mut target, &anchor, &sphere, &spec).unwrap();
        let to_center = (sphere.center() - target.position).normalize();
        assert!((target.up() - to_center).length() < 1e-9);
    }

    #[test]
    fn test_extra_rotation_is_intrinsic_xyz() {
        let sphere = sphere();
        let anchor = Pose::new(DVec3::new(10.0, 5.0, 0.0), DQuat::IDENTITY);
        let plain = PlacementSpec::new(DVec3::ZERO, DVec3::Z);
        let rotated = plain.with_rotation(EulerXyz::new(FRAC_PI_6, FRAC_PI_2, 0.0));

        let mut base = Pose::IDENTITY;
        let mut target = Pose::IDENTITY;
        place(&mut base, &anchor, &sphere, &plain).unwrap();
        place(&mut target, &anchor, &sphere, &rotated).unwrap();

        let expected = base.orientation
            * DQuat::from_axis_angle(DVec3::X, FRAC_PI_6)
            * DQuat::from_axis_angle(DVec3::Y, FRAC_PI_2);
        assert!(target.orientation.dot(expected).abs() > 1.0 - 1e-12);
        assert_eq!(target.position, base.position);
    }

    #[test]
    fn test_degenerate_hint_leaves_target_untouched() {
        let sphere = sphere();
        // Anchor directly above the center; hint points straight down.
        let anchor = Pose::new(DVec3::new(10.0, 5.0, 0.0), DQuat::IDENTITY);
        let spec = PlacementSpec::new(DVec3::ZERO, DVec3::NEG_Y);
        let before = Pose::new(DVec3::splat(42.0), DQuat::from_rotation_z(0.4));
        let mut target = before;
        assert_eq!(
            place(&mut target, &anchor, &sphere, &spec),
            Err(SurfaceError::DegenerateBasis)
        );
        assert_eq!(target, before);
    }

    #[test]
    fn test_offset_onto_center_fails() {
        let sphere = sphere();
        let anchor = Pose::new(DVec3::new(10.0, 5.0, 0.0), DQuat::IDENTITY);
        let spec = PlacementSpec::new(DVec3::new(0.0, -5.0, 0.0), DVec3::Z);
        let mut target = Pose::IDENTITY;
        assert_eq!(
            place(&mut target, &anchor, &sphere, &spec),
            Err(SurfaceError::AtCenter)
        );
    }

    #[test]
    fn test_host_stands_ahead_and_upright() {
        let sphere = sphere();
        let anchor = Pose::new(DVec3::new(10.0, 5.05, 0.0), DQuat::IDENTITY);
        let host = HostPlacement {
            distance: 2.0,
            height: 0.0,
            yaw: 0.0,
        };
        let mut target = Pose::IDENTITY;
        place_ahead_of(&mut target, &anchor, &sphere, &host).unwrap();

        assert!((target.position.distance(sphere.center()) - 5.0).abs() < 1e-12);
        // Ahead of the anchor: anchor forward is -Z.
        assert!(target.position.z < 0.0);
        let outward = (target.position - sphere.center()).normalize();
        assert!((target.up() - outward).length() < 1e-9);
        // Half turn: the host faces back toward the anchor (+Z side).
        assert!(target.forward().z > 0.0);
    }
}
