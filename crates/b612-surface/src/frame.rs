//! Orthonormal frames from an up vector and a forward hint.

use glam::{DMat3, DQuat, DVec3};

use crate::SurfaceError;

/// Squared length below which a cross product is treated as zero. Corresponds
/// to inputs within about 1e-5 rad of being colinear.
const COLINEAR_EPSILON_SQ: f64 = 1e-10;

/// Build a rotation whose columns are `(x, up, z)`.
///
/// `up` is kept exactly (normalized). `forward_hint` only needs to be roughly
/// perpendicular: `x = normalize(up × hint)` and `z = x × up`, so the result
/// is orthonormal and right-handed whatever the hint's component along `up`.
///
/// # Errors
///
/// [`SurfaceError::DegenerateBasis`] if either input is zero-length or
/// non-finite, or if they are (anti-)parallel.
pub fn build_frame(up: DVec3, forward_hint: DVec3) -> Result<DQuat, SurfaceError> {
    let y = up.try_normalize().ok_or(SurfaceError::DegenerateBasis)?;
    let hint = forward_hint
        .try_normalize()
        .ok_or(SurfaceError::DegenerateBasis)?;

    let x = y.cross(hint);
    if x.length_squared() < COLINEAR_EPSILON_SQ {
        return Err(SurfaceError::DegenerateBasis);
    }
    let x = x.normalize();
    let z = x.cross(y);

    Ok(DQuat::from_mat3(&DMat3::from_cols(x, y, z)).normalize())
}

/// Like [`build_frame`], but substitutes [`any_perpendicular`] for a
/// degenerate hint. A zero-length `up` yields the identity rotation.
pub fn build_frame_or_fallback(up: DVec3, forward_hint: DVec3) -> DQuat {
    match build_frame(up, forward_hint) {
        Ok(q) => q,
        Err(_) => {
            let hint = any_perpendicular(up);
            build_frame(up, hint).unwrap_or(DQuat::IDENTITY)
        }
    }
}

/// A deterministic unit vector perpendicular to `v`: `v` crossed with the
/// world axis it is least aligned with. Zero if `v` is zero.
pub fn any_perpendicular(v: DVec3) -> DVec3 {
    let a = v.abs();
    let axis = if a.x <= a.y && a.x <= a.z {
        DVec3::X
    } else if a.y <= a.z {
        DVec3::Y
    } else {
        DVec3::Z
    };
    v.cross(axis).normalize_or_zero()
}

/// Rotation for a camera at `eye` looking at `target`: local -Z points at the
/// target, local +Y is as close to `up` as the view direction allows.
///
/// Returns `None` when `eye == target` or the view direction is parallel to
/// `up`.
pub fn look_rotation(eye: DVec3, target: DVec3, up: DVec3) -> Option<DQuat> {
    let forward = (target - eye).try_normalize()?;
    let right = forward.cross(up);
    if right.length_squared() < COLINEAR_EPSILON_SQ {
        return None;
    }
    let right = right.normalize();
    let corrected_up = right.cross(forward);
    Some(DQuat::from_mat3(&DMat3::from_cols(right, corrected_up, -forward)).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(q: DQuat) {
        let m = DMat3::from_quat(q);
        let (x, y, z) = (m.x_axis, m.y_axis, m.z_axis);
        for axis in [x, y, z] {
            assert!((axis.length() - 1.0).abs() < 1e-9, "axis not unit: {axis}");
        }
        assert!(x.dot(y).abs() < 1e-9);
        assert!(y.dot(z).abs() < 1e-9);
        assert!(z.dot(x).abs() < 1e-9);
        assert!((x.cross(y) - z).length() < 1e-9, "frame is not right-handed");
    }

    #[test]
    fn test_frame_is_orthonormal_for_many_inputs() {
        let dirs = [
            DVec3::new(0.3, 1.0, -0.2),
            DVec3::new(-4.0, 0.5, 2.0),
            DVec3::new(0.0, -1.0, 0.001),
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(-0.7, 0.1, -9.0),
        ];
        for up in dirs {
            for hint in dirs {
                if let Ok(q) = build_frame(up, hint) {
                    assert_orthonormal(q);
                }
            }
        }
    }

    #[test]
    fn test_up_column_is_exact_and_hint_is_reorthogonalized() {
        let up = DVec3::new(0.0, 2.0, 0.0);
        let hint = DVec3::new(0.0, 1.0, 1.0);
        let q = build_frame(up, hint).unwrap();
        assert!((q * DVec3::Y - DVec3::Y).length() < 1e-12);
        // The hint's component along up is removed: z lies in the XZ plane.
        assert!((q * DVec3::Z - DVec3::Z).length() < 1e-12);
        assert!((q * DVec3::X - DVec3::X).length() < 1e-12);
    }

    #[test]
    fn test_parallel_inputs_fail_explicitly() {
        let up = DVec3::new(0.0, 3.0, 0.0);
        assert_eq!(
            build_frame(up, DVec3::Y),
            Err(SurfaceError::DegenerateBasis)
        );
        assert_eq!(
            build_frame(up, DVec3::NEG_Y * 5.0),
            Err(SurfaceError::DegenerateBasis)
        );
        assert_eq!(
            build_frame(DVec3::ZERO, DVec3::X),
            Err(SurfaceError::DegenerateBasis)
        );
        assert_eq!(
            build_frame(DVec3::Y, DVec3::new(f64::NAN, 0.0, 0.0)),
            Err(SurfaceError::DegenerateBasis)
        );
    }

    #[test]
    fn test_fallback_never_produces_nan() {
        for up in [DVec3::X, DVec3::NEG_Y, DVec3::new(1.0, 1.0, 0.0)] {
            let q = build_frame_or_fallback(up, up * 2.0);
            assert!(q.is_finite());
            assert_orthonormal(q);
            assert!((q * DVec3::Y - up.normalize()).length() < 1e-9);
        }
        assert_eq!(build_frame_or_fallback(DVec3::ZERO, DVec3::X), DQuat::IDENTITY);
    }

    #[test]
    fn test_any_perpendicular_is_perpendicular() {
        for v in [DVec3::X, DVec3::Y, DVec3::Z, DVec3::new(0.2, -5.0, 3.0)] {
            let p = any_perpendicular(v);
            assert!((p.length() - 1.0).abs() < 1e-12);
            assert!(p.dot(v).abs() < 1e-12);
        }
        assert_eq!(any_perpendicular(DVec3::ZERO), DVec3::ZERO);
    }

    #[test]
    fn test_look_rotation_points_negative_z_at_target() {
        let eye = DVec3::new(0.0, 5.0, 15.0);
        let q = look_rotation(eye, DVec3::ZERO, DVec3::Y).unwrap();
        let forward = q * DVec3::NEG_Z;
        assert!((forward - (-eye).normalize()).length() < 1e-12);
        assert!((q * DVec3::Y).dot(DVec3::Y) > 0.0);
        assert_orthonormal(q);
    }

    #[test]
    fn test_look_rotation_rejects_degenerate_views() {
        assert!(look_rotation(DVec3::ONE, DVec3::ONE, DVec3::Y).is_none());
        assert!(look_rotation(DVec3::new(0.0, 5.0, 0.0), DVec3::ZERO, DVec3::Y).is_none());
    }
}
