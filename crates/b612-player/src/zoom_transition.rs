//! Frame-counted camera zoom between two snapshots.

use glam::DVec3;

use crate::CameraState;

/// Camera position and look target at one end of a zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
    pub position: DVec3,
    pub target: DVec3,
}

impl CameraSnapshot {
    pub fn from_camera(camera: &CameraState) -> Self {
        Self {
            position: camera.position,
            target: camera.target,
        }
    }

    /// The standard close-up of a sphere: `offset_radii` scaled by the
    /// radius, looking at the center.
    pub fn close_up(center: DVec3, radius: f64, offset_radii: DVec3) -> Self {
        Self {
            position: center + offset_radii * radius,
            target: center,
        }
    }
}

/// Easing curves for the zoom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EasingFunction {
    /// Constant speed.
    #[default]
    Linear,
    /// Slow start, fast end.
    EaseIn,
    /// Fast start, slow end.
    EaseOut,
    /// Slow start and end.
    EaseInOut,
}

impl EasingFunction {
    /// Map linear progress in `0.0..=1.0` to eased progress.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// An in-flight zoom. Exists only while the view is zooming.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransition {
    from: CameraSnapshot,
    to: CameraSnapshot,
    duration_frames: u32,
    frame: u32,
    easing: EasingFunction,
}

impl ZoomTransition {
    /// Start a zoom at frame 0. A duration of 0 is clamped to 1 frame.
    pub fn new(
        from: CameraSnapshot,
        to: CameraSnapshot,
        duration_frames: u32,
        easing: EasingFunction,
    ) -> Self {
        Self {
            from,
            to,
            duration_frames: duration_frames.max(1),
            frame: 0,
            easing,
        }
    }

    pub fn from(&self) -> CameraSnapshot {
        self.from
    }

    pub fn to(&self) -> CameraSnapshot {
        self.to
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn duration_frames(&self) -> u32 {
        self.duration_frames
    }

    /// `frame / duration`, eased.
    pub fn alpha(&self) -> f64 {
        self.easing
            .apply(f64::from(self.frame) / f64::from(self.duration_frames))
    }

    /// Interpolated snapshot at the current frame. Exactly `to` once the
    /// last frame is reached.
    pub fn sample(&self) -> CameraSnapshot {
        if self.is_complete() {
            return self.to;
        }
        let t = self.alpha();
        CameraSnapshot {
            position: self.from.position.lerp(self.to.position, t),
            target: self.from.target.lerp(self.to.target, t),
        }
    }

    /// Write the current sample into `camera` and re-aim it.
    pub fn apply(&self, camera: &mut CameraState) {
        let snapshot = self.sample();
        camera.position = snapshot.position;
        camera.target = snapshot.target;
        camera.look_at_target();
    }

    pub fn is_complete(&self) -> bool {
        self.frame >= self.duration_frames
    }

    /// Move to the next frame; stops at the last one.
    pub fn advance(&mut self) {
        if !self.is_complete() {
            self.frame += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(easing: EasingFunction) -> ZoomTransition {
        ZoomTransition::new(
            CameraSnapshot {
                position: DVec3::new(0.0, 5.0, 15.0),
                target: DVec3::ZERO,
            },
            CameraSnapshot::close_up(DVec3::new(10.0, 0.0, 0.0), 5.0, DVec3::new(0.0, 1.5, 2.5)),
            60,
            easing,
        )
    }

    #[test]
    fn test_close_up_scales_with_radius() {
        let snap =
            CameraSnapshot::close_up(DVec3::new(10.0, 0.0, 0.0), 5.0, DVec3::new(0.0, 1.5, 2.5));
        assert_eq!(snap.position, DVec3::new(10.0, 7.5, 12.5));
        assert_eq!(snap.target, DVec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_frame_zero_is_start_snapshot() {
        let zoom = transition(EasingFunction::Linear);
        assert_eq!(zoom.sample(), zoom.from());
    }

    #[test]
    fn test_last_frame_is_end_snapshot() {
        let mut zoom = transition(EasingFunction::EaseInOut);
        for _ in 0..60 {
            zoom.advance();
        }
        assert!(zoom.is_complete());
        assert_eq!(zoom.sample(), zoom.to());
        zoom.advance();
        assert_eq!(zoom.frame(), 60);
    }

    #[test]
    fn test_linear_midpoint() {
        let mut zoom = transition(EasingFunction::Linear);
        for _ in 0..30 {
            zoom.advance();
        }
        assert!((zoom.alpha() - 0.5).abs() < 1e-15);
        let mid = zoom.sample();
        assert!((mid.position - DVec3::new(5.0, 6.25, 13.75)).length() < 1e-12);
        assert!((mid.target - DVec3::new(5.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_zero_duration_clamped() {
        let zoom = ZoomTransition::new(
            transition(EasingFunction::Linear).from(),
            transition(EasingFunction::Linear).to(),
            0,
            EasingFunction::Linear,
        );
        assert_eq!(zoom.duration_frames(), 1);
        assert!(!zoom.is_complete());
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert!(EasingFunction::EaseIn.apply(0.5) < 0.5);
        assert!(EasingFunction::EaseOut.apply(0.5) > 0.5);
    }
}
