//! Fixed-timestep frame loop ("Fix Your Timestep").
//!
//! The session advances in fixed 60 Hz updates regardless of how long a
//! frame took. Frame times are passed in rather than measured, so a scripted
//! run is reproducible.

use tracing::warn;

/// Fixed update step: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame time accepted before clamping (4 fps). Longer frames slow
/// the simulation down instead of running dozens of catch-up updates.
pub const MAX_FRAME_TIME: f64 = 0.25;

#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame of `frame_time` seconds and run `update_fn(FIXED_DT)`
    /// as many times as the accumulated time allows. Returns the number of
    /// updates run.
    pub fn tick(&mut self, frame_time: f64, mut update_fn: impl FnMut(f64)) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        let mut updates = 0;
        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
            updates += 1;
        }
        self.frame_count += 1;
        updates
    }

    /// Fraction of a fixed step left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}
