//! Tick-driven checkpoint cadence.
//!
//! There is no wall clock on the board.  The measurement loop advances a
//! single elapsed-seconds accumulator by the nominal tick length and the
//! slow calibration checkpoint is gated on that same counter.
//!
//! ```text
//!   tick ─▶ tick ─▶ ... ─▶ tick ─┐
//!   elapsed += tick_secs         │  elapsed >= interval
//!                                ▼
//!                    checkpoint fires, elapsed = 0
//! ```
//!
//! The counter is reset on every fire rather than compared with a modulo
//! of an ever-growing total, so it cannot overflow and can never fire
//! twice for the same interval.

use log::debug;

/// Elapsed-time accumulator for the calibration checkpoint.
///
/// Invariant: after [`advance`](Self::advance) returns,
/// `0 <= elapsed_secs() < interval_secs()`.
#[derive(Debug, Clone)]
pub struct CheckpointTimer {
    interval_secs: u32,
    elapsed_secs: u32,
}

impl CheckpointTimer {
    /// `interval_secs` of zero is treated as one second.
    pub fn new(interval_secs: u32) -> Self {
        Self {
            interval_secs: interval_secs.max(1),
            elapsed_secs: 0,
        }
    }

    /// Account for one tick of `tick_secs`.  Returns `true` exactly when
    /// a checkpoint is due; the counter is already reset at that point.
    pub fn advance(&mut self, tick_secs: u32) -> bool {
        self.elapsed_secs = self.elapsed_secs.saturating_add(tick_secs);
        if self.elapsed_secs != 0 && self.elapsed_secs >= self.interval_secs {
            debug!(
                "CheckpointTimer: due after {}s (interval {}s)",
                self.elapsed_secs, self.interval_secs
            );
            self.elapsed_secs = 0;
            return true;
        }
        false
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    /// Seconds until the next checkpoint.
    pub fn remaining_secs(&self) -> u32 {
        self.interval_secs - self.elapsed_secs
    }
}
