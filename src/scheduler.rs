//! Elapsed-time gates for the two timing domains of the control loop.
//!
//! The control loop is polled every scheduler tick and never sleeps.
//! Each timing domain owns an [`Interval`] that remembers when it last
//! ran; the loop asks [`Interval::due`] on every poll and skips the work
//! when the period has not elapsed yet.
//!
//! ```text
//!   poll(now) ──▶ sample.due(now)?  ──▶ button sampling   (500 ms)
//!            ──▶ sensors.due(now)? ──▶ stall + telemetry (2000 ms)
//! ```
//!
//! ## Clock wraparound
//!
//! Timestamps are `u32` milliseconds since boot, which wrap after about
//! 49.7 days.  Deltas are computed with wrapping subtraction and then
//! read as a signed value.  A forward wrap therefore still yields the
//! small positive delta, and a *negative* delta (clock stepped backwards,
//! or `last` lies in the future) counts as "interval elapsed" so a gate
//! can never get stuck waiting.

/// Signed delta `now - since` in milliseconds, wrap-tolerant.
pub fn elapsed_ms(now_ms: u32, since_ms: u32) -> i32 {
    now_ms.wrapping_sub(since_ms) as i32
}

/// True when `period_ms` has elapsed between `since_ms` and `now_ms`,
/// or when the delta is negative.
pub fn has_elapsed(now_ms: u32, since_ms: u32, period_ms: u32) -> bool {
    let delta = elapsed_ms(now_ms, since_ms);
    delta < 0 || delta as u32 >= period_ms
}

/// A periodic gate driven by externally supplied timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: u32,
    last_ms: u32,
}

impl Interval {
    /// New gate whose first firing is one period after `start_ms`.
    pub fn new(period_ms: u32, start_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: start_ms,
        }
    }

    /// Returns `true` (and re-arms) when the period has elapsed.
    pub fn due(&mut self, now_ms: u32) -> bool {
        if has_elapsed(now_ms, self.last_ms, self.period_ms) {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Re-arm relative to `now_ms` without firing.
    pub fn reset(&mut self, now_ms: u32) {
        self.last_ms = now_ms;
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Timestamp of the last firing (or of the last reset).
    pub fn last_ms(&self) -> u32 {
        self.last_ms
    }
}
