//! Stall monitor.
//!
//! The shutter has no limit switches.  A motor under load draws a
//! characteristic power; when the shutter reaches its top or bottom
//! end-stop the motor stalls against the mechanism and the relay's
//! power draw collapses.  The monitor runs on every sensor tick and
//! forces STOP when a drive session is open and the measured power is
//! below the stall threshold.
//!
//! ## Check lifecycle
//!
//! 1. The session opens when the relays close (output mapping).
//! 2. Each sensor tick, [`StallMonitor::check`] compares the reading
//!    with `stall_threshold_w`.
//! 3. Below threshold → `ActuatorState::stop(StopReason::Stall)`; the
//!    relays open and the session closes in the same poll.
//!
//! This runs in addition to the travel ceiling in the drive arbiter;
//! whichever fires first ends the session.
//!
//! An optional grace period skips the check for a freshly started drive
//! (0 disables it).

use crate::config::ShutterConfig;
use crate::control::state::{ActuatorState, StopReason};
use crate::scheduler::has_elapsed;

/// Result of one stall check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallCheck {
    /// No drive session open, or a stop is already pending.
    Idle,
    /// Session younger than the grace period.
    Grace,
    /// Motor is drawing load current.
    Running,
    /// Power collapsed: STOP requested.
    Stalled,
}

/// Stall monitor.
#[derive(Debug, Clone, Copy)]
pub struct StallMonitor {
    threshold_w: f32,
    grace_ms: u32,
}

impl StallMonitor {
    pub fn new(config: &ShutterConfig) -> Self {
        Self {
            threshold_w: config.stall_threshold_w,
            grace_ms: config.stall_grace_ms,
        }
    }

    pub fn threshold_w(&self) -> f32 {
        self.threshold_w
    }

    /// Evaluate one power reading against the open session.
    pub fn check(&self, state: &mut ActuatorState, power_w: f32, now_ms: u32) -> StallCheck {
        let Some(started) = state.session_started_ms() else {
            return StallCheck::Idle;
        };
        // A stop is already pending; keep its reason.
        if !state.mode().is_driving() {
            return StallCheck::Idle;
        }

        if self.grace_ms > 0 && !has_elapsed(now_ms, started, self.grace_ms) {
            return StallCheck::Grace;
        }

        if power_w < self.threshold_w {
            state.stop(StopReason::Stall);
            StallCheck::Stalled
        } else {
            StallCheck::Running
        }
    }
}
