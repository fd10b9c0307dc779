//! Shared actuator state threaded through the arbiter, the stall monitor,
//! and the output-mapping step.
//!
//! `ActuatorState` owns the drive mode and the session start timestamp
//! and is passed explicitly to every component.  Every writer (button
//! sampling, external command, travel ceiling, stall detection) goes
//! through [`ActuatorState::set_mode`] or [`ActuatorState::stop`]; the
//! relays only follow the mode once per poll in
//! [`ActuatorState::apply`].
//!
//! ## Invariants
//!
//! - `session_started_ms` is `Some` exactly when the *applied* mode is
//!   `Up` or `Down`.
//! - The applied mode only changes in `apply()`, so between two polls
//!   the outputs never observe an intermediate mode.

use serde::{Deserialize, Serialize};

/// Commanded / actual motor direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrivingMode {
    #[default]
    Stop,
    Up,
    Down,
}

impl DrivingMode {
    /// True for `Up` and `Down`.
    pub fn is_driving(self) -> bool {
        !matches!(self, Self::Stop)
    }
}

impl core::fmt::Display for DrivingMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Stop => write!(f, "STOP"),
            Self::Up => write!(f, "UP"),
            Self::Down => write!(f, "DOWN"),
        }
    }
}

/// Why the shutter was last brought to STOP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// External `stop` action from the protocol layer.
    Command,
    /// A button was pressed while a drive was in progress.
    Button,
    /// Both buttons asserted on the same sample.
    AmbiguousInput,
    /// The drive exceeded the maximum travel time.
    TravelTimeout,
    /// Power draw collapsed while driving (end-stop reached).
    Stall,
}

impl core::fmt::Display for StopReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Command => write!(f, "stop command"),
            Self::Button => write!(f, "button"),
            Self::AmbiguousInput => write!(f, "both buttons pressed"),
            Self::TravelTimeout => write!(f, "travel timeout"),
            Self::Stall => write!(f, "stall (end-stop reached)"),
        }
    }
}

/// Outcome of [`ActuatorState::apply`] when the relays had to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DrivingMode,
    pub to: DrivingMode,
    /// Set when `to == Stop`.
    pub reason: Option<StopReason>,
}

/// Owned replacement for the global driving mode and session timestamp.
#[derive(Debug, Clone, Default)]
pub struct ActuatorState {
    /// Mode requested by the latest writer.
    mode: DrivingMode,
    /// Mode the relays currently reflect.
    applied: DrivingMode,
    /// Timestamp (ms) at which the current drive session started.
    session_started_ms: Option<u32>,
    /// Reason recorded by the latest writer that requested STOP.
    pending_stop: Option<StopReason>,
    /// Reason of the most recent applied STOP.
    last_stop: Option<StopReason>,
}

impl ActuatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested mode (what the relays will show after the next `apply`).
    pub fn mode(&self) -> DrivingMode {
        self.mode
    }

    /// Mode the relays currently reflect.
    pub fn applied(&self) -> DrivingMode {
        self.applied
    }

    /// Direction the motor is committed to: the applied drive while the
    /// relays are closed, otherwise the requested mode.  Direction rules
    /// judge against this so a pending STOP cannot open a reversal.
    pub fn motion(&self) -> DrivingMode {
        if self.applied.is_driving() {
            self.applied
        } else {
            self.mode
        }
    }

    /// Start timestamp of the active drive session, if any.
    pub fn session_started_ms(&self) -> Option<u32> {
        self.session_started_ms
    }

    /// True while a drive session is open.
    pub fn session_active(&self) -> bool {
        self.session_started_ms.is_some()
    }

    /// Reason the shutter was last stopped.
    pub fn last_stop(&self) -> Option<StopReason> {
        self.last_stop
    }

    /// Request a drive direction.  `Stop` is recorded without a reason;
    /// use [`stop`](Self::stop) when the cause is known.
    pub fn set_mode(&mut self, mode: DrivingMode) {
        self.mode = mode;
        if mode.is_driving() {
            self.pending_stop = None;
        }
    }

    /// Request STOP and record why.  Last writer before `apply` wins.
    pub fn stop(&mut self, reason: StopReason) {
        self.mode = DrivingMode::Stop;
        self.pending_stop = Some(reason);
    }

    /// Reconcile the applied mode with the requested one.
    ///
    /// Returns `None` when nothing changed (outputs stay as they are).
    /// On entering `Up`/`Down` the session clock restarts at `now_ms`;
    /// on entering `Stop` the session is closed.
    pub fn apply(&mut self, now_ms: u32) -> Option<Transition> {
        if self.mode == self.applied {
            // A stop request while already stopped must not rewrite history.
            self.pending_stop = None;
            return None;
        }

        let from = self.applied;
        self.applied = self.mode;

        let reason = if self.mode.is_driving() {
            self.session_started_ms = Some(now_ms);
            None
        } else {
            self.session_started_ms = None;
            let reason = self.pending_stop.take().unwrap_or(StopReason::Command);
            self.last_stop = Some(reason);
            Some(reason)
        };

        Some(Transition {
            from,
            to: self.mode,
            reason,
        })
    }
}
