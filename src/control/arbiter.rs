//! Drive arbiter: manual buttons, commanded direction, travel ceiling.
//!
//! ## Button rules (evaluated once per sample interval)
//!
//! | up | down | current mode | result                    |
//! |----|------|--------------|---------------------------|
//! | ✔  | ✔    | any          | STOP (ambiguous input)    |
//! | ✔  |      | STOP         | UP                        |
//! |    | ✔    | STOP         | DOWN                      |
//! | ✔  |      | UP / DOWN    | STOP (button)             |
//! |    | ✔    | UP / DOWN    | STOP (button)             |
//! |    |      | any          | unchanged                 |
//!
//! Buttons only *start* a motion from STOP.  A press during a drive, in
//! either direction, stops the motor; reversing needs a second press
//! after the motor has passed through STOP.
//!
//! ## Travel ceiling
//!
//! Checked on every poll, independent of the sample interval.  An open
//! drive session older than `max_travel_ms` is forced to STOP with
//! [`StopReason::TravelTimeout`].  The session closes when the stop is
//! applied, so the ceiling fires once per session.

use super::state::{ActuatorState, DrivingMode, StopReason};
use crate::scheduler::has_elapsed;

/// Debounced levels of the two manual buttons, already polarity-corrected
/// (`true` = asserted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonLevels {
    pub up: bool,
    pub down: bool,
}

impl ButtonLevels {
    pub const RELEASED: Self = Self {
        up: false,
        down: false,
    };

    pub fn new(up: bool, down: bool) -> Self {
        Self { up, down }
    }
}

/// What a button sample asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonDecision {
    /// No button asserted; the current mode stands.
    Keep,
    Drive(DrivingMode),
    Stop(StopReason),
}

/// Pure button rule table (see module docs).
pub fn decide(buttons: ButtonLevels, current: DrivingMode) -> ButtonDecision {
    match (buttons.up, buttons.down, current) {
        (true, true, _) => ButtonDecision::Stop(StopReason::AmbiguousInput),
        (true, false, DrivingMode::Stop) => ButtonDecision::Drive(DrivingMode::Up),
        (false, true, DrivingMode::Stop) => ButtonDecision::Drive(DrivingMode::Down),
        (false, false, _) => ButtonDecision::Keep,
        _ => ButtonDecision::Stop(StopReason::Button),
    }
}

/// Drive arbiter.  Holds only its tuning; all mutable state lives in
/// [`ActuatorState`].
#[derive(Debug, Clone, Copy)]
pub struct DriveArbiter {
    max_travel_ms: u32,
}

impl DriveArbiter {
    pub fn new(max_travel_ms: u32) -> Self {
        Self { max_travel_ms }
    }

    pub fn max_travel_ms(&self) -> u32 {
        self.max_travel_ms
    }

    /// Apply one button sample to the shared state.
    /// Returns the decision for the poll report.
    pub fn sample(&self, state: &mut ActuatorState, buttons: ButtonLevels) -> ButtonDecision {
        let decision = decide(buttons, state.motion());
        match decision {
            ButtonDecision::Keep => {}
            ButtonDecision::Drive(mode) => state.set_mode(mode),
            ButtonDecision::Stop(reason) => state.stop(reason),
        }
        decision
    }

    /// Force STOP when the open session has run for `max_travel_ms`.
    /// Returns `true` when the ceiling fired on this call.
    pub fn check_travel_timeout(&self, state: &mut ActuatorState, now_ms: u32) -> bool {
        let Some(started) = state.session_started_ms() else {
            return false;
        };
        // A stop is already pending for this session.
        if !state.mode().is_driving() {
            return false;
        }
        if has_elapsed(now_ms, started, self.max_travel_ms) {
            state.stop(StopReason::TravelTimeout);
            true
        } else {
            false
        }
    }
}
