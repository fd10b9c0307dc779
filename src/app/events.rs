//! Outbound application events.
//!
//! The [`ShutterService`](super::service::ShutterService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them (serial log, test
//! recorder, ...).

use crate::control::state::{DrivingMode, StopReason};

use super::commands::DriveCommand;
use super::ports::Property;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started; carries the boot baselines.
    Started { power_w: f32, temperature_c: f32 },

    /// An external action was taken from the mailbox.
    CommandReceived(DriveCommand),

    /// The relays switched.  `reason` is set when `to` is STOP.
    ModeChanged {
        from: DrivingMode,
        to: DrivingMode,
        reason: Option<StopReason>,
    },

    /// A property crossed its hysteresis and was republished.
    PropertyPublished { property: Property, value: f32 },
}
