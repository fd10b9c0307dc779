//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ShutterService (domain)
//! ```
//!
//! Driven adapters (buttons, relays, sensors, the thing/protocol layer,
//! event sinks, storage) implement these traits.  The
//! [`ShutterService`](super::service::ShutterService) consumes them via
//! generics, so the control core never touches hardware directly.
//!
//! None of the runtime ports return errors: sensor and GPIO failures are
//! absorbed by the adapters, which always hand back a best-effort value.

use crate::config::ShutterConfig;
use crate::control::arbiter::ButtonLevels;
use crate::control::state::DrivingMode;

use super::commands::DriveCommand;

// ───────────────────────────────────────────────────────────────
// Input ports (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Manual up/down buttons.
pub trait ButtonPort {
    /// Current polarity-corrected button levels.
    fn read_buttons(&mut self) -> ButtonLevels;
}

/// Power meter and thermistor.
pub trait SensorPort {
    /// Instantaneous power draw in watts.
    fn power_w(&mut self) -> f32;

    /// Device temperature in °C.
    fn temperature_c(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Output port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The two motor relays.
///
/// Implementations MUST switch break-before-make: the released relay is
/// opened before the other one closes, so both are never energised, not
/// even transiently.
pub trait MotorPort {
    fn drive(&mut self, mode: DrivingMode);
}

// ───────────────────────────────────────────────────────────────
// Protocol capability (domain ↔ property/action layer)
// ───────────────────────────────────────────────────────────────

/// Externally visible numeric properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Power,
    Temperature,
}

impl Property {
    pub const ALL: [Self; 2] = [Self::Power, Self::Temperature];

    pub fn name(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Temperature => "temperature",
        }
    }
}

/// The smart-home protocol seen from the core: publish property values,
/// pick up pending actions.
pub trait ThingPort {
    /// Update an externally visible property.  No acknowledgement.
    fn publish(&mut self, property: Property, value: f32);

    /// Take the pending action, if any (latest wins).
    fn read_command(&mut self) -> Option<DriveCommand>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting; invalid values are
/// rejected with [`ConfigError::ValidationFailed`], never clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`ShutterConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<ShutterConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &ShutterConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
