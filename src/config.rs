//! System configuration parameters
//!
//! All tunable parameters for the roller shutter controller.
//! Values can be overridden via NVS (non-volatile storage).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Maximum length of the user-assigned device name.
pub const DEVICE_NAME_MAX: usize = 40;

/// User-assigned device name (fixed capacity, no heap).
pub type DeviceName = heapless::String<DEVICE_NAME_MAX>;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShutterConfig {
    // --- Identity ---
    /// Custom device name (e.g. "Kitchen Shutter"); empty = default title.
    pub device_name: DeviceName,

    // --- Timing ---
    /// Button sampling interval (milliseconds)
    pub sample_interval_ms: u32,
    /// Power / temperature read interval (milliseconds)
    pub sensor_interval_ms: u32,
    /// Maximum duration of a single drive session (milliseconds)
    pub max_travel_ms: u32,

    // --- Stall detection ---
    /// Power draw (W) below which a driving motor is considered stalled
    pub stall_threshold_w: f32,
    /// Time after drive start during which stall detection is skipped (ms, 0 = off)
    pub stall_grace_ms: u32,

    // --- Telemetry hysteresis ---
    /// Minimum power change (W) before republishing
    pub power_hysteresis_w: f32,
    /// Minimum temperature change (°C) before republishing
    pub temperature_hysteresis_c: f32,

    // --- Inputs ---
    /// true = a LOW input level means "button pressed"
    pub buttons_active_low: bool,
}

impl Default for ShutterConfig {
    fn default() -> Self {
        Self {
            device_name: DeviceName::new(),

            // Timing
            sample_interval_ms: 500,
            sensor_interval_ms: 2_000,
            max_travel_ms: 120_000, // 2 min

            // Stall detection
            stall_threshold_w: 10.0,
            stall_grace_ms: 0,

            // Telemetry
            power_hysteresis_w: 2.0,
            temperature_hysteresis_c: 20.0,

            // Inputs
            buttons_active_low: false,
        }
    }
}

impl ShutterConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(50..=5_000).contains(&self.sample_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "sample_interval_ms must be 50–5000",
            ));
        }
        if !(100..=60_000).contains(&self.sensor_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "sensor_interval_ms must be 100–60000",
            ));
        }
        if self.sample_interval_ms >= self.sensor_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "sample_interval_ms must be < sensor_interval_ms",
            ));
        }
        if !(1_000..=600_000).contains(&self.max_travel_ms) {
            return Err(ConfigError::ValidationFailed(
                "max_travel_ms must be 1000–600000",
            ));
        }
        if !(self.stall_threshold_w.is_finite() && self.stall_threshold_w > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "stall_threshold_w must be > 0",
            ));
        }
        if self.stall_grace_ms >= self.max_travel_ms {
            return Err(ConfigError::ValidationFailed(
                "stall_grace_ms must be < max_travel_ms",
            ));
        }
        if !(self.power_hysteresis_w.is_finite() && self.power_hysteresis_w > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "power_hysteresis_w must be > 0",
            ));
        }
        if !(self.temperature_hysteresis_c.is_finite() && self.temperature_hysteresis_c > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "temperature_hysteresis_c must be > 0",
            ));
        }
        Ok(())
    }
}
