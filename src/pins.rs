//! GPIO / peripheral pin assignments for the roller shutter board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Motor relays
// ---------------------------------------------------------------------------

/// Digital output: HIGH energises the "up" winding relay.
pub const UP_RELAY_GPIO: i32 = 4;
/// Digital output: HIGH energises the "down" winding relay.
pub const DOWN_RELAY_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Wall buttons (pull-up enabled)
// ---------------------------------------------------------------------------

pub const UP_BUTTON_GPIO: i32 = 13;
pub const DOWN_BUTTON_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// ADE7953 energy meter (I²C)
// ---------------------------------------------------------------------------

pub const METER_SDA_GPIO: i32 = 12;
pub const METER_SCL_GPIO: i32 = 14;
/// I²C bus clock for the energy meter.
pub const METER_I2C_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// NTC thermistor (ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel 7 (GPIO 35 on ESP32).
pub const NTC_ADC_GPIO: i32 = 35;
pub const NTC_ADC_CHANNEL: u32 = 7;
