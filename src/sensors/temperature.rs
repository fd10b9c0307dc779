//! NTC thermistor on the board (8 kOhm @ 25 C, B = 3350).
//!
//! Wired as the low side of a voltage divider with a 32 kOhm series
//! resistor and read through ADC1.  The simplified Beta equation turns the
//! resistance into a temperature.
//!
//! ## Dual-target design
//!
//! Reads go through [`hw_init::adc1_read`], which is backed by an
//! injectable atomic on the host.

use log::warn;

use crate::drivers::hw_init;
use crate::error::SensorError;

const BETA: f32 = 3350.0;
const R_SERIES: f32 = 32_000.0;
const R_NOMINAL: f32 = 8_000.0;
const T_NOMINAL_K: f32 = 298.15;
const ADC_MAX: f32 = 4095.0;

/// Convert a raw 12-bit ADC sample to °C.
///
/// Readings pinned to either rail mean an open or shorted thermistor.
pub fn celsius_from_raw(raw: u16) -> Result<f32, SensorError> {
    let ratio = f32::from(raw) / ADC_MAX;
    if ratio <= 0.002 || ratio >= 0.998 {
        return Err(SensorError::OutOfRange);
    }
    let r_ntc = R_SERIES * ratio / (1.0 - ratio);
    let inv_t = (1.0 / T_NOMINAL_K) + (r_ntc / R_NOMINAL).ln() / BETA;
    if inv_t <= 0.0 {
        return Err(SensorError::OutOfRange);
    }
    Ok(1.0 / inv_t - 273.15)
}

pub struct NtcThermistor {
    channel: u32,
    last_c: f32,
}

impl NtcThermistor {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            last_c: 0.0,
        }
    }

    /// Best-effort temperature; the previous value on a failed read.
    pub fn read(&mut self) -> f32 {
        let result = hw_init::adc1_read(self.channel)
            .ok_or(SensorError::AdcReadFailed)
            .and_then(celsius_from_raw);
        match result {
            Ok(c) => self.last_c = c,
            Err(e) => warn!("NTC: {} (keeping {:.1} C)", e, self.last_c),
        }
        self.last_c
    }
}
