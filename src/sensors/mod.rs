//! Sensor subsystem: power meter, thermistor and the aggregating
//! [`SensorHub`].

pub mod power;
pub mod temperature;

use embedded_hal::i2c::I2c;

use power::PowerMeter;
use temperature::NtcThermistor;

/// Owns both sensor drivers.  Each read is best effort: failures are
/// logged by the driver and the previous good value is returned.
pub struct SensorHub<I2C> {
    pub power: PowerMeter<I2C>,
    pub temperature: NtcThermistor,
}

impl<I2C: I2c> SensorHub<I2C> {
    pub fn new(power: PowerMeter<I2C>, temperature: NtcThermistor) -> Self {
        Self { power, temperature }
    }

    pub fn power_w(&mut self) -> f32 {
        self.power.read()
    }

    pub fn temperature_c(&mut self) -> f32 {
        self.temperature.read()
    }
}
