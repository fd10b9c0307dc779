//! ADE7953 single-phase energy meter on I²C.
//!
//! Only the channel-A active power register is used.  The chip needs two
//! register writes after power-up before its readings are valid: the
//! unlock key at 0xFE followed by the "optimum settings" value at 0x120
//! (datasheet, section "Initialisation").
//!
//! Registers are addressed with a 16-bit big-endian address; the width of
//! the register follows from its address range (0x3xx = 32-bit).
//!
//! ## Dual-target design
//!
//! Generic over `embedded_hal::i2c::I2c`: `esp_idf_hal::i2c::I2cDriver`
//! on the device, a scripted mock bus in tests.

use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::error::SensorError;

/// 7-bit bus address (fixed by the chip).
pub const ADE7953_ADDR: u8 = 0x38;

const REG_UNLOCK: u16 = 0x00FE;
const UNLOCK_KEY: u8 = 0xAD;
const REG_OPTIMUM: u16 = 0x0120;
const OPTIMUM_VALUE: u16 = 0x0030;
/// Channel A instantaneous active power, 32-bit signed.
const REG_AWATT: u16 = 0x0312;

/// Register LSBs per watt for the board's shunt and divider.
pub const DEFAULT_LSB_PER_WATT: f32 = 154.0;

/// Anything above this is a corrupt frame, not a roller shutter motor.
const MAX_PLAUSIBLE_W: f32 = 5_000.0;

pub struct Ade7953<I2C> {
    bus: I2C,
    lsb_per_watt: f32,
}

impl<I2C: I2c> Ade7953<I2C> {
    pub fn new(bus: I2C) -> Self {
        Self::with_scale(bus, DEFAULT_LSB_PER_WATT)
    }

    pub fn with_scale(bus: I2C, lsb_per_watt: f32) -> Self {
        Self { bus, lsb_per_watt }
    }

    /// Unlock and write the optimum-settings register.
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.write_u8(REG_UNLOCK, UNLOCK_KEY)?;
        self.write_u16(REG_OPTIMUM, OPTIMUM_VALUE)?;
        info!("ADE7953: initialised (addr 0x{:02X})", ADE7953_ADDR);
        Ok(())
    }

    /// Instantaneous active power in watts (magnitude).
    pub fn read_power_w(&mut self) -> Result<f32, SensorError> {
        let raw = self.read_i32(REG_AWATT)?;
        let watts = (raw.unsigned_abs() as f32) / self.lsb_per_watt;
        if watts > MAX_PLAUSIBLE_W {
            return Err(SensorError::OutOfRange);
        }
        Ok(watts)
    }

    fn write_u8(&mut self, reg: u16, value: u8) -> Result<(), SensorError> {
        let [hi, lo] = reg.to_be_bytes();
        self.bus
            .write(ADE7953_ADDR, &[hi, lo, value])
            .map_err(|_| SensorError::BusError)
    }

    fn write_u16(&mut self, reg: u16, value: u16) -> Result<(), SensorError> {
        let [hi, lo] = reg.to_be_bytes();
        let [v0, v1] = value.to_be_bytes();
        self.bus
            .write(ADE7953_ADDR, &[hi, lo, v0, v1])
            .map_err(|_| SensorError::BusError)
    }

    fn read_i32(&mut self, reg: u16) -> Result<i32, SensorError> {
        let mut buf = [0u8; 4];
        self.bus
            .write_read(ADE7953_ADDR, &reg.to_be_bytes(), &mut buf)
            .map_err(|_| SensorError::BusError)?;
        Ok(i32::from_be_bytes(buf))
    }
}

/// [`Ade7953`] plus the last good reading.
///
/// Never fails the caller: a bus error or implausible frame is logged and
/// the previous value returned.  Starts at 0 W.
pub struct PowerMeter<I2C> {
    chip: Ade7953<I2C>,
    last_w: f32,
    failures: u32,
}

impl<I2C: I2c> PowerMeter<I2C> {
    pub fn new(chip: Ade7953<I2C>) -> Self {
        Self {
            chip,
            last_w: 0.0,
            failures: 0,
        }
    }

    pub fn read(&mut self) -> f32 {
        match self.chip.read_power_w() {
            Ok(w) => self.last_w = w,
            Err(e) => {
                self.failures = self.failures.saturating_add(1);
                warn!("ADE7953: {} (keeping {:.1} W)", e, self.last_w);
            }
        }
        self.last_w
    }

    /// Reads that fell back to the previous value since boot.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
