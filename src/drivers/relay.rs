//! Motor relay pair (up winding / down winding).
//!
//! ## Safety contract
//!
//! Both relays closed shorts the motor's two windings against each
//! other.  Every switch is break-before-make: the relay that must end up
//! open is released first, and the other one is only energised if that
//! release succeeded.  A failed write leaves the pair in the safest state
//! it can reach (both released when possible).
//!
//! ## Dual-target design
//!
//! Generic over `embedded-hal` output pins: [`GpioOutput`] on the device,
//! recording mock pins in tests.
//!
//! [`GpioOutput`]: crate::drivers::hw_init::GpioOutput

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::control::state::DrivingMode;

pub struct MotorRelays<U, D> {
    up: U,
    down: D,
    state: DrivingMode,
}

impl<U: OutputPin, D: OutputPin> MotorRelays<U, D> {
    /// Take ownership of the pins and release both relays.
    pub fn new(up: U, down: D) -> Self {
        let mut relays = Self {
            up,
            down,
            state: DrivingMode::Stop,
        };
        relays.release_all();
        relays
    }

    /// Switch to `mode`, break-before-make.
    pub fn drive(&mut self, mode: DrivingMode) {
        match mode {
            DrivingMode::Stop => self.release_all(),
            DrivingMode::Up => {
                if self.down.set_low().is_err() {
                    warn!("relay: down release failed, refusing UP");
                    self.release_all();
                    return;
                }
                if self.up.set_high().is_err() {
                    warn!("relay: up energise failed");
                    self.release_all();
                    return;
                }
                self.state = DrivingMode::Up;
            }
            DrivingMode::Down => {
                if self.up.set_low().is_err() {
                    warn!("relay: up release failed, refusing DOWN");
                    self.release_all();
                    return;
                }
                if self.down.set_high().is_err() {
                    warn!("relay: down energise failed");
                    self.release_all();
                    return;
                }
                self.state = DrivingMode::Down;
            }
        }
    }

    /// Open both relays.
    pub fn release_all(&mut self) {
        if self.up.set_low().is_err() {
            warn!("relay: up release failed");
        }
        if self.down.set_low().is_err() {
            warn!("relay: down release failed");
        }
        self.state = DrivingMode::Stop;
    }

    /// Mode the relays were last switched to successfully.
    pub fn state(&self) -> DrivingMode {
        self.state
    }
}
