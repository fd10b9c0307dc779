//! Wall button pair (up / down).
//!
//! ## Hardware
//!
//! Two switches on inputs with pull-ups.  Whether a LOW or a HIGH level
//! means "pressed" depends on the wiring and is configured through
//! `ShutterConfig::buttons_active_low`.
//!
//! Debouncing is done by cadence: the control loop reads the pair only
//! once per sample interval (500 ms by default), so contact bounce never
//! reaches the arbiter.  A pin read error counts as "released".

use embedded_hal::digital::InputPin;
use log::warn;

use crate::control::arbiter::ButtonLevels;

pub struct ButtonPair<U, D> {
    up: U,
    down: D,
    active_low: bool,
}

impl<U: InputPin, D: InputPin> ButtonPair<U, D> {
    pub fn new(up: U, down: D, active_low: bool) -> Self {
        Self {
            up,
            down,
            active_low,
        }
    }

    /// Sample both inputs and return polarity-corrected levels.
    pub fn sample(&mut self) -> ButtonLevels {
        let up = Self::asserted(&mut self.up, self.active_low, "up");
        let down = Self::asserted(&mut self.down, self.active_low, "down");
        ButtonLevels { up, down }
    }

    fn asserted<P: InputPin>(pin: &mut P, active_low: bool, name: &str) -> bool {
        match pin.is_high() {
            Ok(high) => high != active_low,
            Err(_) => {
                warn!("button: {} read failed, treating as released", name);
                false
            }
        }
    }
}
