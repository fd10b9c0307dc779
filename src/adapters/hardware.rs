//! Hardware adapter: bridges the real peripherals to the domain ports.
//!
//! Owns the relay pair, the button pair and the [`SensorHub`], exposing
//! them through [`ButtonPort`], [`SensorPort`] and [`MotorPort`].  This
//! is the only module that touches actual hardware.  On non-espidf
//! targets the pins and ADC are simulation stubs, and any
//! `embedded-hal` implementation can be plugged in.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::I2c;

use crate::app::ports::{ButtonPort, MotorPort, SensorPort};
use crate::control::arbiter::ButtonLevels;
use crate::control::state::DrivingMode;
use crate::drivers::button::ButtonPair;
use crate::drivers::hw_init::{GpioInput, GpioOutput};
use crate::drivers::relay::MotorRelays;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I2C, Out = GpioOutput, In = GpioInput> {
    relays: MotorRelays<Out, Out>,
    buttons: ButtonPair<In, In>,
    sensors: SensorHub<I2C>,
}

impl<I2C, Out, In> HardwareAdapter<I2C, Out, In>
where
    I2C: I2c,
    Out: OutputPin,
    In: InputPin,
{
    pub fn new(
        relays: MotorRelays<Out, Out>,
        buttons: ButtonPair<In, In>,
        sensors: SensorHub<I2C>,
    ) -> Self {
        Self {
            relays,
            buttons,
            sensors,
        }
    }

    /// Mode the relays are actually in.
    pub fn relay_state(&self) -> DrivingMode {
        self.relays.state()
    }

    /// Open both relays (boot and panic paths).
    pub fn all_off(&mut self) {
        self.relays.release_all();
    }
}

// ── ButtonPort implementation ─────────────────────────────────

impl<I2C: I2c, Out: OutputPin, In: InputPin> ButtonPort for HardwareAdapter<I2C, Out, In> {
    fn read_buttons(&mut self) -> ButtonLevels {
        self.buttons.sample()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<I2C: I2c, Out: OutputPin, In: InputPin> SensorPort for HardwareAdapter<I2C, Out, In> {
    fn power_w(&mut self) -> f32 {
        self.sensors.power_w()
    }

    fn temperature_c(&mut self) -> f32 {
        self.sensors.temperature_c()
    }
}

// ── MotorPort implementation ──────────────────────────────────

impl<I2C: I2c, Out: OutputPin, In: InputPin> MotorPort for HardwareAdapter<I2C, Out, In> {
    fn drive(&mut self, mode: DrivingMode) {
        self.relays.drive(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins;
    use crate::sensors::power::{Ade7953, PowerMeter};
    use crate::sensors::temperature::NtcThermistor;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Bus that always reports 154 * 12 LSB (12 W).
    struct FixedBus;

    impl ErrorType for FixedBus {
        type Error = ErrorKind;
    }

    impl I2c for FixedBus {
        fn transaction(&mut self, _: u8, ops: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
            for op in ops {
                if let Operation::Read(buf) = op {
                    buf.copy_from_slice(&(154i32 * 12).to_be_bytes());
                }
            }
            Ok(())
        }
    }

    // Sim pins 40..=43 are reserved for this test.
    fn adapter() -> HardwareAdapter<FixedBus> {
        HardwareAdapter::new(
            MotorRelays::new(GpioOutput::new(40), GpioOutput::new(41)),
            ButtonPair::new(GpioInput::new(42), GpioInput::new(43), false),
            SensorHub::new(
                PowerMeter::new(Ade7953::new(FixedBus)),
                NtcThermistor::new(pins::NTC_ADC_CHANNEL),
            ),
        )
    }

    #[test]
    fn ports_reach_the_drivers() {
        use crate::drivers::hw_init::sim_set_level;

        let mut hw = adapter();
        sim_set_level(42, true);
        sim_set_level(43, false);
        assert_eq!(hw.read_buttons(), ButtonLevels::new(true, false));
        sim_set_level(42, false);

        hw.drive(DrivingMode::Down);
        assert_eq!(hw.relay_state(), DrivingMode::Down);
        hw.all_off();
        assert_eq!(hw.relay_state(), DrivingMode::Stop);

        assert!((hw.power_w() - 12.0).abs() < 1e-3);
    }
}
