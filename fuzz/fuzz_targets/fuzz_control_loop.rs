//! Fuzz target: `ShutterService::poll`
//!
//! Each input byte is one control-loop step: the low two bits pick the
//! event (time advance, button levels, external command, power reading)
//! and the rest is its argument.
//!
//! Invariants checked:
//! - No panics
//! - The motor is never told to drive while the session is closed, nor
//!   left stopped with a session open
//! - No drive session outlives the travel ceiling
//!
//! cargo fuzz run fuzz_control_loop

#![no_main]

use libfuzzer_sys::fuzz_target;
use rollershutter::app::commands::DriveCommand;
use rollershutter::app::events::AppEvent;
use rollershutter::app::ports::{ButtonPort, EventSink, MotorPort, Property, SensorPort, ThingPort};
use rollershutter::app::service::ShutterService;
use rollershutter::config::ShutterConfig;
use rollershutter::control::arbiter::ButtonLevels;
use rollershutter::control::state::DrivingMode;
use rollershutter::scheduler::elapsed_ms;

struct Rig {
    buttons: ButtonLevels,
    power_w: f32,
    motor: DrivingMode,
}

impl ButtonPort for Rig {
    fn read_buttons(&mut self) -> ButtonLevels {
        self.buttons
    }
}

impl SensorPort for Rig {
    fn power_w(&mut self) -> f32 {
        self.power_w
    }
    fn temperature_c(&mut self) -> f32 {
        25.0
    }
}

impl MotorPort for Rig {
    fn drive(&mut self, mode: DrivingMode) {
        self.motor = mode;
    }
}

struct Thing(Option<DriveCommand>);

impl ThingPort for Thing {
    fn publish(&mut self, _: Property, _: f32) {}
    fn read_command(&mut self) -> Option<DriveCommand> {
        self.0.take()
    }
}

struct Null;

impl EventSink for Null {
    fn emit(&mut self, _: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = ShutterConfig::default();
    let mut service = ShutterService::new(&config);
    let mut rig = Rig {
        buttons: ButtonLevels::RELEASED,
        power_w: 50.0,
        motor: DrivingMode::Stop,
    };
    let mut thing = Thing(None);
    let mut now: u32 = u32::MAX - 60_000;
    service.start(now, &mut rig, &mut thing, &mut Null);

    for &b in data {
        let arg = b >> 2;
        match b & 0b11 {
            0 => now = now.wrapping_add(u32::from(arg) * 250),
            1 => rig.buttons = ButtonLevels::new(arg & 1 != 0, arg & 2 != 0),
            2 => {
                thing.0 = Some(match arg % 3 {
                    0 => DriveCommand::Stop,
                    1 => DriveCommand::Up,
                    _ => DriveCommand::Down,
                })
            }
            _ => rig.power_w = f32::from(arg),
        }
        service.poll(now, &mut rig, &mut thing, &mut Null);

        let state = service.state();
        assert_eq!(rig.motor, state.applied());
        assert_eq!(state.session_active(), rig.motor != DrivingMode::Stop);
        if let Some(started) = state.session_started_ms() {
            let age = elapsed_ms(now, started);
            assert!(age >= 0 && (age as u32) < config.max_travel_ms);
        }
    }
});
