//! Mock adapters for integration tests.
//!
//! `MockHardware` puts the real relay driver on top of recording pins,
//! so every test also checks at pin level that both windings are never
//! energised together.  Sensor readings and button levels are scripted by
//! the test.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};
use rollershutter::app::commands::DriveCommand;
use rollershutter::app::events::AppEvent;
use rollershutter::app::ports::{ButtonPort, EventSink, MotorPort, Property, SensorPort, ThingPort};
use rollershutter::control::arbiter::ButtonLevels;
use rollershutter::control::state::{DrivingMode, StopReason};
use rollershutter::drivers::relay::MotorRelays;

// ── Relay pins ────────────────────────────────────────────────

/// Shared pin levels: (up, down), plus a count of writes that left both high.
#[derive(Debug, Default)]
pub struct RelayBank {
    pub up: bool,
    pub down: bool,
    pub overlaps: u32,
    pub writes: u32,
}

pub struct RecordingPin {
    bank: Rc<RefCell<RelayBank>>,
    is_up: bool,
}

impl RecordingPin {
    fn set(&mut self, high: bool) {
        let mut bank = self.bank.borrow_mut();
        if self.is_up {
            bank.up = high;
        } else {
            bank.down = high;
        }
        bank.writes += 1;
        if bank.up && bank.down {
            bank.overlaps += 1;
        }
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set(true);
        Ok(())
    }
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub buttons: ButtonLevels,
    pub power_w: f32,
    pub temperature_c: f32,
    /// Queue of scripted power readings; `power_w` is used once empty.
    pub power_script: VecDeque<f32>,
    pub drives: Vec<DrivingMode>,
    pub button_reads: u32,
    pub sensor_reads: u32,
    pub bank: Rc<RefCell<RelayBank>>,
    relays: MotorRelays<RecordingPin, RecordingPin>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        let bank = Rc::new(RefCell::new(RelayBank::default()));
        let relays = MotorRelays::new(
            RecordingPin {
                bank: bank.clone(),
                is_up: true,
            },
            RecordingPin {
                bank: bank.clone(),
                is_up: false,
            },
        );
        Self {
            buttons: ButtonLevels::RELEASED,
            power_w: 50.0,
            temperature_c: 0.0,
            power_script: VecDeque::new(),
            drives: Vec::new(),
            button_reads: 0,
            sensor_reads: 0,
            bank,
            relays,
        }
    }

    pub fn press(&mut self, up: bool, down: bool) {
        self.buttons = ButtonLevels::new(up, down);
    }

    pub fn release(&mut self) {
        self.buttons = ButtonLevels::RELEASED;
    }

    /// Relay levels as (up, down).
    pub fn relays(&self) -> (bool, bool) {
        let bank = self.bank.borrow();
        (bank.up, bank.down)
    }

    pub fn overlaps(&self) -> u32 {
        self.bank.borrow().overlaps
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonPort for MockHardware {
    fn read_buttons(&mut self) -> ButtonLevels {
        self.button_reads += 1;
        self.buttons
    }
}

impl SensorPort for MockHardware {
    fn power_w(&mut self) -> f32 {
        self.sensor_reads += 1;
        self.power_script.pop_front().unwrap_or(self.power_w)
    }

    fn temperature_c(&mut self) -> f32 {
        self.temperature_c
    }
}

impl MotorPort for MockHardware {
    fn drive(&mut self, mode: DrivingMode) {
        self.drives.push(mode);
        self.relays.drive(mode);
    }
}

// ── MockThing ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockThing {
    pub pending: Option<DriveCommand>,
    pub published: Vec<(Property, f32)>,
}

#[allow(dead_code)]
impl MockThing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest wins, like the real mailbox.
    pub fn post(&mut self, cmd: DriveCommand) {
        self.pending = Some(cmd);
    }

    pub fn published(&self, property: Property) -> Vec<f32> {
        self.published
            .iter()
            .filter(|(p, _)| *p == property)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl ThingPort for MockThing {
    fn publish(&mut self, property: Property, value: f32) {
        self.published.push((property, value));
    }

    fn read_command(&mut self) -> Option<DriveCommand> {
        self.pending.take()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stops(&self, reason: StopReason) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    AppEvent::ModeChanged {
                        reason: Some(r),
                        ..
                    } if *r == reason
                )
            })
            .count()
    }

    pub fn mode_changes(&self) -> Vec<(DrivingMode, DrivingMode)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ModeChanged { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
