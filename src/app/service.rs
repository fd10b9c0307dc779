//! Application service: the hexagonal core.
//!
//! [`ShutterService`] owns the actuator state, the drive arbiter, the
//! stall monitor and the telemetry publisher.  It exposes one entry
//! point, [`poll`](ShutterService::poll), that the main loop calls on
//! every scheduler tick with the current monotonic time.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  ButtonPort ──▶ ┌──────────────────────────────┐ ──▶ MotorPort
//!  SensorPort ──▶ │        ShutterService        │ ──▶ EventSink
//!   ThingPort ◀─▶ │ Arbiter · Stall · Telemetry  │
//!                 └──────────────────────────────┘
//! ```
//!
//! ## Poll order
//!
//! 1. External command (mailbox) → `ActuatorState`
//! 2. Sample interval due → button rules
//! 3. Travel ceiling (every poll)
//! 4. Sensor interval due → stall check, then telemetry
//! 5. Output mapping (only when the mode changed)

use log::info;

use crate::config::ShutterConfig;
use crate::control::arbiter::{ButtonDecision, DriveArbiter};
use crate::control::state::{ActuatorState, DrivingMode, StopReason};
use crate::control::telemetry::TelemetryPublisher;
use crate::safety::{StallCheck, StallMonitor};
use crate::scheduler::Interval;

use super::commands::DriveCommand;
use super::events::AppEvent;
use super::ports::{ButtonPort, EventSink, MotorPort, Property, SensorPort, ThingPort};

/// What happened during one poll (useful to the caller and to tests).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PollReport {
    pub command: Option<DriveCommand>,
    pub sampled: Option<ButtonDecision>,
    pub travel_timeout: bool,
    pub sensors_read: bool,
    pub stalled: bool,
    pub mode_changed: bool,
}

/// The application service orchestrates all domain logic.
pub struct ShutterService {
    state: ActuatorState,
    arbiter: DriveArbiter,
    stall: StallMonitor,
    telemetry: TelemetryPublisher,
    sample_gate: Interval,
    sensor_gate: Interval,
    poll_count: u64,
}

impl ShutterService {
    /// Construct the service from configuration.
    ///
    /// Does **not** publish anything; call [`start`](Self::start) next.
    pub fn new(config: &ShutterConfig) -> Self {
        Self {
            state: ActuatorState::new(),
            arbiter: DriveArbiter::new(config.max_travel_ms),
            stall: StallMonitor::new(config),
            telemetry: TelemetryPublisher::new(
                config.power_hysteresis_w,
                config.temperature_hysteresis_c,
            ),
            sample_gate: Interval::new(config.sample_interval_ms, 0),
            sensor_gate: Interval::new(config.sensor_interval_ms, 0),
            poll_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force the relays off, publish the boot baselines and arm both
    /// timing domains relative to `now_ms`.
    pub fn start(
        &mut self,
        now_ms: u32,
        motor: &mut impl MotorPort,
        thing: &mut impl ThingPort,
        sink: &mut impl EventSink,
    ) {
        motor.drive(DrivingMode::Stop);
        self.sample_gate.reset(now_ms);
        self.sensor_gate.reset(now_ms);
        self.telemetry.publish_baselines(thing);
        sink.emit(&AppEvent::Started {
            power_w: self.telemetry.last_power_w(),
            temperature_c: self.telemetry.last_temperature_c(),
        });
        info!(
            "ShutterService started (relays off, sample {} ms, sensors {} ms, ceiling {} ms, stall < {:.1} W)",
            self.sample_gate.period_ms(),
            self.sensor_gate.period_ms(),
            self.arbiter.max_travel_ms(),
            self.stall.threshold_w()
        );
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run one control-loop iteration.  Never blocks, never fails.
    ///
    /// The `hw` parameter satisfies all three hardware ports; this
    /// avoids a double mutable borrow while keeping the port boundary
    /// explicit.
    pub fn poll(
        &mut self,
        now_ms: u32,
        hw: &mut (impl ButtonPort + SensorPort + MotorPort),
        thing: &mut impl ThingPort,
        sink: &mut impl EventSink,
    ) -> PollReport {
        self.poll_count += 1;
        let mut report = PollReport::default();

        // 1. External command
        if let Some(cmd) = thing.read_command() {
            let current = self.state.motion();
            match cmd {
                DriveCommand::Stop => self.state.stop(StopReason::Command),
                // Same rule as the opposite button: no reversal under load.
                other if current.is_driving() && current != other.mode() => {
                    self.state.stop(StopReason::Command)
                }
                other => self.state.set_mode(other.mode()),
            }
            sink.emit(&AppEvent::CommandReceived(cmd));
            report.command = Some(cmd);
        }

        // 2. Button sampling
        if self.sample_gate.due(now_ms) {
            let buttons = hw.read_buttons();
            report.sampled = Some(self.arbiter.sample(&mut self.state, buttons));
        }

        // 3. Travel ceiling
        report.travel_timeout = self.arbiter.check_travel_timeout(&mut self.state, now_ms);

        // 4. Stall detection + telemetry
        if self.sensor_gate.due(now_ms) {
            let power_w = hw.power_w();
            let temperature_c = hw.temperature_c();
            report.sensors_read = true;

            report.stalled =
                self.stall.check(&mut self.state, power_w, now_ms) == StallCheck::Stalled;

            let published = self.telemetry.observe(power_w, temperature_c, thing);
            if let Some(value) = published.power_w {
                sink.emit(&AppEvent::PropertyPublished {
                    property: Property::Power,
                    value,
                });
            }
            if let Some(value) = published.temperature_c {
                sink.emit(&AppEvent::PropertyPublished {
                    property: Property::Temperature,
                    value,
                });
            }
        }

        // 5. Output mapping
        if let Some(t) = self.state.apply(now_ms) {
            hw.drive(t.to);
            sink.emit(&AppEvent::ModeChanged {
                from: t.from,
                to: t.to,
                reason: t.reason,
            });
            report.mode_changed = true;
        }

        report
    }

    // ── Queries ───────────────────────────────────────────────

    /// Mode currently applied to the relays.
    pub fn mode(&self) -> DrivingMode {
        self.state.applied()
    }

    /// Read-only view of the actuator state.
    pub fn state(&self) -> &ActuatorState {
        &self.state
    }

    /// Total polls executed since construction.
    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    /// Last published power value (W).
    pub fn published_power_w(&self) -> f32 {
        self.telemetry.last_power_w()
    }

    /// Last published temperature value (°C).
    pub fn published_temperature_c(&self) -> f32 {
        self.telemetry.last_temperature_c()
    }
}
