//! End-to-end behaviour of `ShutterService` against mock adapters.

use rollershutter::app::commands::DriveCommand;
use rollershutter::app::events::AppEvent;
use rollershutter::app::ports::Property;
use rollershutter::app::service::{PollReport, ShutterService};
use rollershutter::config::ShutterConfig;
use rollershutter::control::state::{DrivingMode, StopReason};

use crate::mock_hw::{MockHardware, MockThing, RecordingSink};

struct Rig {
    service: ShutterService,
    hw: MockHardware,
    thing: MockThing,
    sink: RecordingSink,
}

impl Rig {
    fn new(start_ms: u32) -> Self {
        Self::with_config(start_ms, &ShutterConfig::default())
    }

    fn with_config(start_ms: u32, config: &ShutterConfig) -> Self {
        let mut rig = Self {
            service: ShutterService::new(config),
            hw: MockHardware::new(),
            thing: MockThing::new(),
            sink: RecordingSink::new(),
        };
        rig.service
            .start(start_ms, &mut rig.hw, &mut rig.thing, &mut rig.sink);
        rig
    }

    fn poll(&mut self, now_ms: u32) -> PollReport {
        self.service
            .poll(now_ms, &mut self.hw, &mut self.thing, &mut self.sink)
    }

    /// Poll every `step` ms from `from` (exclusive) to `to` (inclusive).
    fn run(&mut self, from: u32, to: u32, step: u32) {
        let mut t = from;
        while t < to {
            t += step;
            self.poll(t);
        }
    }

    fn command(&mut self, cmd: DriveCommand, now_ms: u32) -> PollReport {
        self.thing.post(cmd);
        self.poll(now_ms)
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_forces_stop_and_publishes_zero_baselines() {
    let rig = Rig::new(0);
    assert_eq!(rig.hw.drives, vec![DrivingMode::Stop]);
    assert_eq!(rig.hw.relays(), (false, false));
    assert_eq!(
        rig.thing.published,
        vec![(Property::Power, 0.0), (Property::Temperature, 0.0)]
    );
    assert!(matches!(rig.sink.events[0], AppEvent::Started { .. }));
}

// ── Button rules ──────────────────────────────────────────────

#[test]
fn up_button_starts_from_stop() {
    let mut rig = Rig::new(0);
    rig.hw.press(true, false);
    rig.poll(499);
    assert_eq!(rig.service.mode(), DrivingMode::Stop, "sample not due yet");
    rig.poll(500);
    assert_eq!(rig.service.mode(), DrivingMode::Up);
    assert_eq!(rig.hw.relays(), (true, false));
    assert_eq!(rig.service.state().session_started_ms(), Some(500));
}

#[test]
fn both_buttons_force_stop() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Down, 10);
    assert_eq!(rig.service.mode(), DrivingMode::Down);

    rig.hw.press(true, true);
    rig.poll(500);
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
    assert_eq!(
        rig.service.state().last_stop(),
        Some(StopReason::AmbiguousInput)
    );

    // Still both held on the next sample: stays stopped.
    rig.poll(1_000);
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
}

#[test]
fn button_never_reverses_directly() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Up, 10);

    rig.hw.press(false, true);
    rig.poll(500);
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
    assert_eq!(rig.service.state().last_stop(), Some(StopReason::Button));

    rig.poll(1_000);
    assert_eq!(rig.service.mode(), DrivingMode::Down);

    assert_eq!(
        rig.sink.mode_changes(),
        vec![
            (DrivingMode::Stop, DrivingMode::Up),
            (DrivingMode::Up, DrivingMode::Stop),
            (DrivingMode::Stop, DrivingMode::Down),
        ]
    );
    assert_eq!(rig.hw.overlaps(), 0);
}

#[test]
fn released_buttons_keep_commanded_drive() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Up, 10);
    rig.run(10, 10_010, 100);
    assert_eq!(rig.service.mode(), DrivingMode::Up);
    assert!(rig.hw.button_reads >= 20);
}

#[test]
fn buttons_are_sampled_once_per_interval() {
    let mut rig = Rig::new(0);
    rig.run(0, 5_000, 10);
    assert_eq!(rig.hw.button_reads, 10);
    assert_eq!(rig.hw.sensor_reads, 2);
}

// ── External commands ─────────────────────────────────────────

#[test]
fn stop_command_is_idempotent() {
    let mut rig = Rig::new(0);
    let before = rig.hw.drives.len();
    rig.command(DriveCommand::Stop, 10);
    rig.command(DriveCommand::Stop, 20);
    assert_eq!(rig.hw.drives.len(), before, "no relay writes while stopped");
    assert!(rig.sink.mode_changes().is_empty());
    assert_eq!(rig.service.state().last_stop(), None);
}

#[test]
fn repeated_up_command_writes_relays_once() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Up, 10);
    rig.command(DriveCommand::Up, 20);
    rig.command(DriveCommand::Up, 30);
    assert_eq!(rig.hw.drives, vec![DrivingMode::Stop, DrivingMode::Up]);
    assert_eq!(rig.service.state().session_started_ms(), Some(10));
}

#[test]
fn opposite_command_stops_before_reversing() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Up, 10);
    rig.command(DriveCommand::Down, 20);
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
    assert_eq!(rig.hw.relays(), (false, false));
    assert_eq!(rig.service.state().last_stop(), Some(StopReason::Command));
    assert!(!rig.service.state().session_active());

    // A second command after STOP starts the reverse drive.
    rig.command(DriveCommand::Down, 30);
    assert_eq!(rig.service.mode(), DrivingMode::Down);
    assert_eq!(rig.hw.relays(), (false, true));
    assert_eq!(rig.hw.overlaps(), 0);

    let changes = rig.sink.mode_changes();
    assert_eq!(
        changes,
        vec![
            (DrivingMode::Stop, DrivingMode::Up),
            (DrivingMode::Up, DrivingMode::Stop),
            (DrivingMode::Stop, DrivingMode::Down),
        ]
    );
    assert!(!changes
        .iter()
        .any(|&(from, to)| from.is_driving() && to.is_driving()));
}

#[test]
fn stop_command_and_opposite_button_on_one_poll_only_stop() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Up, 10);

    rig.hw.press(false, true);
    rig.command(DriveCommand::Stop, 500);
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
    assert_eq!(rig.hw.relays(), (false, false));
    assert_eq!(
        rig.sink.mode_changes(),
        vec![
            (DrivingMode::Stop, DrivingMode::Up),
            (DrivingMode::Up, DrivingMode::Stop),
        ]
    );
}

// ── Travel ceiling ────────────────────────────────────────────

#[test]
fn travel_ceiling_stops_exactly_once() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Up, 0);

    rig.run(0, 119_900, 100);
    assert_eq!(rig.service.mode(), DrivingMode::Up);

    let report = rig.poll(120_000);
    assert!(report.travel_timeout);
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
    assert!(!rig.service.state().session_active());

    rig.run(120_000, 130_000, 100);
    assert_eq!(rig.sink.stops(StopReason::TravelTimeout), 1);
    assert_eq!(rig.hw.relays(), (false, false));
}

#[test]
fn new_drive_restarts_the_ceiling() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Up, 0);
    rig.command(DriveCommand::Stop, 60_000);
    rig.command(DriveCommand::Down, 70_000);
    rig.run(70_000, 189_900, 100);
    assert_eq!(rig.service.mode(), DrivingMode::Down);
    rig.poll(190_000);
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
}

// ── Stall detection ───────────────────────────────────────────

#[test]
fn low_power_while_driving_is_a_stall() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Down, 10);
    rig.hw.power_w = 3.0;

    let report = rig.poll(2_000);
    assert!(report.stalled);
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
    assert!(!rig.service.state().session_active());
    assert_eq!(rig.service.state().last_stop(), Some(StopReason::Stall));
    assert_eq!(rig.sink.stops(StopReason::Stall), 1);
}

#[test]
fn ceiling_and_low_power_on_one_poll_report_the_timeout() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Up, 0);
    rig.run(0, 119_900, 100);
    assert_eq!(rig.service.mode(), DrivingMode::Up);

    rig.hw.power_w = 3.0;
    let report = rig.poll(120_000);
    assert!(report.travel_timeout);
    assert!(report.sensors_read);
    assert!(!report.stalled);
    assert_eq!(
        rig.service.state().last_stop(),
        Some(StopReason::TravelTimeout)
    );
    assert_eq!(rig.sink.stops(StopReason::TravelTimeout), 1);
    assert_eq!(rig.sink.stops(StopReason::Stall), 0);
}

#[test]
fn power_at_threshold_is_not_a_stall() {
    let mut rig = Rig::new(0);
    rig.command(DriveCommand::Up, 10);
    rig.hw.power_w = 10.0;
    rig.poll(2_000);
    assert_eq!(rig.service.mode(), DrivingMode::Up);
}

#[test]
fn drive_started_on_a_sensor_tick_is_not_judged_until_next_tick() {
    let mut rig = Rig::new(0);
    rig.hw.power_w = 0.0;

    let report = rig.command(DriveCommand::Up, 2_000);
    assert!(report.sensors_read);
    assert!(!report.stalled);
    assert_eq!(rig.service.mode(), DrivingMode::Up);

    rig.poll(4_000);
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
}

#[test]
fn stall_grace_defers_the_check() {
    let config = ShutterConfig {
        stall_grace_ms: 3_000,
        ..ShutterConfig::default()
    };
    let mut rig = Rig::with_config(0, &config);
    rig.command(DriveCommand::Up, 10);
    rig.hw.power_w = 0.0;

    rig.poll(2_000);
    assert_eq!(rig.service.mode(), DrivingMode::Up, "inside grace");
    rig.poll(4_000);
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
}

#[test]
fn stall_while_stopped_does_nothing() {
    let mut rig = Rig::new(0);
    rig.hw.power_w = 0.0;
    rig.run(0, 10_000, 100);
    assert!(rig.sink.mode_changes().is_empty());
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn power_is_republished_only_on_significant_change() {
    let mut rig = Rig::new(0);
    rig.hw.power_script.extend([0.0, 1.0, 3.0, 3.5, 6.0]);
    rig.run(0, 10_000, 50);

    assert_eq!(rig.thing.published(Property::Power), vec![0.0, 3.0, 6.0]);
    assert_eq!(rig.service.published_power_w(), 6.0);
    let publishes = rig
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::PropertyPublished { .. }))
        .count();
    assert_eq!(publishes, 2);
}

#[test]
fn temperature_uses_its_own_threshold() {
    let mut rig = Rig::new(0);
    rig.hw.power_w = 0.0;
    rig.hw.temperature_c = 19.9;
    rig.poll(2_000);
    assert_eq!(rig.thing.published(Property::Temperature), vec![0.0]);

    rig.hw.temperature_c = 20.0;
    rig.poll(4_000);
    assert_eq!(rig.thing.published(Property::Temperature), vec![0.0, 20.0]);
    assert_eq!(rig.service.published_temperature_c(), 20.0);
}

// ── Clock wraparound ──────────────────────────────────────────

#[test]
fn ceiling_and_gates_survive_clock_wrap() {
    let start = u32::MAX - 50_000;
    let mut rig = Rig::new(start);
    rig.command(DriveCommand::Up, start);

    let mut t = start;
    for _ in 0..1_199 {
        t = t.wrapping_add(100);
        rig.poll(t);
    }
    assert_eq!(rig.service.mode(), DrivingMode::Up);
    // Button and sensor gates kept firing across the wrap.
    assert!(rig.hw.button_reads >= 239);
    assert!(rig.hw.sensor_reads >= 59);

    rig.poll(start.wrapping_add(120_000));
    assert_eq!(rig.service.mode(), DrivingMode::Stop);
    assert_eq!(rig.sink.stops(StopReason::TravelTimeout), 1);
}

#[test]
fn backwards_clock_counts_as_elapsed() {
    let mut rig = Rig::new(10_000);
    rig.hw.press(true, false);
    // Delta is negative: the sample gate fires instead of stalling.
    rig.poll(5_000);
    assert_eq!(rig.hw.button_reads, 1);
    assert_eq!(rig.service.mode(), DrivingMode::Up);
}
