//! Protocol-facing flow: actions through `ThingAdapter`, published
//! properties back out, with the control core in between.

use rollershutter::adapters::thing::ThingAdapter;
use rollershutter::app::commands::{CommandMailbox, DriveCommand};
use rollershutter::app::ports::Property;
use rollershutter::app::service::ShutterService;
use rollershutter::config::ShutterConfig;
use rollershutter::control::state::DrivingMode;

use crate::mock_hw::{MockHardware, RecordingSink};

static MAILBOX: CommandMailbox = CommandMailbox::new();

#[test]
fn actions_drive_the_shutter_and_properties_follow() {
    let mut thing = ThingAdapter::new(&MAILBOX, "RS-EFCAFE", "Roller Shutter");
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut service = ShutterService::new(&ShutterConfig::default());
    service.start(0, &mut hw, &mut thing, &mut sink);

    assert_eq!(thing.invoke_action("down"), Ok(DriveCommand::Down));
    service.poll(10, &mut hw, &mut thing, &mut sink);
    assert_eq!(service.mode(), DrivingMode::Down);
    assert!(!MAILBOX.is_pending());

    // Latest action wins when two arrive between polls.
    thing.invoke_action("up").unwrap();
    thing.invoke_action("stop").unwrap();
    service.poll(20, &mut hw, &mut thing, &mut sink);
    assert_eq!(service.mode(), DrivingMode::Stop);

    assert!(thing.invoke_action("open").is_err());
    service.poll(30, &mut hw, &mut thing, &mut sink);
    assert_eq!(service.mode(), DrivingMode::Stop);

    hw.power_w = 42.0;
    service.poll(2_000, &mut hw, &mut thing, &mut sink);
    assert_eq!(thing.property_value(Property::Power), 42.0);
    assert_eq!(
        thing.properties_json().unwrap(),
        r#"{"power":42.0,"temperature":0.0}"#
    );
    assert_eq!(hw.overlaps(), 0);
}
