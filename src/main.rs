//! Roller shutter firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        ThingAdapter   LogEventSink  NvsAdapter│
//! │  (Button+Sensor+Motor)  (ThingPort)    (EventSink)   (Config)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ShutterService (pure logic)                 │    │
//! │  │  Drive Arbiter · Stall Monitor · Telemetry Publisher   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Interval gates (500 ms buttons, 2 s sensors) · Watchdog       │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use rollershutter::adapters::device_id;
use rollershutter::adapters::hardware::HardwareAdapter;
use rollershutter::adapters::log_sink::LogEventSink;
use rollershutter::adapters::nvs::{self, NvsAdapter};
use rollershutter::adapters::thing::ThingAdapter;
use rollershutter::adapters::time::Esp32TimeAdapter;
use rollershutter::app::commands::CommandMailbox;
use rollershutter::app::service::ShutterService;
use rollershutter::config::ShutterConfig;
use rollershutter::drivers::button::ButtonPair;
use rollershutter::drivers::hw_init::{self, GpioInput, GpioOutput};
use rollershutter::drivers::relay::MotorRelays;
use rollershutter::drivers::watchdog::{self, Watchdog};
use rollershutter::pins;
use rollershutter::sensors::SensorHub;
use rollershutter::sensors::power::{Ade7953, PowerMeter};
use rollershutter::sensors::temperature::NtcThermistor;

/// Shared with the protocol layer, which posts actions into it.
static DRIVE_COMMANDS: CommandMailbox = CommandMailbox::new();

/// Loop period.  Well below the 500 ms sample interval.
const LOOP_PERIOD_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Roller shutter v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Relays low, buttons, ADC ───────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}", e);
        return Err(rollershutter::error::Error::from(e).into());
    }
    let watchdog = Watchdog::new(watchdog::DEFAULT_TIMEOUT_MS);

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new() {
        Ok(store) => nvs::load_or_default(&store),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            ShutterConfig::default()
        }
    };

    // ── 4. Energy meter on I²C ────────────────────────────────
    let peripherals = Peripherals::take()?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio12,
        peripherals.pins.gpio14,
        &I2cConfig::new().baudrate(Hertz(pins::METER_I2C_HZ)),
    )?;
    let mut meter = Ade7953::new(i2c);
    if let Err(e) = meter.init() {
        // Readings stay at 0 W, which the stall check treats as "no load".
        error!("ADE7953 init failed: {}", e);
    }

    // ── 5. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(
        MotorRelays::new(
            GpioOutput::new(pins::UP_RELAY_GPIO),
            GpioOutput::new(pins::DOWN_RELAY_GPIO),
        ),
        ButtonPair::new(
            GpioInput::new(pins::UP_BUTTON_GPIO),
            GpioInput::new(pins::DOWN_BUTTON_GPIO),
            config.buttons_active_low,
        ),
        SensorHub::new(
            PowerMeter::new(meter),
            NtcThermistor::new(pins::NTC_ADC_CHANNEL),
        ),
    );

    let mac = device_id::read_mac();
    let dev_id = device_id::device_id(&mac);
    let title = device_id::thing_title(&config.device_name);
    info!(
        "Device ID: {} (hostname: {})",
        dev_id,
        device_id::hostname(&config.device_name)
    );

    let mut thing = ThingAdapter::new(&DRIVE_COMMANDS, &dev_id, title);
    info!("Thing '{}' ready", thing.title());
    let mut log_sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();

    // ── 6. Control loop ───────────────────────────────────────
    let mut service = ShutterService::new(&config);
    service.start(clock.uptime_ms(), &mut hw, &mut thing, &mut log_sink);

    info!("System ready. Entering control loop.");

    loop {
        service.poll(clock.uptime_ms(), &mut hw, &mut thing, &mut log_sink);
        watchdog.feed();
        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}
