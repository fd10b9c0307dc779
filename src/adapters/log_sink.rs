//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::state::StopReason;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                power_w,
                temperature_c,
            } => {
                info!(
                    "START | power={:.1}W | T={:.1}\u{00b0}C",
                    power_w, temperature_c
                );
            }
            AppEvent::CommandReceived(cmd) => {
                info!("CMD   | {}", cmd.action_name());
            }
            AppEvent::ModeChanged {
                from,
                to,
                reason: Some(reason @ (StopReason::TravelTimeout | StopReason::Stall)),
            } => {
                warn!("STOP  | {} -> {} | reason={}", from, to, reason);
            }
            AppEvent::ModeChanged { from, to, reason } => match reason {
                Some(reason) => info!("MODE  | {} -> {} | reason={}", from, to, reason),
                None => info!("MODE  | {} -> {}", from, to),
            },
            AppEvent::PropertyPublished { property, value } => {
                info!("PUBLISH | {}={:.1}", property.name(), value);
            }
        }
    }
}
