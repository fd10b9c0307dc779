//! Telemetry publisher: hysteresis-filtered republishing of power and
//! temperature.
//!
//! Each quantity keeps the value it last *published*.  A new raw reading
//! is published only when it differs from that baseline by at least the
//! quantity's threshold; the baseline then moves to the new reading.
//! Comparing against the last published value (not the last raw one)
//! means a slow drift is still reported once it has accumulated.
//!
//! Non-finite readings never pass the filter.

use crate::app::ports::{Property, ThingPort};

/// Change filter for one quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hysteresis {
    threshold: f32,
    published: f32,
}

impl Hysteresis {
    /// Baseline starts at `initial` (0.0 at boot).
    pub fn new(threshold: f32, initial: f32) -> Self {
        Self {
            threshold,
            published: initial,
        }
    }

    /// Returns `Some(raw)` and moves the baseline when `raw` is far
    /// enough from the last published value.
    pub fn update(&mut self, raw: f32) -> Option<f32> {
        // NaN compares false, so garbage readings are dropped here.
        if (raw - self.published).abs() >= self.threshold {
            self.published = raw;
            Some(raw)
        } else {
            None
        }
    }

    pub fn published(&self) -> f32 {
        self.published
    }
}

/// Values that changed on this sensor tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Published {
    pub power_w: Option<f32>,
    pub temperature_c: Option<f32>,
}

/// Publishes power and temperature through the [`ThingPort`].
#[derive(Debug, Clone)]
pub struct TelemetryPublisher {
    power: Hysteresis,
    temperature: Hysteresis,
}

impl TelemetryPublisher {
    pub fn new(power_threshold_w: f32, temperature_threshold_c: f32) -> Self {
        Self {
            power: Hysteresis::new(power_threshold_w, 0.0),
            temperature: Hysteresis::new(temperature_threshold_c, 0.0),
        }
    }

    /// Push the boot baselines so the properties exist before the first
    /// sensor tick.
    pub fn publish_baselines(&self, thing: &mut impl ThingPort) {
        thing.publish(Property::Power, self.power.published());
        thing.publish(Property::Temperature, self.temperature.published());
    }

    /// Filter one pair of readings and publish what changed.
    pub fn observe(
        &mut self,
        power_w: f32,
        temperature_c: f32,
        thing: &mut impl ThingPort,
    ) -> Published {
        let mut out = Published::default();

        if let Some(p) = self.power.update(power_w) {
            thing.publish(Property::Power, p);
            out.power_w = Some(p);
        }

        if let Some(t) = self.temperature.update(temperature_c) {
            thing.publish(Property::Temperature, t);
            out.temperature_c = Some(t);
        }

        out
    }

    pub fn last_power_w(&self) -> f32 {
        self.power.published()
    }

    pub fn last_temperature_c(&self) -> f32 {
        self.temperature.published()
    }
}
