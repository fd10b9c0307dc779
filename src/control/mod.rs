//! Actuator control core: shared state, drive arbitration, telemetry
//! decimation.  Pure logic, no I/O beyond the port traits.

pub mod arbiter;
pub mod state;
pub mod telemetry;
