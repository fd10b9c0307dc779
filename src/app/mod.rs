//! Application core: pure domain logic, zero I/O.
//!
//! This module wires the roller shutter control rules together: drive
//! arbitration, stall detection and telemetry decimation.  All
//! interaction with hardware and the smart-home protocol happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
