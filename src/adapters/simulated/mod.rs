//! Simulated adapters for running without hardware.

pub mod gpio;

pub use gpio::{EventLog, GpioEvent, Scenario, SimulatedGpio};
