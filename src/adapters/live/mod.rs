//! Live adapters for real hardware.

pub mod gpio;

pub use gpio::LiveGpioController;
