//! Port traits defining external boundaries.
//!
//! The only boundary between the program and the outside world that needs
//! swapping is the GPIO chip. Implementations live in `src/adapters/`.

pub mod gpio;

pub use gpio::{GpioChip, GpioController, GpioError, GpioLine, InputLine, Level, OutputLine};
