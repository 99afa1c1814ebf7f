//! GPIO port for acquiring and driving digital lines.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Logical value of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Logical zero.
    Low,
    /// Logical one.
    High,
}

impl Level {
    /// Returns `true` for [`Level::High`].
    #[must_use]
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// Maps a raw line value (`0` or non-zero) to a level.
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        if raw == 0 {
            Level::Low
        } else {
            Level::High
        }
    }

    /// The raw value a character device expects.
    #[must_use]
    pub fn as_raw(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Low => "low",
            Level::High => "high",
        })
    }
}

/// Errors raised by a GPIO backend.
#[derive(Debug, Error)]
pub enum GpioError {
    /// The chip device could not be opened.
    #[error("chip {} is not available", .0.display())]
    ChipUnavailable(PathBuf),
    /// The chip has no line at the requested offset.
    #[error("line {0} does not exist on this chip")]
    NoSuchLine(u32),
    /// The line exists but could not be claimed in the requested direction.
    #[error("line {0} could not be requested")]
    RequestRejected(u32),
    /// Any other backend failure, carried as text.
    #[error("{0}")]
    Backend(String),
}

/// Opens GPIO chips.
///
/// Abstracting the controller lets the gate run against real hardware,
/// an in-memory bench, or a recorded cassette.
pub trait GpioController: Send + Sync {
    /// Opens the chip at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the chip device cannot be opened.
    fn open(&self, path: &Path) -> Result<Box<dyn GpioChip>, GpioError>;
}

/// An open chip. Dropping it closes the chip.
pub trait GpioChip: Send {
    /// Looks up the line at `offset` without claiming it.
    ///
    /// # Errors
    ///
    /// Returns an error if the chip has no such line.
    fn get_line(&mut self, offset: u32) -> Result<Box<dyn GpioLine>, GpioError>;
}

/// An unclaimed line.
pub trait GpioLine: Send {
    /// Offset of this line on its chip.
    fn offset(&self) -> u32;

    /// Claims the line as a digital input under `consumer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be configured as an input.
    fn request_input(self: Box<Self>, consumer: &str) -> Result<Box<dyn InputLine>, GpioError>;

    /// Claims the line as a digital output driven to `initial`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be configured as an output.
    fn request_output(
        self: Box<Self>,
        consumer: &str,
        initial: Level,
    ) -> Result<Box<dyn OutputLine>, GpioError>;
}

/// A claimed input line. Dropping it releases the line.
pub trait InputLine: Send {
    /// Reads the current level.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot sample the line.
    fn read_value(&self) -> Result<Level, GpioError>;
}

/// A claimed output line. Dropping it releases the line.
pub trait OutputLine: Send {
    /// Drives the line to `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set_value(&mut self, value: Level) -> Result<(), GpioError>;
}
