//! Replaying adapter for the GPIO port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use super::{replay_result, Replayed, SharedReplayer};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::gpio::{GpioChip, GpioController, GpioError, GpioLine, InputLine, Level, OutputLine};

const PORT: &str = "gpio";

/// Replays a recorded GPIO session from a cassette.
///
/// Chips and lines handed out share the same replayer, so calls are served
/// in recorded order per method. A replay that runs past the end of the
/// cassette fails with a backend error instead of blocking.
pub struct ReplayingGpio {
    replayer: SharedReplayer,
}

impl ReplayingGpio {
    /// Creates a replaying controller from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Arc::new(Mutex::new(replayer)) }
    }
}

fn next<T: DeserializeOwned>(replayer: &SharedReplayer, method: &str) -> Result<T, GpioError> {
    match replay_result(replayer, PORT, method) {
        Ok(Replayed::Ok(value)) => Ok(value),
        Ok(Replayed::Err(msg)) => Err(GpioError::Backend(msg)),
        Err(e) => Err(GpioError::Backend(e.to_string())),
    }
}

impl GpioController for ReplayingGpio {
    fn open(&self, _path: &Path) -> Result<Box<dyn GpioChip>, GpioError> {
        next::<()>(&self.replayer, "open")?;
        Ok(Box::new(ReplayingChip { replayer: Arc::clone(&self.replayer) }))
    }
}

struct ReplayingChip {
    replayer: SharedReplayer,
}

impl GpioChip for ReplayingChip {
    fn get_line(&mut self, offset: u32) -> Result<Box<dyn GpioLine>, GpioError> {
        next::<()>(&self.replayer, "get_line")?;
        Ok(Box::new(ReplayingLine { offset, replayer: Arc::clone(&self.replayer) }))
    }
}

struct ReplayingLine {
    offset: u32,
    replayer: SharedReplayer,
}

impl GpioLine for ReplayingLine {
    fn offset(&self) -> u32 {
        self.offset
    }

    fn request_input(self: Box<Self>, _consumer: &str) -> Result<Box<dyn InputLine>, GpioError> {
        next::<()>(&self.replayer, "request_input")?;
        Ok(self)
    }

    fn request_output(
        self: Box<Self>,
        _consumer: &str,
        _initial: Level,
    ) -> Result<Box<dyn OutputLine>, GpioError> {
        next::<()>(&self.replayer, "request_output")?;
        Ok(self)
    }
}

impl InputLine for ReplayingLine {
    fn read_value(&self) -> Result<Level, GpioError> {
        next(&self.replayer, "read_value")
    }
}

impl OutputLine for ReplayingLine {
    fn set_value(&mut self, _value: Level) -> Result<(), GpioError> {
        next(&self.replayer, "set_value")
    }
}
