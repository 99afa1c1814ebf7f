//! Hardware gate: claims the button and LED, waits for a press, signals completion.
//!
//! The gate moves through `WaitingForOpen -> WaitingForPress -> Done`.
//! [`Gate::open`] performs the first transition and hands back an
//! [`ArmedGate`] that owns every acquired handle. Handles are released when
//! the armed gate (or, on a failed open, whatever was acquired so far) is
//! dropped, so no path leaves a line claimed.

use std::fmt;
use std::thread;

use thiserror::Error;

use crate::config::GpioSettings;
use crate::ports::gpio::{GpioChip, GpioController, GpioError, InputLine, Level, OutputLine};

/// Where the gate is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Nothing acquired yet.
    WaitingForOpen,
    /// Lines claimed; sampling the button.
    WaitingForPress,
    /// The button was seen high.
    Done,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GateState::WaitingForOpen => "waiting-for-open",
            GateState::WaitingForPress => "waiting-for-press",
            GateState::Done => "done",
        })
    }
}

/// Fatal hardware failures. The message is the diagnostic shown to the user.
#[derive(Debug, Error)]
pub enum GateError {
    /// The chip could not be opened.
    #[error("No se pudo abrir el chip GPIO")]
    OpenChip(#[source] GpioError),
    /// The button line does not exist.
    #[error("No se pudo obtener la línea del botón")]
    ButtonLine(#[source] GpioError),
    /// The button line could not be claimed as an input.
    #[error("No se pudo configurar el botón como entrada")]
    ButtonInput(#[source] GpioError),
    /// The LED line does not exist.
    #[error("No se pudo obtener la línea del LED")]
    LedLine(#[source] GpioError),
    /// The LED line could not be claimed as an output.
    #[error("No se pudo configurar el LED como salida")]
    LedOutput(#[source] GpioError),
    /// Sampling the button failed after setup.
    #[error("No se pudo leer el botón")]
    ReadButton(#[source] GpioError),
    /// Driving the LED failed after setup.
    #[error("No se pudo encender el LED")]
    LightLed(#[source] GpioError),
}

/// A gate that has not touched the hardware yet.
pub struct Gate<'a> {
    controller: &'a dyn GpioController,
    settings: &'a GpioSettings,
}

impl<'a> Gate<'a> {
    /// Prepares a gate over `controller` using the wiring in `settings`.
    #[must_use]
    pub fn new(controller: &'a dyn GpioController, settings: &'a GpioSettings) -> Self {
        Self { controller, settings }
    }

    /// Opens the chip, claims the button as input and the LED as output (low).
    ///
    /// Stops at the first failure without touching the remaining lines.
    ///
    /// # Errors
    ///
    /// Returns the [`GateError`] naming the step that failed.
    pub fn open(self) -> Result<ArmedGate, GateError> {
        let settings = self.settings;
        log::debug!("gate {}: opening {}", GateState::WaitingForOpen, settings.chip.display());

        let mut chip = self.controller.open(&settings.chip).map_err(GateError::OpenChip)?;
        let button = chip
            .get_line(settings.button)
            .map_err(GateError::ButtonLine)?
            .request_input(&settings.consumer)
            .map_err(GateError::ButtonInput)?;
        let led = chip
            .get_line(settings.led)
            .map_err(GateError::LedLine)?
            .request_output(&settings.consumer, Level::Low)
            .map_err(GateError::LedOutput)?;

        log::debug!(
            "gate {}: button={} led={} consumer={}",
            GateState::WaitingForPress,
            settings.button,
            settings.led,
            settings.consumer
        );
        Ok(ArmedGate {
            button,
            led,
            _chip: chip,
            settings: settings.clone(),
            state: GateState::WaitingForPress,
            led_lit: false,
        })
    }
}

/// A gate holding both lines. Dropping it releases the lines, then the chip.
pub struct ArmedGate {
    // Field order is drop order.
    button: Box<dyn InputLine>,
    led: Box<dyn OutputLine>,
    _chip: Box<dyn GpioChip>,
    settings: GpioSettings,
    state: GateState,
    led_lit: bool,
}

impl ArmedGate {
    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Samples the button every poll interval until it reads high.
    ///
    /// Blocks for as long as the button stays low; there is no timeout.
    /// Returns how many samples were taken.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::ReadButton`] if a sample fails.
    pub fn wait_for_press(&mut self) -> Result<u64, GateError> {
        let mut polls = 0_u64;
        if self.state == GateState::Done {
            return Ok(polls);
        }
        loop {
            polls += 1;
            if self.button.read_value().map_err(GateError::ReadButton)?.is_high() {
                break;
            }
            thread::sleep(self.settings.poll_interval);
        }
        self.state = GateState::Done;
        log::debug!("gate {}: button {} high after {polls} polls", self.state, self.settings.button);
        Ok(polls)
    }

    /// Drives the LED high. Only the first call touches the line.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::LightLed`] if the write fails.
    pub fn light_led(&mut self) -> Result<(), GateError> {
        if self.led_lit {
            return Ok(());
        }
        self.led.set_value(Level::High).map_err(GateError::LightLed)?;
        self.led_lit = true;
        log::debug!("gate {}: led {} high", self.state, self.settings.led);
        Ok(())
    }

    /// Releases both lines and closes the chip.
    pub fn release(self) {
        log::debug!("releasing lines {} and {}", self.settings.button, self.settings.led);
        drop(self);
    }
}
