//! Application context built once in the entry point and passed by reference.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::recording::{RecordingGpio, SharedRecorder};
use crate::adapters::replaying::ReplayingGpio;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::CassetteError;
use crate::console::Console;
use crate::ports::gpio::GpioController;

/// Bundles the shared console and the GPIO controller.
///
/// Constructors wire up different controller arrangements (plain,
/// replaying, recording).
pub struct AppContext {
    /// Output stream shared by every worker.
    pub console: Console,
    /// Controller the gate opens its chip through.
    pub gpio: Box<dyn GpioController>,
    /// Optional cassette recorder; flushed by [`AppContext::finish`] or on drop.
    recorder: Option<SharedRecorder>,
}

impl AppContext {
    /// Context over an arbitrary controller.
    #[must_use]
    pub fn new(console: Console, gpio: Box<dyn GpioController>) -> Self {
        Self { console, gpio, recorder: None }
    }

    /// Context that serves GPIO calls from the cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(console: Console, path: &Path) -> Result<Self, CassetteError> {
        let cassette = Cassette::load(path)?;
        log::info!("replaying {} ({} interactions)", path.display(), cassette.interactions.len());
        let gpio = ReplayingGpio::new(CassetteReplayer::new(&cassette));
        Ok(Self::new(console, Box::new(gpio)))
    }

    /// Context that records every GPIO call made through `inner` into a cassette at `path`.
    #[must_use]
    pub fn recording(
        console: Console,
        inner: Box<dyn GpioController>,
        path: &Path,
        chip: &Path,
    ) -> Self {
        let name = format!("gpio-hilos-{}", chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S"));
        let recorder =
            Arc::new(Mutex::new(CassetteRecorder::new(path, name, chip.display().to_string())));
        let gpio = RecordingGpio::new(inner, Arc::clone(&recorder));
        Self { console, gpio: Box::new(gpio), recorder: Some(recorder) }
    }

    /// Writes the cassette, if recording. Returns where it was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish(mut self) -> Result<Option<PathBuf>, CassetteError> {
        self.recorder.take().map(|recorder| write(&recorder)).transpose()
    }
}

fn write(recorder: &SharedRecorder) -> Result<PathBuf, CassetteError> {
    let guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.write().map(Path::to_path_buf)
}

impl Drop for AppContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            if let Err(e) = write(&recorder) {
                log::warn!("failed to write cassette: {e}");
            }
        }
    }
}
