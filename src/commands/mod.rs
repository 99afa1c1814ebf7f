//! Command dispatch and handlers.

pub mod bench;
pub mod run;

use std::env;
use std::path::Path;

use crate::adapters::live::LiveGpioController;
use crate::adapters::simulated::SimulatedGpio;
use crate::cli::Command;
use crate::config::{Settings, WorkloadSettings, RECORD_ENV, REPLAY_ENV};
use crate::console::Console;
use crate::context::AppContext;
use crate::error::Error;
use crate::ports::gpio::GpioController;

/// Dispatch a parsed command to its handler.
///
/// When `GPIO_HILOS_REPLAY` names a cassette, GPIO calls are served from it.
/// Otherwise, when `GPIO_HILOS_RECORD` names a path, every GPIO call is
/// recorded into a cassette written there once the command ends.
/// Consecutive identical calls share one entry, but a session that never
/// ends (a button that is never pressed) is never written: the cassette
/// only lands on disk when `run` returns.
///
/// # Errors
///
/// Returns an error if the selected command handler fails.
pub fn dispatch(command: Command) -> Result<(), Error> {
    match command {
        Command::Run(args) => {
            let settings = Settings::from(&args);
            let ctx = context_for(&settings)?;

            let result = run::run_with_context(&ctx, &settings).map(|_| ());

            // Flush the cassette even when the run failed; the run's own
            // diagnostic wins over a failed write.
            match ctx.finish() {
                Ok(Some(path)) => log::info!("recording saved to: {}", path.display()),
                Ok(None) => {}
                Err(e) if result.is_err() => log::warn!("failed to write cassette: {e}"),
                Err(e) => return Err(e.into()),
            }
            result.map_err(Error::from)
        }
        Command::Bench(args) => {
            bench::run(&Console::stdout(), &WorkloadSettings::from(&args));
            Ok(())
        }
    }
}

/// Build the context for `run` from settings and the record/replay variables.
fn context_for(settings: &Settings) -> Result<AppContext, Error> {
    if let Some(path) = env::var_os(REPLAY_ENV) {
        return Ok(AppContext::replaying(Console::stdout(), Path::new(&path))?);
    }

    let gpio: Box<dyn GpioController> = match settings.simulate {
        Some(scenario) => {
            log::info!("using simulated GPIO bench ({scenario:?})");
            Box::new(SimulatedGpio::new(scenario))
        }
        None => Box::new(LiveGpioController),
    };

    Ok(match env::var_os(RECORD_ENV) {
        Some(path) => {
            AppContext::recording(Console::stdout(), gpio, Path::new(&path), &settings.gpio.chip)
        }
        None => AppContext::new(Console::stdout(), gpio),
    })
}
