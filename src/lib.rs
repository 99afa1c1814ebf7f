//! Core library for the `gpio-hilos` CLI.
//!
//! Waits for a push button on a GPIO line, prints a counting workload and a
//! random-letter workload first on one thread and then on two, reports the
//! wall-clock time of each mode, and lights an LED when done.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod gate;
pub mod ports;
pub mod runner;
pub mod workload;

use clap::Parser;

pub use error::Error;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args)?;
    commands::dispatch(cli.into_command())
}

/// Install the `env_logger` backend: `warn` by default, `RUST_LOG` overrides.
pub fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}
