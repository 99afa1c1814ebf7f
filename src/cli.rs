//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::adapters::simulated::Scenario;
use crate::config::{
    DEFAULT_BUTTON, DEFAULT_CHIP, DEFAULT_CONSUMER, DEFAULT_LED, DEFAULT_PACE_MS,
    DEFAULT_POLL_INTERVAL_MS,
};

/// Top-level CLI parser for `gpio-hilos`.
#[derive(Debug, Parser)]
#[command(
    name = "gpio-hilos",
    version,
    about = "Wait for a button, then time one thread against two",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// The command to execute; defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Arguments for `run` when no subcommand is given.
    #[command(flatten)]
    pub run: RunArgs,
}

impl Cli {
    /// The selected command, treating a bare invocation as `run`.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Run(self.run))
    }
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wait for the button, run both modes, then light the LED.
    Run(RunArgs),
    /// Run both modes immediately, without touching any GPIO.
    Bench(WorkloadArgs),
}

/// Arguments of the `run` command.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// GPIO chip device.
    #[arg(long, env = "GPIO_HILOS_CHIP", default_value = DEFAULT_CHIP)]
    pub chip: PathBuf,

    /// Line offset of the push button (input).
    #[arg(long, env = "GPIO_HILOS_BUTTON", default_value_t = DEFAULT_BUTTON)]
    pub button: u32,

    /// Line offset of the LED (output).
    #[arg(long, env = "GPIO_HILOS_LED", default_value_t = DEFAULT_LED)]
    pub led: u32,

    /// Consumer label attached to both line requests.
    #[arg(long, env = "GPIO_HILOS_CONSUMER", default_value = DEFAULT_CONSUMER)]
    pub consumer: String,

    /// Milliseconds between button samples.
    #[arg(
        long,
        env = "GPIO_HILOS_POLL_INTERVAL_MS",
        default_value_t = DEFAULT_POLL_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_ms: u64,

    /// Use the in-memory bench: `never`, `missing-chip`, or polls before the press.
    #[arg(long, env = "GPIO_HILOS_SIMULATE", value_name = "WHEN")]
    pub simulate: Option<Scenario>,

    /// Printer pacing and seeding.
    #[command(flatten)]
    pub workload: WorkloadArgs,
}

/// Arguments shared by every command that runs the printers.
#[derive(Debug, Clone, Args)]
pub struct WorkloadArgs {
    /// Milliseconds to pause after every printed line.
    #[arg(long, env = "GPIO_HILOS_PACE_MS", default_value_t = DEFAULT_PACE_MS)]
    pub pace_ms: u64,

    /// Seed for the letter generator (random when omitted).
    #[arg(long, env = "GPIO_HILOS_SEED")]
    pub seed: Option<u64>,
}
