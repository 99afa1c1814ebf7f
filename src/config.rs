//! Resolved runtime settings.
//!
//! Values come from CLI flags, falling back to `GPIO_HILOS_*` environment
//! variables (optionally loaded from `.env`), then to the defaults below.

use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::simulated::Scenario;
use crate::cli::{RunArgs, WorkloadArgs};

/// GPIO chip opened by default.
pub const DEFAULT_CHIP: &str = "/dev/gpiochip0";
/// Button line offset (BCM GPIO 17).
pub const DEFAULT_BUTTON: u32 = 17;
/// LED line offset (BCM GPIO 27).
pub const DEFAULT_LED: u32 = 27;
/// Consumer label shown by `gpioinfo` for claimed lines.
pub const DEFAULT_CONSUMER: &str = "programa";
/// Button sampling interval, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;
/// Pause after every printed line, in milliseconds.
pub const DEFAULT_PACE_MS: u64 = 100;

/// Environment variable naming a cassette to record the GPIO session into.
pub const RECORD_ENV: &str = "GPIO_HILOS_RECORD";
/// Environment variable naming a cassette to replay the GPIO session from.
pub const REPLAY_ENV: &str = "GPIO_HILOS_REPLAY";

/// Where the gate finds its hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpioSettings {
    /// Chip device path.
    pub chip: PathBuf,
    /// Button line offset.
    pub button: u32,
    /// LED line offset.
    pub led: u32,
    /// Consumer label for both requests.
    pub consumer: String,
    /// Delay between button samples.
    pub poll_interval: Duration,
}

impl Default for GpioSettings {
    fn default() -> Self {
        Self {
            chip: PathBuf::from(DEFAULT_CHIP),
            button: DEFAULT_BUTTON,
            led: DEFAULT_LED,
            consumer: DEFAULT_CONSUMER.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// How the printers pace and seed themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadSettings {
    /// Delay after every printed line.
    pub pace: Duration,
    /// Fixed seed for the letter generator; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for WorkloadSettings {
    fn default() -> Self {
        Self { pace: Duration::from_millis(DEFAULT_PACE_MS), seed: None }
    }
}

impl From<&WorkloadArgs> for WorkloadSettings {
    fn from(args: &WorkloadArgs) -> Self {
        Self { pace: Duration::from_millis(args.pace_ms), seed: args.seed }
    }
}

/// Everything the `run` command needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Hardware location.
    pub gpio: GpioSettings,
    /// Printer pacing and seeding.
    pub workload: WorkloadSettings,
    /// Run against the in-memory bench instead of a real chip.
    pub simulate: Option<Scenario>,
}

impl From<&RunArgs> for Settings {
    fn from(args: &RunArgs) -> Self {
        Self {
            gpio: GpioSettings {
                chip: args.chip.clone(),
                button: args.button,
                led: args.led,
                consumer: args.consumer.clone(),
                poll_interval: Duration::from_millis(args.poll_interval_ms),
            },
            workload: WorkloadSettings::from(&args.workload),
            simulate: args.simulate,
        }
    }
}
