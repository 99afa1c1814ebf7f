//! `gpio-hilos bench` command.

use crate::config::WorkloadSettings;
use crate::console::Console;
use crate::runner::{run_concurrent, run_sequential, RunTiming};
use crate::workload::Workload;

/// Run both modes back to back, with no hardware involved.
pub fn run(console: &Console, settings: &WorkloadSettings) -> (RunTiming, RunTiming) {
    let work = Workload::new(console, settings);
    let sequential = run_sequential(&work);
    let concurrent = run_concurrent(&work);
    (sequential, concurrent)
}
