//! Sequential and two-thread runners.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use crate::say;
use crate::workload::Workload;

/// How the two printers were scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Both printers, one after the other, on the calling thread.
    Sequential,
    /// Each printer on its own thread.
    Concurrent,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Sequential => "1 hilo secuencial",
            Mode::Concurrent => "2 hilos paralelos",
        })
    }
}

/// Wall-clock duration of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTiming {
    /// Scheduling used.
    pub mode: Mode,
    /// Time from first print to last join.
    pub elapsed: Duration,
}

impl RunTiming {
    /// Elapsed time in whole milliseconds, as reported on the console.
    #[must_use]
    pub fn millis(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Runs the numeric printer and then the letter printer on this thread.
pub fn run_sequential(work: &Workload<'_>) -> RunTiming {
    timed(work, Mode::Sequential, || {
        work.print_numbers();
        work.print_letters();
    })
}

/// Runs both printers on two threads and waits for both.
pub fn run_concurrent(work: &Workload<'_>) -> RunTiming {
    timed(work, Mode::Concurrent, || {
        thread::scope(|s| {
            s.spawn(|| work.print_numbers());
            s.spawn(|| work.print_letters());
        });
    })
}

fn timed(work: &Workload<'_>, mode: Mode, body: impl FnOnce()) -> RunTiming {
    let start = Instant::now();
    body();
    let timing = RunTiming { mode, elapsed: start.elapsed() };
    say!(work.console(), "Tiempo total ({mode}): {} ms", timing.millis());
    log::info!("{mode}: {:?} at {:?} pace", timing.elapsed, work.pace());
    timing
}
