//! In-memory GPIO bench with a scripted push button.
//!
//! Every call against the bench is appended to a shared [`EventLog`], so
//! callers can assert exactly what was acquired, driven, and released.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::gpio::{GpioChip, GpioController, GpioError, GpioLine, InputLine, Level, OutputLine};

/// Number of lines exposed by the simulated chip (matches a Raspberry Pi header chip).
pub const SIMULATED_LINES: u32 = 54;

/// What the simulated board does once the program starts polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// The chip device does not exist.
    MissingChip,
    /// The button is never pressed.
    NeverPressed,
    /// The button reads high from this poll onward (`0` = already pressed).
    PressAfter(u32),
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(Self::NeverPressed),
            "missing-chip" => Ok(Self::MissingChip),
            other => other.parse::<u32>().map(Self::PressAfter).map_err(|_| {
                format!("expected `never`, `missing-chip`, or a poll count, got `{other}`")
            }),
        }
    }
}

/// One call observed by the bench.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioEvent {
    /// `open` was attempted.
    Open(PathBuf),
    /// `get_line` was attempted.
    GetLine(u32),
    /// An input request was attempted.
    RequestInput(u32),
    /// An output request was attempted with this initial level.
    RequestOutput(u32, Level),
    /// A read returned this level.
    Read(u32, Level),
    /// A line was driven to this level.
    Set(u32, Level),
    /// A claimed line was released.
    Release(u32),
    /// The chip was closed.
    Close,
}

/// Shared, append-only record of bench events.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<GpioEvent>>>);

impl EventLog {
    fn push(&self, event: GpioEvent) {
        self.guard().push(event);
    }

    /// Returns a copy of every event so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<GpioEvent> {
        self.guard().clone()
    }

    /// Counts the events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&GpioEvent) -> bool) -> usize {
        self.guard().iter().filter(|&e| predicate(e)).count()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<GpioEvent>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
struct Bench {
    scenario: Scenario,
    missing_lines: BTreeSet<u32>,
    rejected_lines: BTreeSet<u32>,
    claimed: BTreeSet<u32>,
    polls: u32,
}

impl Bench {
    fn sample(&mut self) -> Level {
        let level = match self.scenario {
            Scenario::PressAfter(n) if self.polls >= n => Level::High,
            _ => Level::Low,
        };
        self.polls = self.polls.saturating_add(1);
        level
    }
}

type SharedBench = Arc<Mutex<Bench>>;

fn lock(bench: &SharedBench) -> MutexGuard<'_, Bench> {
    bench.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated controller exposing one chip with [`SIMULATED_LINES`] lines.
#[derive(Debug, Clone)]
pub struct SimulatedGpio {
    bench: SharedBench,
    events: EventLog,
}

impl SimulatedGpio {
    /// Creates a bench that plays `scenario`.
    #[must_use]
    pub fn new(scenario: Scenario) -> Self {
        let bench = Bench {
            scenario,
            missing_lines: BTreeSet::new(),
            rejected_lines: BTreeSet::new(),
            claimed: BTreeSet::new(),
            polls: 0,
        };
        Self { bench: Arc::new(Mutex::new(bench)), events: EventLog::default() }
    }

    /// Makes `get_line(offset)` fail.
    #[must_use]
    pub fn without_line(self, offset: u32) -> Self {
        lock(&self.bench).missing_lines.insert(offset);
        self
    }

    /// Makes every request for `offset` fail, as if another consumer held it.
    #[must_use]
    pub fn rejecting(self, offset: u32) -> Self {
        lock(&self.bench).rejected_lines.insert(offset);
        self
    }

    /// Handle to the events recorded by this bench and everything it hands out.
    #[must_use]
    pub fn events(&self) -> EventLog {
        self.events.clone()
    }

    /// Number of times the button has been sampled.
    #[must_use]
    pub fn polls(&self) -> u32 {
        lock(&self.bench).polls
    }
}

impl GpioController for SimulatedGpio {
    fn open(&self, path: &Path) -> Result<Box<dyn GpioChip>, GpioError> {
        self.events.push(GpioEvent::Open(path.to_path_buf()));
        if lock(&self.bench).scenario == Scenario::MissingChip {
            return Err(GpioError::ChipUnavailable(path.to_path_buf()));
        }
        Ok(Box::new(SimulatedChip { bench: Arc::clone(&self.bench), events: self.events.clone() }))
    }
}

struct SimulatedChip {
    bench: SharedBench,
    events: EventLog,
}

impl GpioChip for SimulatedChip {
    fn get_line(&mut self, offset: u32) -> Result<Box<dyn GpioLine>, GpioError> {
        self.events.push(GpioEvent::GetLine(offset));
        if offset >= SIMULATED_LINES || lock(&self.bench).missing_lines.contains(&offset) {
            return Err(GpioError::NoSuchLine(offset));
        }
        Ok(Box::new(SimulatedLine {
            offset,
            bench: Arc::clone(&self.bench),
            events: self.events.clone(),
        }))
    }
}

impl Drop for SimulatedChip {
    fn drop(&mut self) {
        self.events.push(GpioEvent::Close);
    }
}

struct SimulatedLine {
    offset: u32,
    bench: SharedBench,
    events: EventLog,
}

impl SimulatedLine {
    fn claim(self) -> Result<ClaimedLine, GpioError> {
        let mut bench = lock(&self.bench);
        if bench.rejected_lines.contains(&self.offset) || !bench.claimed.insert(self.offset) {
            return Err(GpioError::RequestRejected(self.offset));
        }
        drop(bench);
        Ok(ClaimedLine { offset: self.offset, bench: self.bench, events: self.events })
    }
}

impl GpioLine for SimulatedLine {
    fn offset(&self) -> u32 {
        self.offset
    }

    fn request_input(self: Box<Self>, _consumer: &str) -> Result<Box<dyn InputLine>, GpioError> {
        self.events.push(GpioEvent::RequestInput(self.offset));
        Ok(Box::new((*self).claim()?))
    }

    fn request_output(
        self: Box<Self>,
        _consumer: &str,
        initial: Level,
    ) -> Result<Box<dyn OutputLine>, GpioError> {
        self.events.push(GpioEvent::RequestOutput(self.offset, initial));
        Ok(Box::new((*self).claim()?))
    }
}

struct ClaimedLine {
    offset: u32,
    bench: SharedBench,
    events: EventLog,
}

impl InputLine for ClaimedLine {
    fn read_value(&self) -> Result<Level, GpioError> {
        let level = lock(&self.bench).sample();
        self.events.push(GpioEvent::Read(self.offset, level));
        Ok(level)
    }
}

impl OutputLine for ClaimedLine {
    fn set_value(&mut self, value: Level) -> Result<(), GpioError> {
        self.events.push(GpioEvent::Set(self.offset, value));
        Ok(())
    }
}

impl Drop for ClaimedLine {
    fn drop(&mut self) {
        lock(&self.bench).claimed.remove(&self.offset);
        self.events.push(GpioEvent::Release(self.offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenarios() {
        assert_eq!("never".parse::<Scenario>().unwrap(), Scenario::NeverPressed);
        assert_eq!("missing-chip".parse::<Scenario>().unwrap(), Scenario::MissingChip);
        assert_eq!("3".parse::<Scenario>().unwrap(), Scenario::PressAfter(3));
        assert!("soon".parse::<Scenario>().is_err());
    }

    #[test]
    fn button_goes_high_after_scripted_polls() {
        let gpio = SimulatedGpio::new(Scenario::PressAfter(2));
        let mut chip = gpio.open(Path::new("/dev/gpiochip0")).unwrap();
        let button = chip.get_line(17).unwrap().request_input("test").unwrap();

        assert_eq!(button.read_value().unwrap(), Level::Low);
        assert_eq!(button.read_value().unwrap(), Level::Low);
        assert_eq!(button.read_value().unwrap(), Level::High);
        assert_eq!(button.read_value().unwrap(), Level::High);
        assert_eq!(gpio.polls(), 4);
    }

    #[test]
    fn line_cannot_be_claimed_twice() {
        let gpio = SimulatedGpio::new(Scenario::NeverPressed);
        let mut chip = gpio.open(Path::new("/dev/gpiochip0")).unwrap();
        let _held = chip.get_line(5).unwrap().request_input("a").unwrap();
        let again = chip.get_line(5).unwrap().request_input("b");
        assert!(matches!(again, Err(GpioError::RequestRejected(5))));
    }

    #[test]
    fn out_of_range_offset_is_missing() {
        let gpio = SimulatedGpio::new(Scenario::NeverPressed);
        let mut chip = gpio.open(Path::new("/dev/gpiochip0")).unwrap();
        assert!(matches!(chip.get_line(SIMULATED_LINES), Err(GpioError::NoSuchLine(_))));
    }

    #[test]
    fn drops_are_logged_as_release_then_close() {
        let gpio = SimulatedGpio::new(Scenario::PressAfter(0));
        let events = gpio.events();
        {
            let mut chip = gpio.open(Path::new("/dev/gpiochip0")).unwrap();
            let mut led = chip.get_line(27).unwrap().request_output("t", Level::Low).unwrap();
            led.set_value(Level::High).unwrap();
            drop(led);
        }
        assert_eq!(
            events.snapshot(),
            vec![
                GpioEvent::Open(PathBuf::from("/dev/gpiochip0")),
                GpioEvent::GetLine(27),
                GpioEvent::RequestOutput(27, Level::Low),
                GpioEvent::Set(27, Level::High),
                GpioEvent::Release(27),
                GpioEvent::Close,
            ]
        );
    }

    #[test]
    fn missing_chip_fails_open() {
        let gpio = SimulatedGpio::new(Scenario::MissingChip);
        assert!(gpio.open(Path::new("/dev/gpiochip0")).is_err());
        assert_eq!(gpio.events().count(|e| matches!(e, GpioEvent::Open(_))), 1);
    }
}
