//! The two fixed workloads: counting and random letters.

use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::WorkloadSettings;
use crate::console::Console;
use crate::say;

/// Last number printed by the numeric printer (inclusive).
pub const LAST_NUMBER: u32 = 30;

/// How many letters the letter printer emits.
pub const LETTER_COUNT: usize = 30;

/// Letters sampled by the letter printer.
pub const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The numbers `0..=30`, in order.
pub fn numbers() -> impl Iterator<Item = u32> {
    0..=LAST_NUMBER
}

/// Thirty letters drawn uniformly, with replacement, from [`ALPHABET`].
pub fn letters<R: Rng>(mut rng: R) -> impl Iterator<Item = char> {
    (0..LETTER_COUNT).map(move |_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
}

/// Both printers bound to one console and pacing.
///
/// Shared by reference between threads; each call is an independent,
/// complete run of the printer.
#[derive(Clone, Copy)]
pub struct Workload<'a> {
    console: &'a Console,
    pace: Duration,
    seed: Option<u64>,
}

impl<'a> Workload<'a> {
    /// Binds the printers to `console`.
    #[must_use]
    pub fn new(console: &'a Console, settings: &WorkloadSettings) -> Self {
        Self { console, pace: settings.pace, seed: settings.seed }
    }

    /// Console the printers write to.
    #[must_use]
    pub fn console(&self) -> &'a Console {
        self.console
    }

    /// Delay after each printed line.
    #[must_use]
    pub fn pace(&self) -> Duration {
        self.pace
    }

    /// Prints `Número: N` for every number, pausing after each line.
    pub fn print_numbers(&self) {
        for number in numbers() {
            say!(self.console, "Número: {number}");
            thread::sleep(self.pace);
        }
    }

    /// Prints `Letra: C` for thirty random letters, pausing after each line.
    pub fn print_letters(&self) {
        for letter in letters(self.rng()) {
            say!(self.console, "Letra: {letter}");
            thread::sleep(self.pace);
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Transcript;

    fn workload(console: &Console, seed: Option<u64>) -> Workload<'_> {
        Workload::new(console, &WorkloadSettings { pace: Duration::ZERO, seed })
    }

    #[test]
    fn numbers_are_zero_through_thirty() {
        let all: Vec<u32> = numbers().collect();
        assert_eq!(all.len(), 31);
        assert_eq!(all, (0..=30).collect::<Vec<_>>());
    }

    #[test]
    fn numbers_restart_on_each_call() {
        assert_eq!(numbers().count(), numbers().count());
    }

    #[test]
    fn letters_are_thirty_uppercase() {
        let drawn: Vec<char> = letters(StdRng::from_entropy()).collect();
        assert_eq!(drawn.len(), 30);
        assert!(drawn.iter().all(char::is_ascii_uppercase));
    }

    #[test]
    fn same_seed_draws_same_letters() {
        let a: String = letters(StdRng::seed_from_u64(7)).collect();
        let b: String = letters(StdRng::seed_from_u64(7)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn print_numbers_writes_every_number_in_order() {
        let transcript = Transcript::default();
        let console = Console::new(transcript.clone());
        workload(&console, None).print_numbers();

        let expected: Vec<String> = (0..=30).map(|n| format!("Número: {n}")).collect();
        assert_eq!(transcript.lines(), expected);
    }

    #[test]
    fn print_letters_writes_thirty_letter_lines() {
        let transcript = Transcript::default();
        let console = Console::new(transcript.clone());
        workload(&console, Some(42)).print_letters();

        let lines = transcript.lines();
        assert_eq!(lines.len(), 30);
        for line in &lines {
            let letter = line.strip_prefix("Letra: ").expect("letter prefix");
            assert_eq!(letter.len(), 1);
            assert!(letter.chars().all(|c| c.is_ascii_uppercase()), "{line}");
        }
    }

    #[test]
    fn printers_pace_every_line() {
        let console = Console::new(Transcript::default());
        let settings = WorkloadSettings { pace: Duration::from_millis(2), seed: None };
        let start = std::time::Instant::now();
        Workload::new(&console, &settings).print_numbers();
        assert!(start.elapsed() >= Duration::from_millis(2 * 31));
    }
}
