//! Crate-level error type and exit-code mapping.

use thiserror::Error;

use crate::cassette::CassetteError;
use crate::gate::GateError;

/// Everything that can stop the program.
#[derive(Debug, Error)]
pub enum Error {
    /// Hardware setup or access failed.
    #[error(transparent)]
    Gate(#[from] GateError),
    /// A cassette could not be loaded, replayed, or written.
    #[error(transparent)]
    Cassette(#[from] CassetteError),
    /// Arguments could not be parsed (also covers `--help` and `--version`).
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

impl Error {
    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Gate(_) | Error::Cassette(_) => 1,
            Error::Cli(err) => u8::try_from(err.exit_code()).unwrap_or(2),
        }
    }

    /// The error and its causes, outermost first.
    #[must_use]
    pub fn chain(&self) -> Vec<String> {
        let mut causes = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            causes.push(err.to_string());
            source = err.source();
        }
        causes
    }
}
