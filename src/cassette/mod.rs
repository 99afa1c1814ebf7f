//! Cassettes: recorded GPIO sessions that can be replayed off-board.

pub mod format;
pub mod recorder;
pub mod replayer;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, writing, or replaying a cassette.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// The cassette file could not be read or written.
    #[error("cassette {}: {source}", path.display())]
    Io {
        /// Cassette path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The cassette file is not valid YAML for the cassette format.
    #[error("cassette {}: {source}", path.display())]
    Parse {
        /// Cassette path.
        path: PathBuf,
        /// Underlying YAML failure.
        #[source]
        source: serde_yaml::Error,
    },
    /// Every recorded interaction for this port/method has been consumed.
    #[error("cassette exhausted: no more {port}::{method} interactions (recorded {recorded})")]
    Exhausted {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
        /// How many interactions were recorded for the pair.
        recorded: usize,
    },
    /// A recorded payload does not have the expected shape.
    #[error("cassette entry {port}::{method} is malformed: {reason}")]
    Malformed {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
        /// What was wrong.
        reason: String,
    },
}
