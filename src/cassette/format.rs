//! Cassette data structures for recording and replaying GPIO sessions.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CassetteError;

/// A single recorded call against a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (always `"gpio"` today).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Arguments of the call.
    pub input: serde_json::Value,
    /// Result of the call, as `{"ok": ..}` or `{"err": ..}`.
    pub output: serde_json::Value,
    /// How many consecutive identical calls this entry stands for.
    #[serde(default = "once", skip_serializing_if = "is_once")]
    pub repeat: u64,
}

fn once() -> u64 {
    1
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_once(repeat: &u64) -> bool {
    *repeat == 1
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Chip device the session was recorded against.
    pub chip: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Loads a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a cassette.
    pub fn load(path: &Path) -> Result<Self, CassetteError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| CassetteError::Io { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| CassetteError::Parse { path: path.to_path_buf(), source })
    }
}
