//! Records interactions into a cassette file.

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::format::{Cassette, Interaction};
use super::CassetteError;

/// Records interactions and writes them as a YAML cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    chip: String,
    interactions: Vec<Interaction>,
    next_seq: u64,
}

impl CassetteRecorder {
    /// Create a new recorder that will write to the given path.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, chip: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            chip: chip.into(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Interactions recorded so far.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Record an interaction. The `seq` field is assigned automatically.
    ///
    /// A call identical to the previous one (same port, method, input and
    /// output) bumps that entry's `repeat` instead of adding a new one.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let (port, method) = (port.into(), method.into());
        if let Some(last) = self.interactions.last_mut() {
            let same_call = last.port == port && last.method == method && last.input == input;
            if same_call && last.output == output {
                last.repeat += 1;
                return;
            }
        }
        let interaction = Interaction { seq: self.next_seq, port, method, input, output, repeat: 1 };
        self.next_seq += 1;
        self.interactions.push(interaction);
    }

    /// Write everything recorded so far to disk.
    ///
    /// The recorder stays usable, so a session can be flushed even while
    /// adapters still hold references to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self) -> Result<&Path, CassetteError> {
        let cassette = Cassette {
            name: self.name.clone(),
            recorded_at: Utc::now(),
            chip: self.chip.clone(),
            interactions: self.interactions.clone(),
        };
        let io_err = |source| CassetteError::Io { path: self.path.clone(), source };
        let yaml = serde_yaml::to_string(&cassette).map_err(|e| io_err(std::io::Error::other(e)))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, yaml).map_err(io_err)?;
        Ok(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_and_write() {
        let dir = std::env::temp_dir().join("gpio_hilos_recorder_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "test-recording", "/dev/gpiochip0");
        recorder.record("gpio", "open", json!({"path": "/dev/gpiochip0"}), json!({"ok": null}));
        recorder.record("gpio", "get_line", json!({"offset": 17}), json!({"ok": null}));
        recorder.record("gpio", "read_value", json!({"offset": 17}), json!({"ok": "low"}));

        let written = recorder.write().expect("write should succeed");
        assert_eq!(written, path);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "test-recording");
        assert_eq!(cassette.chip, "/dev/gpiochip0");
        assert_eq!(cassette.interactions.len(), 3);
        assert_eq!(cassette.interactions[0].seq, 0);
        assert_eq!(cassette.interactions[2].seq, 2);
        assert_eq!(cassette.interactions[2].method, "read_value");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_can_be_repeated() {
        let dir = std::env::temp_dir().join("gpio_hilos_recorder_rewrite_test");
        let path = dir.join("nested").join("again.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "again", "/dev/gpiochip0");
        recorder.record("gpio", "open", json!({}), json!({"ok": null}));
        recorder.write().unwrap();
        recorder.record("gpio", "get_line", json!({"offset": 27}), json!({"ok": null}));
        recorder.write().unwrap();

        assert_eq!(Cassette::load(&path).unwrap().interactions.len(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn identical_polls_share_one_entry() {
        let mut recorder = CassetteRecorder::new("unused.yaml", "polls", "/dev/gpiochip0");
        for _ in 0..500 {
            recorder.record("gpio", "read_value", json!({"offset": 17}), json!({"ok": "low"}));
        }
        recorder.record("gpio", "read_value", json!({"offset": 17}), json!({"ok": "high"}));
        recorder.record("gpio", "read_value", json!({"offset": 17}), json!({"ok": "high"}));

        let interactions = recorder.interactions();
        assert_eq!(interactions.len(), 2);
        assert_eq!((interactions[0].seq, interactions[0].repeat), (0, 500));
        assert_eq!((interactions[1].seq, interactions[1].repeat), (1, 2));
    }
}
