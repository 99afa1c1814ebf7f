//! Record-replay round-trip integration tests.
//!
//! 1. Run against the simulated bench with `GPIO_HILOS_RECORD` set.
//! 2. Run again with `GPIO_HILOS_REPLAY` pointing at the cassette and no bench.
//! 3. Assert both runs see the same GPIO session.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;

use gpio_hilos::cassette::format::Cassette;
use gpio_hilos::cassette::recorder::CassetteRecorder;

fn run_bin(args: &[&str], env: &[(&str, &Path)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gpio-hilos"));
    cmd.args(args).env_remove("GPIO_HILOS_RECORD").env_remove("GPIO_HILOS_REPLAY");
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().expect("failed to run gpio-hilos binary")
}

fn count(cassette: &Cassette, method: &str) -> u64 {
    cassette.interactions.iter().filter(|i| i.method == method).map(|i| i.repeat).sum()
}

#[test]
fn record_then_replay_produces_identical_session() {
    let dir = std::env::temp_dir().join("gpio_hilos_record_replay_test");
    let cassette_path = dir.join("press.cassette.yaml");

    // --- Phase 1: record against the bench ---
    let recorded = run_bin(
        &["run", "--simulate", "2", "--pace-ms", "0", "--poll-interval-ms", "1"],
        &[("GPIO_HILOS_RECORD", cassette_path.as_path())],
    );
    assert!(recorded.status.success(), "stderr: {}", String::from_utf8_lossy(&recorded.stderr));

    let cassette = Cassette::load(&cassette_path).expect("cassette should be written");
    assert_eq!(cassette.chip, "/dev/gpiochip0");
    assert_eq!(count(&cassette, "open"), 1);
    assert_eq!(count(&cassette, "read_value"), 3);
    let reads = cassette.interactions.iter().filter(|i| i.method == "read_value");
    assert_eq!(reads.map(|i| i.repeat).collect::<Vec<_>>(), [2, 1]);
    assert_eq!(count(&cassette, "set_value"), 1);
    let set = cassette.interactions.iter().find(|i| i.method == "set_value").unwrap();
    assert_eq!(set.input, json!({"offset": 27, "value": "high"}));

    // --- Phase 2: replay with no bench at all ---
    let replayed = run_bin(
        &["run", "--pace-ms", "0", "--poll-interval-ms", "1"],
        &[("GPIO_HILOS_REPLAY", cassette_path.as_path())],
    );
    assert!(replayed.status.success(), "stderr: {}", String::from_utf8_lossy(&replayed.stderr));

    let stdout = String::from_utf8_lossy(&replayed.stdout);
    assert!(stdout.contains("Switch presionado"));
    assert!(stdout.contains("[LED encendido]"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn failed_setup_is_recorded_and_replayed() {
    let dir = std::env::temp_dir().join("gpio_hilos_record_failure_test");
    let cassette_path = dir.join("missing.cassette.yaml");

    let recorded = run_bin(
        &["run", "--simulate", "missing-chip"],
        &[("GPIO_HILOS_RECORD", cassette_path.as_path())],
    );
    assert_eq!(recorded.status.code(), Some(1));

    let cassette = Cassette::load(&cassette_path).expect("cassette is written on failure too");
    assert_eq!(cassette.interactions.len(), 1);
    assert!(cassette.interactions[0].output.get("err").is_some());

    let replayed = run_bin(&["run"], &[("GPIO_HILOS_REPLAY", cassette_path.as_path())]);
    assert_eq!(replayed.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&replayed.stderr).contains("No se pudo abrir el chip GPIO"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn truncated_cassette_fails_instead_of_hanging() {
    let dir = std::env::temp_dir().join("gpio_hilos_truncated_cassette_test");
    std::fs::create_dir_all(&dir).unwrap();
    let cassette_path = dir.join("truncated.cassette.yaml");

    let mut recorder = CassetteRecorder::new(&cassette_path, "truncated", "/dev/gpiochip0");
    recorder.record("gpio", "open", json!({"path": "/dev/gpiochip0"}), json!({"ok": null}));
    recorder.write().unwrap();

    let replayed = run_bin(&["run"], &[("GPIO_HILOS_REPLAY", cassette_path.as_path())]);
    assert_eq!(replayed.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&replayed.stderr)
        .contains("No se pudo obtener la línea del botón"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unwritable_cassette_keeps_the_gpio_diagnostic() {
    let dir = std::env::temp_dir().join("gpio_hilos_unwritable_cassette_test");
    std::fs::create_dir_all(&dir).unwrap();
    let not_a_dir = dir.join("plain-file");
    std::fs::write(&not_a_dir, "").unwrap();
    let cassette_path = not_a_dir.join("x.cassette.yaml");

    let output = run_bin(
        &["run", "--simulate", "missing-chip"],
        &[("GPIO_HILOS_RECORD", cassette_path.as_path())],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("No se pudo abrir el chip GPIO"), "stderr: {stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unwritable_cassette_fails_an_otherwise_good_run() {
    let dir = std::env::temp_dir().join("gpio_hilos_unwritable_success_test");
    std::fs::create_dir_all(&dir).unwrap();
    let not_a_dir = dir.join("plain-file");
    std::fs::write(&not_a_dir, "").unwrap();
    let cassette_path = not_a_dir.join("x.cassette.yaml");

    let output = run_bin(
        &["run", "--simulate", "0", "--pace-ms", "0"],
        &[("GPIO_HILOS_RECORD", cassette_path.as_path())],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("cassette"), "stderr: {stderr}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("[LED encendido]"));

    let _ = std::fs::remove_dir_all(&dir);
}
