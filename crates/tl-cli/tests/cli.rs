//! Binary-level tests: commands that run without a reachable store.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn tl_binary() -> String {
    env!("CARGO_BIN_EXE_tl").to_string()
}

/// Runs `tl` with its home, config and data confined to `home`.
fn tl(home: &Path, args: &[&str]) -> Output {
    Command::new(tl_binary())
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("TL_STORE_URL")
        .env("TL_DATA_DIR", home.join("data"))
        .args(args)
        .output()
        .expect("failed to run tl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn miles_calculator_rates_a_redemption() {
    let temp = TempDir::new().unwrap();
    let output = tl(temp.path(), &["miles", "300", "15000", "5.60"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Good Redemption\n1.96 cents/mile\n"), "{text}");
    assert!(text.contains("Net cash value    $294.40"));
}

#[test]
fn trip_lifecycle_is_persisted_between_invocations() {
    let temp = TempDir::new().unwrap();
    let state = temp.path().join("data/active_trip.json");

    let output = tl(temp.path(), &["trip", "start", "--direction", "pdx"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Started PDX trip.\nTiming: House to Airport\n"
    );
    assert!(state.exists());

    let output = tl(temp.path(), &["trip", "status"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("PDX trip\n> House to Airport"), "{text}");

    let output = tl(temp.path(), &["trip", "next"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Timing: Terminal to Parking"));

    let output = tl(temp.path(), &["trip", "discard"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Trip discarded.\n");
    assert!(!state.exists());
}

#[test]
fn store_commands_explain_missing_endpoint() {
    let temp = TempDir::new().unwrap();
    let output = tl(temp.path(), &["analytics"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("store endpoint not set"), "{stderr}");
}

#[test]
fn settings_show_reports_missing_store() {
    let temp = TempDir::new().unwrap();
    let output = tl(temp.path(), &["settings", "show"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Store endpoint:   not set"));
}

#[test]
fn config_file_supplies_store_url() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("tl.toml");
    std::fs::write(&config, "store_url = \"http://127.0.0.1:9/exec\"\n").unwrap();

    let output = tl(
        temp.path(),
        &["--config", config.to_str().unwrap(), "settings", "show"],
    );
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Store endpoint:   configured"));
}

#[test]
fn manual_log_rejects_unknown_segment() {
    let temp = TempDir::new().unwrap();
    let output = tl(
        temp.path(),
        &["trip", "log", "--direction", "MCI", "--segment", "taxi_line=5"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown segment type: taxi_line"), "{stderr}");
}
