use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn run(config: &Path, log: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_surplus_watch"))
        .arg("--config")
        .arg(config)
        .arg("--log-file")
        .arg(log)
        .args(extra)
        .stdin(Stdio::null())
        .output()
        .expect("run surplus_watch")
}

#[test]
fn invalid_config_exits_with_startup_failure() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.ron");
    fs::write(&config, "(refresh_interval_secs: 0)").unwrap();

    let output = run(&config, &temp.path().join("watch.log"), &["--once"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("refresh interval"), "{stderr}");
}

#[test]
fn missing_token_exits_with_authentication_required() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("nested").join("config.ron");
    let log = temp.path().join("watch.log");

    let output = run(&config, &log, &["--once"]);

    assert_eq!(output.status.code(), Some(2));
    // First launch wrote the defaults.
    let written = fs::read_to_string(&config).unwrap();
    assert!(written.contains("refresh_interval_secs: 30"), "{written}");
    assert!(written.contains("radius_km: 5.0"), "{written}");
    assert!(fs::read_to_string(&log).unwrap().contains("Marketplace login required"));
}

#[test]
fn unset_location_in_once_mode_prints_an_empty_view() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.ron");
    fs::write(
        &config,
        "(location: (lat: None, lng: None), credentials: (access_token: \"tok\"))",
    )
    .unwrap();

    let output = run(&config, &temp.path().join("watch.log"), &["--once"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No search location configured"), "{stdout}");
    assert!(stdout.contains("last update never"), "{stdout}");
}
