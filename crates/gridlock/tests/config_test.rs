//! Tests for loading `gridlock.toml`.

use std::fs;
use tempfile::TempDir;

use gridlock::AppConfig;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("gridlock.toml");
    fs::write(&path, content).expect("Failed to write TOML");
    path
}

#[test]
fn test_full_config_is_parsed() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        r#"name = "ada"

[game]
width = 5
height = 4
win_length = 4

[relay]
host = "0.0.0.0"
port = 9000
"#,
    );

    let config = AppConfig::from_file(&path).expect("Load failed");
    assert_eq!(config.name(), "ada");
    assert_eq!(config.relay_addr(), "0.0.0.0:9000");

    let rules = config.rules().expect("Valid rules");
    assert_eq!(rules.width(), 5);
    assert_eq!(rules.height(), 4);
    assert_eq!(rules.win_length(), 4);
}

#[test]
fn test_missing_fields_use_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "[relay]\nport = 8001\n");

    let config = AppConfig::from_file(&path).expect("Load failed");
    assert_eq!(config.name(), "player");
    assert_eq!(config.relay_addr(), "127.0.0.1:8001");
    assert_eq!(*config.game().width(), 3);
    assert_eq!(config.rules().expect("Valid rules").win_length(), 3);
}

#[test]
fn test_absent_file_falls_back_to_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config =
        AppConfig::load_or_default(dir.path().join("missing.toml")).expect("Defaults");
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_unreachable_win_length_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "[game]\nwidth = 3\nheight = 3\nwin_length = 4\n");

    let config = AppConfig::from_file(&path).expect("Load failed");
    let err = config.rules().expect_err("Rules should be invalid");
    assert!(err.message.contains("Invalid game rules"));
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "this is not valid toml !!!@@@");

    let err = AppConfig::from_file(&path).expect_err("Parse should fail");
    assert!(err.message.contains("Failed to parse config"));
}
