use chat_panel::Error;
use chat_panel::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;
use std::time::Duration;

const BIN: &str = "chat-panel";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("CHAT_PANEL_BACKEND__BASE_URL");
        env::remove_var("CHAT_PANEL_PANEL__TYPING_INTERVAL_MS");
        env::remove_var("CHAT_BASE_URL");
        env::remove_var("TYPING_INTERVAL_MS");
        env::remove_var("CONFIG_FILE");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN]).expect("defaults should load");
    assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
    assert_eq!(config.backend.chat_path, "/chat");
    assert_eq!(config.backend.upload_path, "/upload");
    assert_eq!(config.backend.timeout(), None);
    assert_eq!(config.panel.typing_interval(), Duration::from_millis(15));
    assert_eq!(config.panel.visible_messages, 40);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT_PANEL_BACKEND__BASE_URL", "http://chat.internal:8080");
        env::set_var("CHAT_PANEL_PANEL__TYPING_INTERVAL_MS", "40");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.backend.base_url, "http://chat.internal:8080");
    assert_eq!(config.panel.typing_interval_ms, 40);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT_PANEL_BACKEND__BASE_URL", "http://from-env:1");
    }

    let config = AppConfig::load_from_args([
        BIN,
        "--base-url",
        "http://from-cli:2",
        "--typing-interval-ms",
        "5",
    ])
    .expect("Failed to load config");
    assert_eq!(config.backend.base_url, "http://from-cli:2");
    assert_eq!(config.panel.typing_interval_ms, 5);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("panel.yaml");
    fs::write(
        &file_path,
        r#"
backend:
  base_url: "http://files:7070"
  timeout_secs: 30
panel:
  visible_messages: 10
"#,
    )
    .expect("Failed to write temp config");

    let config = AppConfig::load_from_args([BIN, "--config", file_path.to_str().unwrap()])
        .expect("Failed to load config from file");
    assert_eq!(config.backend.base_url, "http://files:7070");
    assert_eq!(config.backend.timeout(), Some(Duration::from_secs(30)));
    assert_eq!(config.panel.visible_messages, 10);
    // Untouched keys keep their defaults.
    assert_eq!(config.backend.chat_path, "/chat");
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--config", "/no/such/panel.yaml"]);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_unknown_flag_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--port", "3000"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_zero_typing_interval_is_rejected() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--typing-interval-ms", "0"]);
    assert!(matches!(result, Err(Error::Config(_))));

    unsafe {
        env::set_var("CHAT_PANEL_PANEL__TYPING_INTERVAL_MS", "0");
    }
    let result = AppConfig::load_from_args([BIN]);
    assert!(matches!(result, Err(Error::Config(_))));

    clear_env_vars();
}
