//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use slice4d::config::AppConfig;
use serial_test::serial;

fn temp_config_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("slice4d_config_tests").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("S4D_EDIT__ENABLED", "true");
    std::env::set_var("S4D_TIMING__TICK_RATE", "30");
    let config = AppConfig::load().unwrap();
    assert!(config.edit.enabled);
    assert_eq!(config.timing.tick_rate, 30);
    std::env::remove_var("S4D_EDIT__ENABLED");
    std::env::remove_var("S4D_TIMING__TICK_RATE");
}

#[test]
#[serial]
fn test_default_file_loading() {
    let config = AppConfig::load().unwrap();
    assert_eq!(config.level.directory, PathBuf::from("levels"));
    assert_eq!(config.projection.cell_size, 3.0);
    assert_eq!(config.to_game_settings().transition_delay, Duration::from_secs(2));
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = temp_config_dir("user_override");
    std::fs::write(
        dir.join("default.toml"),
        "[level]\ndirectory = \"levels\"\nfirst = \"tutorial.ron\"\n\n[timing]\ntransition_delay_secs = 2.0\npanel_duration_secs = 2.0\nlevel_complete_delay_secs = 2.0\ntick_rate = 60\n",
    )
    .unwrap();
    std::fs::write(dir.join("user.toml"), "[level]\ndirectory = \"mine\"\nfirst = \"start.ron\"\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.first_level_path(), PathBuf::from("mine/start.ron"));
    assert_eq!(config.timing.tick_rate, 60);
}

#[test]
#[serial]
fn test_env_beats_user_file() {
    let dir = temp_config_dir("env_beats_user");
    std::fs::write(dir.join("user.toml"), "[debug]\nlog_level = \"warn\"\n").unwrap();

    std::env::set_var("S4D_DEBUG__LOG_LEVEL", "trace");
    let config = AppConfig::load_from(&dir).unwrap();
    std::env::remove_var("S4D_DEBUG__LOG_LEVEL");
    assert_eq!(config.debug.log_level, "trace");
}

#[test]
#[serial]
fn test_invalid_value_is_config_error() {
    let dir = temp_config_dir("invalid_value");
    std::fs::write(dir.join("user.toml"), "[timing]\ntick_rate = \"fast\"\n").unwrap();
    let err = AppConfig::load_from(&dir).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("definitely/not/a/config/dir").unwrap();
    assert_eq!(config.level.first, "tutorial.ron");
    assert!(!config.edit.enabled);
}

#[test]
#[serial]
fn test_infinite_delay_in_user_file_does_not_crash() {
    let dir = temp_config_dir("infinite_delay");
    std::fs::write(
        dir.join("user.toml"),
        "[timing]\ntransition_delay_secs = inf\npanel_duration_secs = 0.5\nlevel_complete_delay_secs = 2.0\ntick_rate = 60\n",
    )
    .unwrap();
    let config = AppConfig::load_from(&dir).unwrap();
    assert!(config.timing.transition_delay_secs.is_infinite());
    let settings = config.to_game_settings();
    assert_eq!(settings.transition_delay, Duration::from_secs(2));
    assert_eq!(settings.panel_duration, Duration::from_millis(500));
}
