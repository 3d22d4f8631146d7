//! Unit tests for configuration resolution
//!
//! Covers the CLI → ENV → TOML → default priority order and the handling of
//! missing or malformed config files.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that read or write MLA_* variables are marked with #[serial].

use mla_common::config::{
    default_config_path, AnalyticsConfig, ConfigOverrides, ConfigResolver, LoggingConfig,
    OutputFormat, TomlConfig, ENV_DATA_DIR, ENV_FORMAT, ENV_LOG_LEVEL, ENV_OUTPUT_DIR,
};
use mla_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(ENV_DATA_DIR);
    env::remove_var(ENV_OUTPUT_DIR);
    env::remove_var(ENV_FORMAT);
    env::remove_var(ENV_LOG_LEVEL);
}

/// Write a config file into a fresh temp dir and return both
fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

fn resolve_with_file(path: PathBuf) -> AnalyticsConfig {
    ConfigResolver::new(ConfigOverrides {
        config_file: Some(path),
        ..Default::default()
    })
    .resolve()
    .unwrap()
}

#[test]
#[serial]
fn test_empty_config_file_uses_defaults() {
    clear_env();
    let (_dir, path) = write_config("");

    let config = resolve_with_file(path);

    assert_eq!(config.data_dir, PathBuf::from("data"));
    assert_eq!(config.output_dir, PathBuf::from("output"));
    assert_eq!(config.format, OutputFormat::Text);
    assert!(config.parallel);
    assert!(!config.strict_keys);
    assert_eq!(config.log_level, "info");
}

#[test]
#[serial]
fn test_toml_values_override_defaults() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
        data_dir = "/srv/listening/data"
        output_dir = "/srv/listening/out"
        format = "json"
        parallel = false
        strict_keys = true

        [logging]
        level = "debug"
        "#,
    );

    let config = resolve_with_file(path);

    assert_eq!(config.data_dir, PathBuf::from("/srv/listening/data"));
    assert_eq!(config.output_dir, PathBuf::from("/srv/listening/out"));
    assert_eq!(config.format, OutputFormat::Json);
    assert!(!config.parallel);
    assert!(config.strict_keys);
    assert_eq!(config.log_level, "debug");
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
        data_dir = "/from/toml"
        format = "text"
        "#,
    );
    env::set_var(ENV_DATA_DIR, "/from/env");
    env::set_var(ENV_FORMAT, "json");

    let config = resolve_with_file(path);

    assert_eq!(config.data_dir, PathBuf::from("/from/env"));
    assert_eq!(config.format, OutputFormat::Json);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env_and_toml() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
        output_dir = "/from/toml"
        parallel = true
        "#,
    );
    env::set_var(ENV_OUTPUT_DIR, "/from/env");
    env::set_var(ENV_LOG_LEVEL, "warn");

    let config = ConfigResolver::new(ConfigOverrides {
        config_file: Some(path),
        output_dir: Some(PathBuf::from("/from/cli")),
        parallel: Some(false),
        log_level: Some("trace".to_string()),
        ..Default::default()
    })
    .resolve()
    .unwrap();

    assert_eq!(config.output_dir, PathBuf::from("/from/cli"));
    assert!(!config.parallel);
    assert_eq!(config.log_level, "trace");

    clear_env();
}

#[test]
#[serial]
fn test_empty_env_path_is_ignored() {
    clear_env();
    let (_dir, path) = write_config(r#"data_dir = "/from/toml""#);
    env::set_var(ENV_DATA_DIR, "");

    let config = resolve_with_file(path);

    assert_eq!(config.data_dir, PathBuf::from("/from/toml"));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_format_is_config_error() {
    clear_env();
    let (_dir, path) = write_config("");
    env::set_var(ENV_FORMAT, "xml");

    let result = ConfigResolver::new(ConfigOverrides {
        config_file: Some(path),
        ..Default::default()
    })
    .resolve();

    assert!(matches!(result, Err(Error::Config(_))));

    clear_env();
}

#[test]
#[serial]
fn test_explicit_missing_config_file_errors() {
    clear_env();
    let dir = TempDir::new().unwrap();

    let result = ConfigResolver::new(ConfigOverrides {
        config_file: Some(dir.path().join("absent.toml")),
        ..Default::default()
    })
    .resolve();

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_explicit_malformed_config_file_errors() {
    clear_env();
    let (_dir, path) = write_config("data_dir = [unterminated");

    let result = ConfigResolver::new(ConfigOverrides {
        config_file: Some(path),
        ..Default::default()
    })
    .resolve();

    assert!(matches!(result, Err(Error::Toml(_))));
}

#[test]
fn test_toml_roundtrip() {
    let config = TomlConfig {
        data_dir: Some(PathBuf::from("/music/data")),
        output_dir: None,
        format: Some(OutputFormat::Json),
        parallel: None,
        strict_keys: Some(true),
        logging: LoggingConfig {
            level: Some("debug".to_string()),
        },
    };

    let toml_str = toml::to_string(&config).unwrap();
    let parsed: TomlConfig = toml::from_str(&toml_str).unwrap();

    assert_eq!(parsed, config);
}

#[test]
fn test_missing_logging_table_deserializes_as_default() {
    let config: TomlConfig = toml::from_str(r#"format = "text""#).unwrap();
    assert_eq!(config.logging, LoggingConfig::default());
    assert_eq!(config.format, Some(OutputFormat::Text));
}

/// Point the per-user config directory at a temp dir holding `content`
///
/// Returns the temp dir, the config path and the previous XDG_CONFIG_HOME.
#[cfg(target_os = "linux")]
fn write_user_config(content: &str) -> (TempDir, PathBuf, Option<std::ffi::OsString>) {
    let dir = TempDir::new().unwrap();
    let previous = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let path = dir.path().join("mla").join("config.toml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    (dir, path, previous)
}

#[cfg(target_os = "linux")]
fn restore_xdg(previous: Option<std::ffi::OsString>) {
    match previous {
        Some(value) => env::set_var("XDG_CONFIG_HOME", value),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_user_config_file_applies_without_flag() {
    clear_env();
    let (_dir, path, previous) = write_user_config(
        r#"
        data_dir = "/from/user/config"
        strict_keys = true
        "#,
    );

    let user_path = default_config_path();
    let resolution = ConfigResolver::new(ConfigOverrides::default())
        .resolve_with_diagnostics()
        .unwrap();
    restore_xdg(previous);

    assert_eq!(user_path, Some(path.clone()));
    assert_eq!(resolution.config_file, Some(path));
    assert_eq!(resolution.config.data_dir, PathBuf::from("/from/user/config"));
    assert!(resolution.config.strict_keys);
    assert!(resolution.warnings.is_empty());
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_malformed_user_config_is_reported_and_skipped() {
    clear_env();
    let (_dir, path, previous) = write_user_config("format = [[[");

    let resolution = ConfigResolver::new(ConfigOverrides::default())
        .resolve_with_diagnostics()
        .unwrap();
    restore_xdg(previous);

    assert_eq!(resolution.config_file, None);
    assert_eq!(resolution.config.format, OutputFormat::Text);
    assert_eq!(resolution.config.data_dir, PathBuf::from("data"));
    assert_eq!(resolution.warnings.len(), 1);
    assert!(resolution.warnings[0].contains(&path.display().to_string()));
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_explicit_config_file_wins_over_user_config() {
    clear_env();
    let (_dir, _user_path, previous) = write_user_config(r#"data_dir = "/from/user/config""#);
    let (_explicit_dir, explicit_path) = write_config(r#"data_dir = "/from/explicit""#);

    let resolution = ConfigResolver::new(ConfigOverrides {
        config_file: Some(explicit_path.clone()),
        ..Default::default()
    })
    .resolve_with_diagnostics()
    .unwrap();
    restore_xdg(previous);

    assert_eq!(resolution.config_file, Some(explicit_path));
    assert_eq!(resolution.config.data_dir, PathBuf::from("/from/explicit"));
}

#[test]
#[serial]
fn test_cli_false_overrides_toml_true() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
        parallel = false
        strict_keys = true
        "#,
    );

    let config = ConfigResolver::new(ConfigOverrides {
        config_file: Some(path),
        parallel: Some(true),
        strict_keys: Some(false),
        ..Default::default()
    })
    .resolve()
    .unwrap();

    assert!(config.parallel);
    assert!(!config.strict_keys);
}
