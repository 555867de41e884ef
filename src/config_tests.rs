// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for planner configuration.

use std::collections::HashMap;
use std::io::Write;

use super::*;

#[test]
fn test_defaults_are_valid() {
    let config = StagingConfig::default();
    assert_eq!(config.helper.image, DEFAULT_HELPER_IMAGE);
    assert_eq!(config.helper.home_dir, "/root");
    assert_eq!(config.resource_prefix, "ctx");
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = StagingConfig::from_toml_str(
        r#"
        resource_prefix = "build"

        [helper]
        image = "registry.example.com/helper:1.2"
        "#,
    )
    .unwrap();
    assert_eq!(config.resource_prefix, "build");
    assert_eq!(config.helper.image, "registry.example.com/helper:1.2");
    assert_eq!(config.helper.home_dir, DEFAULT_HELPER_HOME);
    assert!(!config.log.json);
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let err = StagingConfig::from_toml_str("resource_prefix = [").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[helper]\nhome_dir = \"/home/builder\"").unwrap();
    let config = StagingConfig::from_file(file.path()).unwrap();
    assert_eq!(config.helper.home_dir, "/home/builder");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = StagingConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_overrides() {
    let env: HashMap<&str, &str> = [
        (ENV_HELPER_IMAGE, "helper:2"),
        (ENV_HELPER_HOME, "/home/helper"),
        (ENV_RESOURCE_PREFIX, "stage"),
        (ENV_LOG_JSON, "true"),
    ]
    .into_iter()
    .collect();

    let mut config = StagingConfig::default();
    config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.helper.image, "helper:2");
    assert_eq!(config.helper.home_dir, "/home/helper");
    assert_eq!(config.resource_prefix, "stage");
    assert!(config.log.json);
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = StagingConfig::default();
    config.helper.home_dir = "relative".to_string();
    assert!(config.validate().is_err());

    let mut config = StagingConfig::default();
    config.resource_prefix = "Bad_Prefix".to_string();
    assert!(matches!(
        config.validate(),
        Err(ValidationError::InvalidName(_))
    ));

    let mut config = StagingConfig::default();
    config.resource_prefix = "a".repeat(41);
    assert!(matches!(
        config.validate(),
        Err(ValidationError::MaxLengthExceeded { .. })
    ));

    let mut config = StagingConfig::default();
    config.helper.image = "helper:1 && curl".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_toml_round_trip_of_defaults() {
    let config = StagingConfig::default();
    let text = config.to_toml().unwrap();
    assert_eq!(StagingConfig::from_toml_str(&text).unwrap(), config);
}
