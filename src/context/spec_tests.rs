// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for the stored context form.

use super::*;

fn parse(json: &str) -> ContextSpec {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_git_spec_conversion() {
    let spec = parse(
        r#"{
            "kind": "Git",
            "git": {
                "url": "git@github.com:example/app.git",
                "revision": "main",
                "subPath": "web",
                "sshSecretRef": {"name": "deploy-key"}
            }
        }"#,
    );

    match spec.into_descriptor().unwrap() {
        ContextDescriptor::Git(git) => {
            assert_eq!(git.url(), "git@github.com:example/app.git");
            assert_eq!(git.revision(), Some("main"));
            assert_eq!(git.sub_path(), Some("web"));
            assert_eq!(git.ssh_secret_ref().unwrap().name(), "deploy-key");
        }
        other => panic!("unexpected descriptor: {:?}", other),
    }
}

#[test]
fn test_zero_value_fields_are_absent() {
    let spec = parse(
        r#"{
            "kind": "Git",
            "git": {"url": "https://example.com/r.git", "revision": "", "subPath": "", "sshSecretRef": {"name": ""}},
            "configMapRef": {"name": ""}
        }"#,
    );

    match spec.into_descriptor().unwrap() {
        ContextDescriptor::Git(git) => {
            assert!(git.revision().is_none());
            assert!(git.sub_path().is_none());
            assert!(git.ssh_secret_ref().is_none());
        }
        other => panic!("unexpected descriptor: {:?}", other),
    }
}

#[test]
fn test_config_map_spec_conversion() {
    let spec = parse(r#"{"kind": "ConfigMap", "configMapRef": {"name": "app-source"}}"#);
    let descriptor = ContextDescriptor::try_from(spec).unwrap();
    assert_eq!(descriptor.kind(), ContextKind::ConfigMap);
}

#[test]
fn test_http_spec_conversion() {
    let spec = parse(
        r#"{"kind": "HTTP", "http": {"url": "https://example.com/src.tar.gz", "subPath": "app"}}"#,
    );
    match spec.into_descriptor().unwrap() {
        ContextDescriptor::Http(http) => assert_eq!(http.sub_path(), Some("app")),
        other => panic!("unexpected descriptor: {:?}", other),
    }
}

#[test]
fn test_rclone_spec_conversion() {
    let spec = parse(
        r#"{
            "kind": "Rclone",
            "rclone": {
                "remote": "sftp",
                "path": "srv/app",
                "secretRef": {"name": "rclone-conf"},
                "sshSecretRef": {"name": "sftp-key"}
            }
        }"#,
    );
    match spec.into_descriptor().unwrap() {
        ContextDescriptor::Rclone(rclone) => {
            assert_eq!(rclone.source(), "sftp:srv/app");
            assert_eq!(rclone.ssh_secret_ref().unwrap().name(), "sftp-key");
        }
        other => panic!("unexpected descriptor: {:?}", other),
    }
}

#[test]
fn test_unknown_kind_is_unsupported() {
    let spec = parse(r#"{"kind": "S3"}"#);
    assert_eq!(
        spec.into_descriptor().unwrap_err(),
        StagingError::UnsupportedContextKind("S3".to_string())
    );
}

#[test]
fn test_kind_is_case_sensitive() {
    let spec = parse(r#"{"kind": "git", "git": {"url": "https://example.com/r.git"}}"#);
    assert!(matches!(
        spec.into_descriptor(),
        Err(StagingError::UnsupportedContextKind(_))
    ));
}

#[test]
fn test_missing_section_is_invalid() {
    let spec = parse(r#"{"kind": "Git"}"#);
    assert!(matches!(
        spec.into_descriptor(),
        Err(StagingError::InvalidContext(ValidationError::EmptyField(_)))
    ));

    let spec = parse(r#"{"kind": "Rclone", "rclone": {"remote": "s3", "path": "b"}}"#);
    assert_eq!(
        spec.into_descriptor().unwrap_err(),
        StagingError::InvalidContext(ValidationError::EmptyField("rclone.secretRef".to_string()))
    );
}

#[test]
fn test_absolute_sub_path_is_invalid() {
    let spec = parse(r#"{"kind": "HTTP", "http": {"url": "https://e.com/a.tar", "subPath": "/etc"}}"#);
    assert!(matches!(
        spec.into_descriptor(),
        Err(StagingError::InvalidContext(ValidationError::AbsolutePath(_)))
    ));
}

#[test]
fn test_serialization_omits_unset_sections() {
    let spec = ContextSpec {
        kind: "ConfigMap".to_string(),
        config_map_ref: Some(LocalObjectReference {
            name: "src".to_string(),
        }),
        ..Default::default()
    };
    let json = serde_json::to_value(&spec).unwrap();
    assert_eq!(json["configMapRef"]["name"], "src");
    assert!(json.get("git").is_none());
}
