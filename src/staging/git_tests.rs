// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for repository staging.

use super::*;
use crate::context::{GitContext, HttpContext};
use crate::k8s::{Container, PodSpec, VolumeSource, SECRET_DEFAULT_MODE};

fn template() -> PodSpec {
    PodSpec {
        containers: vec![Container::new("build", "builder:1")],
        ..Default::default()
    }
}

fn stage(descriptor: &ContextDescriptor, spec: &mut PodSpec) -> Result<String, StagingError> {
    let config = StagingConfig::default();
    let mut mutator = PodTemplateMutator::new(spec, 0)?;
    let path = GitStrategy.stage(descriptor, &config, &mut mutator)?;
    mutator.commit();
    Ok(path)
}

#[test]
fn test_git_layout() {
    let descriptor: ContextDescriptor = GitContext::new("https://github.com/example/app.git")
        .unwrap()
        .with_revision("v2")
        .unwrap()
        .into();
    let mut spec = template();

    let path = stage(&descriptor, &mut spec).unwrap();
    assert_eq!(path, "/ctx-git/context");

    assert_eq!(spec.volumes.len(), 1);
    assert!(matches!(spec.volumes[0].source, VolumeSource::EmptyDir(_)));

    let init = spec.init_container("ctx-git-init").unwrap();
    assert_eq!(init.image, crate::config::DEFAULT_HELPER_IMAGE);
    assert_eq!(
        init.args,
        [
            "populate-git",
            "https://github.com/example/app.git",
            "/ctx-git/context",
            "--revision",
            "v2"
        ]
    );
    assert_eq!(init.mount("ctx-git").unwrap().mount_path, "/ctx-git");
    assert_eq!(spec.containers[0].mount("ctx-git").unwrap().mount_path, "/ctx-git");
}

#[test]
fn test_git_without_revision_omits_flag() {
    let descriptor: ContextDescriptor = GitContext::new("https://github.com/example/app.git")
        .unwrap()
        .into();
    let mut spec = template();
    stage(&descriptor, &mut spec).unwrap();

    let init = &spec.init_containers[0];
    assert_eq!(init.args.len(), 3);
    assert!(!init.args.iter().any(|a| a == "--revision"));
}

#[test]
fn test_git_sub_path() {
    let descriptor: ContextDescriptor = GitContext::new("https://github.com/example/app.git")
        .unwrap()
        .with_sub_path("services/api")
        .unwrap()
        .into();
    let mut spec = template();

    let path = stage(&descriptor, &mut spec).unwrap();
    assert_eq!(path, "/ctx-git/context/services/api");
    // the helper still clones the whole repository
    assert_eq!(spec.init_containers[0].args[2], "/ctx-git/context");
}

#[test]
fn test_git_sub_path_escape() {
    let descriptor: ContextDescriptor = GitContext::new("https://github.com/example/app.git")
        .unwrap()
        .with_sub_path("a/../../..")
        .unwrap()
        .into();
    let mut spec = template();

    let err = stage(&descriptor, &mut spec).unwrap_err();
    assert!(matches!(err, StagingError::PathEscape(_)));
    assert!(spec.volumes.is_empty());
    assert!(spec.init_containers.is_empty());
}

#[test]
fn test_git_ssh_secret_mounted_in_init_only() {
    let descriptor: ContextDescriptor = GitContext::new("git@github.com:example/app.git")
        .unwrap()
        .with_ssh_secret("deploy-key")
        .unwrap()
        .into();
    let mut spec = template();
    stage(&descriptor, &mut spec).unwrap();

    assert_eq!(spec.volumes.len(), 2);
    match &spec.volume("ctx-git-ssh").unwrap().source {
        VolumeSource::Secret(secret) => {
            assert_eq!(secret.secret_name, "deploy-key");
            assert_eq!(secret.default_mode, Some(SECRET_DEFAULT_MODE));
        }
        other => panic!("unexpected source: {:?}", other),
    }

    let init = &spec.init_containers[0];
    let ssh = init.mount("ctx-git-ssh").unwrap();
    assert_eq!(ssh.mount_path, "/root/.ssh");
    assert!(ssh.read_only);
    assert!(spec.containers[0].mount("ctx-git-ssh").is_none());
}

#[test]
fn test_git_ssh_mount_follows_helper_home() {
    let descriptor: ContextDescriptor = GitContext::new("git@github.com:example/app.git")
        .unwrap()
        .with_ssh_secret("deploy-key")
        .unwrap()
        .into();
    let mut config = StagingConfig::default();
    config.helper.home_dir = "/home/helper/".to_string();
    let mut spec = template();
    let mut mutator = PodTemplateMutator::new(&mut spec, 0).unwrap();
    GitStrategy.stage(&descriptor, &config, &mut mutator).unwrap();
    mutator.commit();

    let ssh = spec.init_containers[0].mount("ctx-git-ssh").unwrap();
    assert_eq!(ssh.mount_path, "/home/helper/.ssh");
}

#[test]
fn test_git_strategy_rejects_other_kinds() {
    let descriptor: ContextDescriptor = HttpContext::new("https://example.com/a.tar").unwrap().into();
    let mut spec = template();
    let err = stage(&descriptor, &mut spec).unwrap_err();
    assert_eq!(
        err,
        StagingError::KindMismatch {
            expected: ContextKind::Git,
            actual: ContextKind::Http
        }
    );
}
