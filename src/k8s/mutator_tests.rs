// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for the pod template mutator.

use super::*;

fn template() -> PodSpec {
    PodSpec {
        init_containers: vec![Container::new("prepare", "busybox")],
        containers: vec![
            Container::new("build", "builder:1"),
            Container::new("sidecar", "logger:1"),
        ],
        volumes: vec![Volume::empty_dir("cache")],
        ..Default::default()
    }
}

#[test]
fn test_index_out_of_range() {
    let mut spec = template();
    let err = PodTemplateMutator::new(&mut spec, 2).err().unwrap();
    assert_eq!(err, StagingError::IndexOutOfRange { index: 2, len: 2 });
}

#[test]
fn test_empty_template_has_no_valid_index() {
    let mut spec = PodSpec::default();
    assert!(PodTemplateMutator::new(&mut spec, 0).is_err());
}

#[test]
fn test_commit_appends_in_order() {
    let mut spec = template();
    let mut mutator = PodTemplateMutator::new(&mut spec, 1).unwrap();
    assert_eq!(mutator.target_name(), "sidecar");

    mutator.add_volume(Volume::empty_dir("a")).unwrap();
    mutator.add_volume(Volume::empty_dir("b")).unwrap();
    mutator.add_init_container(Container::new("first", "img")).unwrap();
    mutator.add_init_container(Container::new("second", "img")).unwrap();
    mutator.mount_into_target(VolumeMount::new("a", "/a")).unwrap();
    let changes = mutator.commit();

    assert_eq!(
        changes,
        StagedChanges {
            volumes: 2,
            init_containers: 2,
            target_mounts: 1
        }
    );
    let volume_names: Vec<_> = spec.volumes.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(volume_names, ["cache", "a", "b"]);
    let init_names: Vec<_> = spec.init_containers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(init_names, ["prepare", "first", "second"]);
    assert!(spec.containers[0].volume_mounts.is_empty());
    assert_eq!(spec.containers[1].volume_mounts[0].mount_path, "/a");
}

#[test]
fn test_drop_without_commit_leaves_template_untouched() {
    let mut spec = template();
    let before = spec.clone();
    {
        let mut mutator = PodTemplateMutator::new(&mut spec, 0).unwrap();
        mutator.add_volume(Volume::empty_dir("a")).unwrap();
        mutator.add_init_container(Container::new("fetch", "img")).unwrap();
        mutator.mount_into_target(VolumeMount::new("a", "/a")).unwrap();
    }
    assert_eq!(spec, before);
}

#[test]
fn test_duplicate_volume_against_template() {
    let mut spec = template();
    let mut mutator = PodTemplateMutator::new(&mut spec, 0).unwrap();
    let err = mutator.add_volume(Volume::empty_dir("cache")).unwrap_err();
    assert_eq!(
        err,
        StagingError::DuplicateResourceName {
            resource: ResourceKind::Volume,
            name: "cache".to_string()
        }
    );
}

#[test]
fn test_duplicate_volume_against_pending() {
    let mut spec = template();
    let mut mutator = PodTemplateMutator::new(&mut spec, 0).unwrap();
    mutator.add_volume(Volume::empty_dir("a")).unwrap();
    assert!(mutator.add_volume(Volume::secret("a", "key")).is_err());
}

#[test]
fn test_init_container_name_clashes_with_any_container() {
    let mut spec = template();
    let mut mutator = PodTemplateMutator::new(&mut spec, 0).unwrap();
    for name in ["prepare", "build", "sidecar"] {
        let err = mutator
            .add_init_container(Container::new(name, "img"))
            .unwrap_err();
        assert!(matches!(
            err,
            StagingError::DuplicateResourceName {
                resource: ResourceKind::InitContainer,
                ..
            }
        ));
    }
}

#[test]
fn test_duplicate_mount_path_in_target() {
    let mut spec = template();
    spec.containers[0]
        .volume_mounts
        .push(VolumeMount::new("cache", "/cache"));
    let mut mutator = PodTemplateMutator::new(&mut spec, 0).unwrap();
    let err = mutator
        .mount_into_target(VolumeMount::new("other", "/cache"))
        .unwrap_err();
    assert_eq!(
        err,
        StagingError::DuplicateMountPath {
            container: "build".to_string(),
            path: "/cache".to_string()
        }
    );
}

#[test]
fn test_duplicate_mount_path_ignores_trailing_slash() {
    let mut spec = template();
    spec.containers[0]
        .volume_mounts
        .push(VolumeMount::new("cache", "/cache/"));
    let mut mutator = PodTemplateMutator::new(&mut spec, 0).unwrap();
    assert!(matches!(
        mutator.mount_into_target(VolumeMount::new("other", "/cache")),
        Err(StagingError::DuplicateMountPath { .. })
    ));
}

#[test]
fn test_nested_mount_paths_rejected() {
    let mut spec = template();
    spec.containers[0]
        .volume_mounts
        .push(VolumeMount::new("cache", "/ctx-git/context"));
    let mut mutator = PodTemplateMutator::new(&mut spec, 0).unwrap();

    let err = mutator
        .mount_into_target(VolumeMount::new("ctx-git", "/ctx-git"))
        .unwrap_err();
    assert_eq!(
        err,
        StagingError::OverlappingMountPath {
            container: "build".to_string(),
            path: "/ctx-git".to_string(),
            existing: "/ctx-git/context".to_string(),
        }
    );

    let err = mutator
        .mount_into_target(VolumeMount::new("deeper", "/ctx-git/context/src"))
        .unwrap_err();
    assert!(matches!(err, StagingError::OverlappingMountPath { .. }));
}

#[test]
fn test_nested_against_pending_mount() {
    let mut spec = template();
    let mut mutator = PodTemplateMutator::new(&mut spec, 0).unwrap();
    mutator.mount_into_target(VolumeMount::new("a", "/a")).unwrap();
    assert!(mutator
        .mount_into_target(VolumeMount::new("b", "/a/b"))
        .is_err());
}

#[test]
fn test_sibling_prefix_is_not_nested() {
    let mut spec = template();
    spec.containers[0]
        .volume_mounts
        .push(VolumeMount::new("cache", "/ctx"));
    let mut mutator = PodTemplateMutator::new(&mut spec, 0).unwrap();
    mutator
        .mount_into_target(VolumeMount::new("ctx-git", "/ctx-git"))
        .unwrap();
    assert_eq!(mutator.commit().target_mounts, 1);
}

#[test]
fn test_root_mount_overlaps_everything() {
    assert!(paths_nest("/", "/ctx-git"));
    assert!(paths_nest("/ctx-git/", "/ctx-git/context"));
    assert!(!paths_nest("/ctx", "/ctx-git"));
    assert!(!paths_nest("/a", "/a/"));
}
