// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Append-only edits to a pod template.
//!
//! Additions are buffered and checked for name collisions against both the
//! template and earlier additions. Nothing touches the template until
//! [`PodTemplateMutator::commit`]; dropping the mutator discards everything.

use tracing::debug;

use super::types::{Container, PodSpec, Volume, VolumeMount};
use crate::error::{ResourceKind, StagingError};

/// Counts of what a commit appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StagedChanges {
    pub volumes: usize,
    pub init_containers: usize,
    pub target_mounts: usize,
}

pub struct PodTemplateMutator<'a> {
    spec: &'a mut PodSpec,
    target: usize,
    volumes: Vec<Volume>,
    init_containers: Vec<Container>,
    target_mounts: Vec<VolumeMount>,
}

impl<'a> PodTemplateMutator<'a> {
    /// Open a mutator whose target is main container `target`.
    ///
    /// # Errors
    /// `IndexOutOfRange` if `target` is not a main container index.
    pub fn new(spec: &'a mut PodSpec, target: usize) -> Result<Self, StagingError> {
        if target >= spec.containers.len() {
            return Err(StagingError::IndexOutOfRange {
                index: target,
                len: spec.containers.len(),
            });
        }
        Ok(Self {
            spec,
            target,
            volumes: Vec::new(),
            init_containers: Vec::new(),
            target_mounts: Vec::new(),
        })
    }

    pub fn target_name(&self) -> &str {
        &self.spec.containers[self.target].name
    }

    pub fn add_volume(&mut self, volume: Volume) -> Result<(), StagingError> {
        let taken = self.spec.volume(&volume.name).is_some()
            || self.volumes.iter().any(|v| v.name == volume.name);
        if taken {
            return Err(StagingError::DuplicateResourceName {
                resource: ResourceKind::Volume,
                name: volume.name,
            });
        }
        debug!(volume = %volume.name, "staging volume");
        self.volumes.push(volume);
        Ok(())
    }

    /// Queue an init container. It runs after every init container already
    /// in the template and after those queued before it.
    pub fn add_init_container(&mut self, container: Container) -> Result<(), StagingError> {
        let taken = self.spec.has_container_named(&container.name)
            || self.init_containers.iter().any(|c| c.name == container.name);
        if taken {
            return Err(StagingError::DuplicateResourceName {
                resource: ResourceKind::InitContainer,
                name: container.name,
            });
        }
        debug!(init_container = %container.name, "staging init container");
        self.init_containers.push(container);
        Ok(())
    }

    /// Queue a mount into the target container. The mount path must not
    /// equal, contain or lie inside any mount path already in the target.
    pub fn mount_into_target(&mut self, mount: VolumeMount) -> Result<(), StagingError> {
        let container = &self.spec.containers[self.target];
        let existing = container
            .volume_mounts
            .iter()
            .chain(self.target_mounts.iter())
            .map(|m| m.mount_path.as_str());
        for path in existing {
            if trim_path(path) == trim_path(&mount.mount_path) {
                return Err(StagingError::DuplicateMountPath {
                    container: container.name.clone(),
                    path: mount.mount_path,
                });
            }
            if paths_nest(path, &mount.mount_path) {
                return Err(StagingError::OverlappingMountPath {
                    container: container.name.clone(),
                    path: mount.mount_path,
                    existing: path.to_string(),
                });
            }
        }
        debug!(
            container = %container.name,
            volume = %mount.name,
            mount_path = %mount.mount_path,
            "staging target mount"
        );
        self.target_mounts.push(mount);
        Ok(())
    }

    /// Append everything queued, in order.
    pub fn commit(self) -> StagedChanges {
        let changes = StagedChanges {
            volumes: self.volumes.len(),
            init_containers: self.init_containers.len(),
            target_mounts: self.target_mounts.len(),
        };
        self.spec.volumes.extend(self.volumes);
        self.spec.init_containers.extend(self.init_containers);
        self.spec.containers[self.target]
            .volume_mounts
            .extend(self.target_mounts);
        changes
    }
}

fn trim_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// True if one path is a proper ancestor of the other, compared on whole
/// segments: `/a` nests `/a/b` but not `/ab`.
fn paths_nest(a: &str, b: &str) -> bool {
    let (a, b) = (trim_path(a), trim_path(b));
    let is_under = |child: &str, parent: &str| {
        child.len() > parent.len()
            && child.starts_with(parent)
            && (parent == "/" || child.as_bytes()[parent.len()] == b'/')
    };
    is_under(a, b) || is_under(b, a)
}

#[cfg(test)]
#[path = "mutator_tests.rs"]
mod tests;
