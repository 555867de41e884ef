// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config map contexts.
//!
//! Kubernetes projects config map keys as symlinks into a hidden timestamped
//! directory. The raw volume is therefore only visible to an init container,
//! which copies it with `cp -rL` into a plain emptyDir; the target container
//! sees only the dereferenced copy.

use tracing::debug;

use crate::config::StagingConfig;
use crate::context::{ContextDescriptor, ContextKind};
use crate::error::StagingError;
use crate::k8s::{Container, PodTemplateMutator, Volume, VolumeMount};
use crate::path_guard::resolve;

use super::strategy::{kind_mismatch, resource_name, StagingStrategy, CONTEXT_SUBDIR};

pub struct ConfigMapStrategy;

impl StagingStrategy for ConfigMapStrategy {
    fn kind(&self) -> ContextKind {
        ContextKind::ConfigMap
    }

    fn stage(
        &self,
        descriptor: &ContextDescriptor,
        config: &StagingConfig,
        mutator: &mut PodTemplateMutator<'_>,
    ) -> Result<String, StagingError> {
        let ContextDescriptor::ConfigMap(config_map) = descriptor else {
            return Err(kind_mismatch(ContextKind::ConfigMap, descriptor));
        };
        let prefix = &config.resource_prefix;

        let raw_name = resource_name(prefix, "configmap", Some("raw"));
        let raw_mount_path = resolve("/", &raw_name)?;
        let volume_name = resource_name(prefix, "configmap", None);
        let mount_path = resolve("/", &volume_name)?;
        let context_path = resolve(&mount_path, CONTEXT_SUBDIR)?;

        debug!(
            config_map = config_map.config_map_ref().name(),
            "staging config map through dereferencing copy"
        );

        mutator.add_volume(Volume::config_map(
            &raw_name,
            config_map.config_map_ref().name(),
        ))?;
        mutator.add_volume(Volume::empty_dir(&volume_name))?;
        mutator.mount_into_target(VolumeMount::new(&volume_name, &mount_path))?;

        mutator.add_init_container(Container {
            name: resource_name(prefix, "configmap", Some("init")),
            image: config.helper.image.clone(),
            command: vec![
                "cp".to_string(),
                "-rL".to_string(),
                raw_mount_path.clone(),
                context_path.clone(),
            ],
            volume_mounts: vec![
                VolumeMount::new(&volume_name, &mount_path),
                VolumeMount::new(&raw_name, &raw_mount_path).read_only(),
            ],
            ..Default::default()
        })?;

        Ok(context_path)
    }
}

#[cfg(test)]
#[path = "config_map_tests.rs"]
mod tests;
