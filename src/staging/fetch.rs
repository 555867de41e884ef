// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared layout of the fetching strategies (Git, HTTP, Rclone).
//!
//! One emptyDir volume mounted at `/<name>` in both the target container and
//! a single helper init container that fetches into `/<name>/context`.
//! Credentials are secret volumes mounted read-only beneath the helper's home
//! directory, in the init container only.

use tracing::debug;

use crate::config::StagingConfig;
use crate::context::ObjectRef;
use crate::error::StagingError;
use crate::k8s::{Container, PodTemplateMutator, Volume, VolumeMount};
use crate::path_guard::resolve;

use super::strategy::{resource_name, CONTEXT_SUBDIR};

/// A secret to expose to the fetching init container.
pub(crate) struct CredentialMount<'a> {
    /// Volume name suffix, e.g. `ssh`.
    pub suffix: &'static str,
    pub secret: &'a ObjectRef,
    /// Mount point relative to the helper's home directory.
    pub home_subdir: &'static str,
}

pub(crate) struct FetchLayout<'a> {
    /// Kind tag used in resource names, e.g. `git`.
    pub tag: &'static str,
    pub sub_path: Option<&'a str>,
    pub credentials: Vec<CredentialMount<'a>>,
}

/// Stage a fetch described by `layout`. `args` receives the directory the
/// helper must populate and returns the helper's arguments.
pub(crate) fn stage_fetch<F>(
    layout: FetchLayout<'_>,
    config: &StagingConfig,
    mutator: &mut PodTemplateMutator<'_>,
    args: F,
) -> Result<String, StagingError>
where
    F: FnOnce(&str) -> Vec<String>,
{
    let volume_name = resource_name(&config.resource_prefix, layout.tag, None);
    let mount_path = resolve("/", &volume_name)?;
    let context_path = resolve(&mount_path, CONTEXT_SUBDIR)?;
    let content_path = match layout.sub_path {
        Some(sub_path) => resolve(&context_path, sub_path)?,
        None => context_path.clone(),
    };

    mutator.add_volume(Volume::empty_dir(&volume_name))?;
    mutator.mount_into_target(VolumeMount::new(&volume_name, &mount_path))?;

    let mut init = Container {
        name: resource_name(&config.resource_prefix, layout.tag, Some("init")),
        image: config.helper.image.clone(),
        args: args(&context_path),
        volume_mounts: vec![VolumeMount::new(&volume_name, &mount_path)],
        ..Default::default()
    };

    for credential in layout.credentials {
        let secret_volume = resource_name(
            &config.resource_prefix,
            layout.tag,
            Some(credential.suffix),
        );
        let secret_path = resolve(&config.helper.home_dir, credential.home_subdir)?;
        debug!(
            secret = credential.secret.name(),
            mount_path = %secret_path,
            "mounting credential into init container"
        );
        mutator.add_volume(Volume::secret(&secret_volume, credential.secret.name()))?;
        init.volume_mounts
            .push(VolumeMount::new(secret_volume, secret_path).read_only());
    }

    mutator.add_init_container(init)?;
    Ok(content_path)
}
