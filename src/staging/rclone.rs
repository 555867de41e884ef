// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Remote mount contexts: `populate-rclone <remote>:<path> <dir>`.
//!
//! The rclone config secret lands in `~/.config/rclone`. SFTP remotes may
//! also need key material, which goes to the legacy `~/.ssh.OLD`.

use crate::config::StagingConfig;
use crate::context::{ContextDescriptor, ContextKind};
use crate::error::StagingError;
use crate::k8s::PodTemplateMutator;

use super::fetch::{stage_fetch, CredentialMount, FetchLayout};
use super::strategy::{kind_mismatch, StagingStrategy};

pub struct RcloneStrategy;

impl StagingStrategy for RcloneStrategy {
    fn kind(&self) -> ContextKind {
        ContextKind::Rclone
    }

    fn stage(
        &self,
        descriptor: &ContextDescriptor,
        config: &StagingConfig,
        mutator: &mut PodTemplateMutator<'_>,
    ) -> Result<String, StagingError> {
        let ContextDescriptor::Rclone(rclone) = descriptor else {
            return Err(kind_mismatch(ContextKind::Rclone, descriptor));
        };

        let mut credentials = vec![CredentialMount {
            suffix: "config",
            secret: rclone.secret_ref(),
            home_subdir: ".config/rclone",
        }];
        if let Some(secret) = rclone.ssh_secret_ref() {
            credentials.push(CredentialMount {
                suffix: "ssh",
                secret,
                home_subdir: ".ssh.OLD",
            });
        }

        let layout = FetchLayout {
            tag: "rclone",
            sub_path: None,
            credentials,
        };

        stage_fetch(layout, config, mutator, |context_path| {
            vec![
                "populate-rclone".to_string(),
                rclone.source(),
                context_path.to_string(),
            ]
        })
    }
}
