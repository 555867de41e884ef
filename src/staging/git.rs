// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Repository contexts.
//!
//! The helper clones recursively and non-interactively:
//! `populate-git <url> <dir> [--revision <rev>]`. Without a revision the
//! remote's default branch is checked out.

use crate::config::StagingConfig;
use crate::context::{ContextDescriptor, ContextKind};
use crate::error::StagingError;
use crate::k8s::PodTemplateMutator;

use super::fetch::{stage_fetch, CredentialMount, FetchLayout};
use super::strategy::{kind_mismatch, StagingStrategy};

pub struct GitStrategy;

impl StagingStrategy for GitStrategy {
    fn kind(&self) -> ContextKind {
        ContextKind::Git
    }

    fn stage(
        &self,
        descriptor: &ContextDescriptor,
        config: &StagingConfig,
        mutator: &mut PodTemplateMutator<'_>,
    ) -> Result<String, StagingError> {
        let ContextDescriptor::Git(git) = descriptor else {
            return Err(kind_mismatch(ContextKind::Git, descriptor));
        };

        let credentials = git
            .ssh_secret_ref()
            .map(|secret| CredentialMount {
                suffix: "ssh",
                secret,
                home_subdir: ".ssh",
            })
            .into_iter()
            .collect();

        let layout = FetchLayout {
            tag: "git",
            sub_path: git.sub_path(),
            credentials,
        };

        stage_fetch(layout, config, mutator, |context_path| {
            let mut args = vec![
                "populate-git".to_string(),
                git.url().to_string(),
                context_path.to_string(),
            ];
            if let Some(revision) = git.revision() {
                args.push("--revision".to_string());
                args.push(revision.to_string());
            }
            args
        })
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
