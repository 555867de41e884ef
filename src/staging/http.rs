// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Remote archive contexts: `populate-http <url> <dir>` downloads and
//! unpacks a tar (or tar+gz) archive.

use crate::config::StagingConfig;
use crate::context::{ContextDescriptor, ContextKind};
use crate::error::StagingError;
use crate::k8s::PodTemplateMutator;

use super::fetch::{stage_fetch, FetchLayout};
use super::strategy::{kind_mismatch, StagingStrategy};

pub struct HttpStrategy;

impl StagingStrategy for HttpStrategy {
    fn kind(&self) -> ContextKind {
        ContextKind::Http
    }

    fn stage(
        &self,
        descriptor: &ContextDescriptor,
        config: &StagingConfig,
        mutator: &mut PodTemplateMutator<'_>,
    ) -> Result<String, StagingError> {
        let ContextDescriptor::Http(http) = descriptor else {
            return Err(kind_mismatch(ContextKind::Http, descriptor));
        };

        let layout = FetchLayout {
            tag: "http",
            sub_path: http.sub_path(),
            credentials: Vec::new(),
        };

        stage_fetch(layout, config, mutator, |context_path| {
            vec![
                "populate-http".to_string(),
                http.url().to_string(),
                context_path.to_string(),
            ]
        })
    }
}
