// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! The staging strategy seam and the built-in strategy table.

use crate::config::StagingConfig;
use crate::context::{ContextDescriptor, ContextKind};
use crate::error::StagingError;
use crate::k8s::PodTemplateMutator;

use super::config_map::ConfigMapStrategy;
use super::git::GitStrategy;
use super::http::HttpStrategy;
use super::rclone::RcloneStrategy;

/// Subdirectory of a staging volume that receives the fetched tree.
pub const CONTEXT_SUBDIR: &str = "context";

/// Stages one kind of context into a pod template.
pub trait StagingStrategy: Send + Sync {
    fn kind(&self) -> ContextKind;

    /// Queue the volumes, mounts and init containers for `descriptor` and
    /// return the path the target container will read the context from.
    fn stage(
        &self,
        descriptor: &ContextDescriptor,
        config: &StagingConfig,
        mutator: &mut PodTemplateMutator<'_>,
    ) -> Result<String, StagingError>;
}

/// One strategy per context kind.
pub static DEFAULT_STRATEGIES: &[&dyn StagingStrategy] = &[
    &GitStrategy,
    &ConfigMapStrategy,
    &HttpStrategy,
    &RcloneStrategy,
];

/// `<prefix>-<tag>` or `<prefix>-<tag>-<suffix>`.
pub(crate) fn resource_name(prefix: &str, tag: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{}-{}-{}", prefix, tag, suffix),
        None => format!("{}-{}", prefix, tag),
    }
}

pub(crate) fn kind_mismatch(expected: ContextKind, descriptor: &ContextDescriptor) -> StagingError {
    StagingError::KindMismatch {
        expected,
        actual: descriptor.kind(),
    }
}
