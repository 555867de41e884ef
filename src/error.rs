// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Errors returned by the staging planner.
//!
//! None of these are retried internally. The template passed to a failed
//! call is left exactly as it was.

use thiserror::Error;

use crate::context::ContextKind;
use crate::k8s::ValidationError;
use crate::path_guard::PathEscapeError;

/// Pod template entry kinds that must have unique names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Volume,
    InitContainer,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Volume => write!(f, "volume"),
            ResourceKind::InitContainer => write!(f, "init container"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StagingError {
    #[error(transparent)]
    PathEscape(#[from] PathEscapeError),

    #[error("Unsupported context kind: {0}")]
    UnsupportedContextKind(String),

    #[error("Target container index {index} out of range ({len} containers)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Duplicate {resource} name: {name}")]
    DuplicateResourceName { resource: ResourceKind, name: String },

    #[error("Mount path {path} already used in container {container}")]
    DuplicateMountPath { container: String, path: String },

    #[error("Mount path {path} overlaps {existing} in container {container}")]
    OverlappingMountPath {
        container: String,
        path: String,
        existing: String,
    },

    #[error("Invalid context: {0}")]
    InvalidContext(#[from] ValidationError),

    #[error("Strategy for {expected} contexts received a {actual} context")]
    KindMismatch {
        expected: ContextKind,
        actual: ContextKind,
    },
}

impl StagingError {
    /// Short, stable label for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            StagingError::PathEscape(_) => "path_escape",
            StagingError::UnsupportedContextKind(_) => "unsupported_kind",
            StagingError::IndexOutOfRange { .. } => "index_out_of_range",
            StagingError::DuplicateResourceName { .. } => "duplicate_name",
            StagingError::DuplicateMountPath { .. } => "duplicate_mount_path",
            StagingError::OverlappingMountPath { .. } => "overlapping_mount_path",
            StagingError::InvalidContext(_) => "invalid_context",
            StagingError::KindMismatch { .. } => "kind_mismatch",
        }
    }
}
