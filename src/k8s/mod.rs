// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes pod template types.
//!
//! Defines the pod template subset the planner edits, the validation rules
//! for names and paths placed in it, and the append-only mutator.

pub mod mutator;
pub mod types;
pub mod validation;

pub use mutator::{PodTemplateMutator, StagedChanges};
pub use types::{
    ConfigMapVolumeSource, Container, EmptyDirVolumeSource, EnvVar, ExtraFields,
    PersistentVolumeClaimVolumeSource, PodSpec, SecretVolumeSource, Volume, VolumeMount,
    VolumeSource, SECRET_DEFAULT_MODE,
};
pub use validation::ValidationError;
