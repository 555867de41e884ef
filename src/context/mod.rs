// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Build context descriptors.
//!
//! A descriptor says what to fetch. [`ContextDescriptor`] is the validated
//! form the planner consumes; [`ContextSpec`] is the loosely-typed form stored
//! in the build job record.

pub mod descriptor;
pub mod spec;

pub use descriptor::{
    ConfigMapContext, ContextDescriptor, ContextKind, GitContext, HttpContext, ObjectRef,
    RcloneContext,
};
pub use spec::{ContextSpec, GitSpec, HttpSpec, LocalObjectReference, RcloneSpec};
