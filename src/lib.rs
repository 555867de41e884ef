// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! ctx-stage - build context staging for Kubernetes build pods.
//!
//! Given a build context (git repository, config map, HTTP archive or rclone
//! remote) and a pod template, the planner appends the volumes, mounts and
//! init containers that materialize the context on disk before the build
//! container starts, and returns the path the build container reads it from.
//!
//! ```no_run
//! use ctx_stage::context::GitContext;
//! use ctx_stage::k8s::{Container, PodSpec};
//! use ctx_stage::{ContextStagingPlanner, StagingConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = ContextStagingPlanner::new(StagingConfig::default())?;
//! let mut pod = PodSpec {
//!     containers: vec![Container::new("build", "moby/buildkit:latest")],
//!     ..Default::default()
//! };
//! let context = GitContext::new("https://github.com/example/app.git")?.with_revision("main")?;
//! let path = planner.plan(&context.into(), &mut pod, 0)?;
//! assert_eq!(path, "/ctx-git/context");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod k8s;
pub mod logging;
pub mod path_guard;
pub mod staging;

pub use config::{ConfigError, HelperConfig, LogConfig, StagingConfig};
pub use context::{ContextDescriptor, ContextKind, ContextSpec};
pub use error::{ResourceKind, StagingError};
pub use path_guard::{resolve, resolve_in_filesystem, EscapeReason, PathEscapeError};
pub use staging::{ContextStagingPlanner, PlanOutput, StagingStrategy, DEFAULT_STRATEGIES};
