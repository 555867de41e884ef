// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Context staging: one strategy per context kind and the planner that
//! dispatches between them.

pub mod config_map;
mod fetch;
pub mod git;
pub mod http;
pub mod output;
pub mod planner;
pub mod rclone;
pub mod strategy;

pub use config_map::ConfigMapStrategy;
pub use git::GitStrategy;
pub use http::HttpStrategy;
pub use output::PlanOutput;
pub use planner::ContextStagingPlanner;
pub use rclone::RcloneStrategy;
pub use strategy::{StagingStrategy, CONTEXT_SUBDIR, DEFAULT_STRATEGIES};
