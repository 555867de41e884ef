// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Result document of `ctx-stage plan`.

use serde::{Deserialize, Serialize};

use crate::context::ContextSpec;
use crate::error::StagingError;
use crate::k8s::validation::validate_env_name;
use crate::k8s::PodSpec;

use super::planner::ContextStagingPlanner;

/// `{"contextPath": ..., "podSpec": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    pub context_path: String,
    pub pod_spec: PodSpec,
}

impl PlanOutput {
    /// Stage `context` into `template` for main container `target`. With
    /// `env_var`, the target container also gets that variable set to the
    /// context path.
    ///
    /// # Errors
    /// Any planning error, or `InvalidContext` for a bad variable name. No
    /// output is produced on error.
    pub fn build(
        planner: &ContextStagingPlanner,
        context: &ContextSpec,
        mut template: PodSpec,
        target: usize,
        env_var: Option<&str>,
    ) -> Result<Self, StagingError> {
        if let Some(name) = env_var {
            validate_env_name(name, "env")?;
        }

        let context_path = planner.plan_spec(context, &mut template, target)?;
        if let Some(name) = env_var {
            // plan_spec has already checked the index.
            if let Some(container) = template.containers.get_mut(target) {
                container.set_env(name, context_path.as_str());
            }
        }

        Ok(Self {
            context_path,
            pod_spec: template,
        })
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
