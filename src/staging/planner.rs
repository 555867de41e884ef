// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Context staging planner.
//!
//! Picks the strategy for a descriptor's kind and applies it to a pod
//! template. Planning is a pure transformation: it never fetches anything, it
//! only describes the init containers that will.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::StagingConfig;
use crate::context::{ContextDescriptor, ContextKind, ContextSpec};
use crate::error::StagingError;
use crate::k8s::{PodSpec, PodTemplateMutator, ValidationError};

use super::strategy::{StagingStrategy, DEFAULT_STRATEGIES};

pub struct ContextStagingPlanner {
    config: StagingConfig,
    strategies: &'static [&'static dyn StagingStrategy],
}

impl std::fmt::Debug for ContextStagingPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextStagingPlanner")
            .field("config", &self.config)
            .field("kinds", &self.supported_kinds())
            .finish()
    }
}

impl ContextStagingPlanner {
    /// Planner with a strategy for every context kind.
    pub fn new(config: StagingConfig) -> Result<Self, ValidationError> {
        Self::with_strategies(config, DEFAULT_STRATEGIES)
    }

    /// Planner restricted to `strategies`, e.g. for a builder that cannot
    /// consume every context kind.
    pub fn with_strategies(
        config: StagingConfig,
        strategies: &'static [&'static dyn StagingStrategy],
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config, strategies })
    }

    pub fn config(&self) -> &StagingConfig {
        &self.config
    }

    pub fn strategy(&self, kind: ContextKind) -> Option<&'static dyn StagingStrategy> {
        self.strategies.iter().copied().find(|s| s.kind() == kind)
    }

    pub fn supported_kinds(&self) -> Vec<ContextKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Plugin labels for the supported kinds, all with empty values.
    pub fn plugin_labels(&self) -> BTreeMap<String, String> {
        self.strategies
            .iter()
            .map(|s| (s.kind().plugin_label().to_string(), String::new()))
            .collect()
    }

    /// Stage `descriptor` for main container `target_container_idx` of
    /// `template` and return the path that container reads the context from.
    ///
    /// # Errors
    /// On any error `template` is left unchanged.
    pub fn plan(
        &self,
        descriptor: &ContextDescriptor,
        template: &mut PodSpec,
        target_container_idx: usize,
    ) -> Result<String, StagingError> {
        let kind = descriptor.kind();
        let result = self.try_plan(descriptor, template, target_container_idx);

        match &result {
            Ok(path) => {
                metrics::counter!("ctx_stage_plans_total", "kind" => kind.as_str()).increment(1);
                info!(kind = %kind, context_path = %path, "context staged");
            }
            Err(err) => {
                metrics::counter!(
                    "ctx_stage_plan_failures_total",
                    "kind" => kind.as_str(),
                    "reason" => err.reason()
                )
                .increment(1);
                warn!(kind = %kind, error = %err, "context staging rejected");
            }
        }

        result
    }

    /// Like [`plan`](Self::plan), for the context section of a build job.
    pub fn plan_spec(
        &self,
        spec: &ContextSpec,
        template: &mut PodSpec,
        target_container_idx: usize,
    ) -> Result<String, StagingError> {
        let descriptor = spec.clone().into_descriptor().map_err(|err| {
            warn!(kind = %spec.kind, error = %err, "invalid context spec");
            err
        })?;
        self.plan(&descriptor, template, target_container_idx)
    }

    fn try_plan(
        &self,
        descriptor: &ContextDescriptor,
        template: &mut PodSpec,
        target_container_idx: usize,
    ) -> Result<String, StagingError> {
        let mut mutator = PodTemplateMutator::new(template, target_container_idx)?;

        let kind = descriptor.kind();
        let strategy = self
            .strategy(kind)
            .ok_or_else(|| StagingError::UnsupportedContextKind(kind.to_string()))?;

        let path = strategy.stage(descriptor, &self.config, &mut mutator)?;
        let changes = mutator.commit();
        debug!(
            volumes = changes.volumes,
            init_containers = changes.init_containers,
            target_mounts = changes.target_mounts,
            "pod template updated"
        );
        Ok(path)
    }
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
