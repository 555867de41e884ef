// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Context section of the BuildJob resource, as stored.
//!
//! Every field is optional on the wire; empty strings mean "not set".
//! [`ContextSpec::into_descriptor`] turns it into a [`ContextDescriptor`].

use serde::{Deserialize, Serialize};

use super::descriptor::{
    ConfigMapContext, ContextDescriptor, ContextKind, GitContext, HttpContext, RcloneContext,
};
use crate::error::StagingError;
use crate::k8s::ValidationError;

/// Reference to an object in the build's namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    #[serde(default)]
    pub name: String,
}

impl LocalObjectReference {
    fn name(reference: &Option<LocalObjectReference>) -> Option<&str> {
        reference
            .as_ref()
            .map(|r| r.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSpec {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_ref: Option<LocalObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rclone: Option<RcloneSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitSpec {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub sub_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_secret_ref: Option<LocalObjectReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpSpec {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub sub_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcloneSpec {
    #[serde(default)]
    pub remote: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<LocalObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_secret_ref: Option<LocalObjectReference>,
}

impl ContextSpec {
    /// Validate and convert to a descriptor.
    ///
    /// # Errors
    /// `UnsupportedContextKind` for an unknown kind string, `InvalidContext`
    /// when the section for the kind is missing or a field is invalid.
    pub fn into_descriptor(self) -> Result<ContextDescriptor, StagingError> {
        let kind: ContextKind = self
            .kind
            .parse()
            .map_err(StagingError::UnsupportedContextKind)?;

        let descriptor = match kind {
            ContextKind::Git => {
                let git = self
                    .git
                    .ok_or_else(|| ValidationError::EmptyField("git".to_string()))?;
                let mut ctx = GitContext::new(git.url)?
                    .with_revision(git.revision)?
                    .with_sub_path(git.sub_path)?;
                if let Some(name) = LocalObjectReference::name(&git.ssh_secret_ref) {
                    ctx = ctx.with_ssh_secret(name)?;
                }
                ContextDescriptor::Git(ctx)
            }
            ContextKind::ConfigMap => {
                let name = LocalObjectReference::name(&self.config_map_ref)
                    .ok_or_else(|| ValidationError::EmptyField("configMapRef".to_string()))?;
                ContextDescriptor::ConfigMap(ConfigMapContext::new(name)?)
            }
            ContextKind::Http => {
                let http = self
                    .http
                    .ok_or_else(|| ValidationError::EmptyField("http".to_string()))?;
                ContextDescriptor::Http(HttpContext::new(http.url)?.with_sub_path(http.sub_path)?)
            }
            ContextKind::Rclone => {
                let rclone = self
                    .rclone
                    .ok_or_else(|| ValidationError::EmptyField("rclone".to_string()))?;
                let secret = LocalObjectReference::name(&rclone.secret_ref)
                    .ok_or_else(|| ValidationError::EmptyField("rclone.secretRef".to_string()))?;
                let mut ctx = RcloneContext::new(rclone.remote, rclone.path, secret)?;
                if let Some(name) = LocalObjectReference::name(&rclone.ssh_secret_ref) {
                    ctx = ctx.with_ssh_secret(name)?;
                }
                ContextDescriptor::Rclone(ctx)
            }
        };

        Ok(descriptor)
    }
}

impl TryFrom<ContextSpec> for ContextDescriptor {
    type Error = StagingError;

    fn try_from(spec: ContextSpec) -> Result<Self, Self::Error> {
        spec.into_descriptor()
    }
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
