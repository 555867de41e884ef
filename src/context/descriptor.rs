// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Validated context descriptors, one variant per context kind.
//!
//! Each variant can only be built through its constructor, so a descriptor
//! always carries exactly the fields valid for its kind.

use serde::{Deserialize, Serialize};

use crate::k8s::validation::{
    validate_argument, validate_object_ref, validate_sub_path, validate_url, ValidationError,
};

/// Context kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContextKind {
    /// Version-controlled repository.
    Git,
    /// Config map whose entries are the context files.
    ConfigMap,
    /// Tar archive fetched over HTTP(S).
    #[serde(rename = "HTTP")]
    Http,
    /// Remote filesystem reachable through rclone.
    Rclone,
}

impl ContextKind {
    pub const ALL: [ContextKind; 4] = [
        ContextKind::Git,
        ContextKind::ConfigMap,
        ContextKind::Http,
        ContextKind::Rclone,
    ];

    /// Kind string as stored in the build job.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Git => "Git",
            ContextKind::ConfigMap => "ConfigMap",
            ContextKind::Http => "HTTP",
            ContextKind::Rclone => "Rclone",
        }
    }

    /// Plugin label a builder advertises when it can stage this kind.
    pub fn plugin_label(&self) -> &'static str {
        match self {
            ContextKind::Git => "context.git",
            ContextKind::ConfigMap => "context.configmap",
            ContextKind::Http => "context.http",
            ContextKind::Rclone => "context.rclone",
        }
    }
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContextKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContextKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Validated name of a secret or config map in the build's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef(String);

impl ObjectRef {
    pub fn new(name: impl Into<String>, field_name: &str) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_object_ref(&name, field_name)?;
        Ok(Self(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Treat empty strings like absent fields.
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn sub_path(value: String, field_name: &str) -> Result<Option<String>, ValidationError> {
    match non_empty(value) {
        Some(path) => {
            validate_sub_path(&path, field_name)?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

/// Repository context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitContext {
    url: String,
    revision: Option<String>,
    sub_path: Option<String>,
    ssh_secret_ref: Option<ObjectRef>,
}

impl GitContext {
    /// `url` is anything `git clone` accepts.
    pub fn new(url: impl Into<String>) -> Result<Self, ValidationError> {
        let url = url.into();
        validate_url(&url, "git.url")?;
        Ok(Self {
            url,
            revision: None,
            sub_path: None,
            ssh_secret_ref: None,
        })
    }

    /// Commit, branch or tag. Empty keeps the remote's default branch.
    pub fn with_revision(mut self, revision: impl Into<String>) -> Result<Self, ValidationError> {
        self.revision = non_empty(revision.into());
        if let Some(ref rev) = self.revision {
            validate_argument(rev, "git.revision")?;
        }
        Ok(self)
    }

    pub fn with_sub_path(mut self, path: impl Into<String>) -> Result<Self, ValidationError> {
        self.sub_path = sub_path(path.into(), "git.subPath")?;
        Ok(self)
    }

    /// Secret holding the contents of `~/.ssh`.
    pub fn with_ssh_secret(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        self.ssh_secret_ref = Some(ObjectRef::new(name, "git.sshSecretRef")?);
        Ok(self)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    pub fn sub_path(&self) -> Option<&str> {
        self.sub_path.as_deref()
    }

    pub fn ssh_secret_ref(&self) -> Option<&ObjectRef> {
        self.ssh_secret_ref.as_ref()
    }
}

/// Config map context. Entries may materialize as symlinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMapContext {
    config_map_ref: ObjectRef,
}

impl ConfigMapContext {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            config_map_ref: ObjectRef::new(name, "configMapRef")?,
        })
    }

    pub fn config_map_ref(&self) -> &ObjectRef {
        &self.config_map_ref
    }
}

/// Remote archive context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpContext {
    url: String,
    sub_path: Option<String>,
}

impl HttpContext {
    /// `url` points at a tar (or tar+gz) archive.
    pub fn new(url: impl Into<String>) -> Result<Self, ValidationError> {
        let url = url.into();
        validate_url(&url, "http.url")?;
        Ok(Self {
            url,
            sub_path: None,
        })
    }

    pub fn with_sub_path(mut self, path: impl Into<String>) -> Result<Self, ValidationError> {
        self.sub_path = sub_path(path.into(), "http.subPath")?;
        Ok(self)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn sub_path(&self) -> Option<&str> {
        self.sub_path.as_deref()
    }
}

/// Remote mount context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcloneContext {
    remote: String,
    path: String,
    secret_ref: ObjectRef,
    ssh_secret_ref: Option<ObjectRef>,
}

impl RcloneContext {
    /// `secret` holds the contents of `~/.config/rclone`.
    pub fn new(
        remote: impl Into<String>,
        path: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let remote = remote.into();
        let path = path.into();
        validate_argument(&remote, "rclone.remote")?;
        if remote.contains(':') || remote.contains('/') {
            return Err(ValidationError::InvalidName(format!(
                "rclone.remote: '{}' cannot contain ':' or '/'",
                remote
            )));
        }
        if !path.is_empty() {
            validate_argument(&path, "rclone.path")?;
        }
        Ok(Self {
            remote,
            path,
            secret_ref: ObjectRef::new(secret, "rclone.secretRef")?,
            ssh_secret_ref: None,
        })
    }

    /// Only needed for SFTP remotes.
    pub fn with_ssh_secret(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        self.ssh_secret_ref = Some(ObjectRef::new(name, "rclone.sshSecretRef")?);
        Ok(self)
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `remote:path` as rclone expects it.
    pub fn source(&self) -> String {
        format!("{}:{}", self.remote, self.path)
    }

    pub fn secret_ref(&self) -> &ObjectRef {
        &self.secret_ref
    }

    pub fn ssh_secret_ref(&self) -> Option<&ObjectRef> {
        self.ssh_secret_ref.as_ref()
    }
}

/// What to fetch for a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextDescriptor {
    Git(GitContext),
    ConfigMap(ConfigMapContext),
    Http(HttpContext),
    Rclone(RcloneContext),
}

impl ContextDescriptor {
    pub fn kind(&self) -> ContextKind {
        match self {
            ContextDescriptor::Git(_) => ContextKind::Git,
            ContextDescriptor::ConfigMap(_) => ContextKind::ConfigMap,
            ContextDescriptor::Http(_) => ContextKind::Http,
            ContextDescriptor::Rclone(_) => ContextKind::Rclone,
        }
    }
}

impl From<GitContext> for ContextDescriptor {
    fn from(ctx: GitContext) -> Self {
        ContextDescriptor::Git(ctx)
    }
}

impl From<ConfigMapContext> for ContextDescriptor {
    fn from(ctx: ConfigMapContext) -> Self {
        ContextDescriptor::ConfigMap(ctx)
    }
}

impl From<HttpContext> for ContextDescriptor {
    fn from(ctx: HttpContext) -> Self {
        ContextDescriptor::Http(ctx)
    }
}

impl From<RcloneContext> for ContextDescriptor {
    fn from(ctx: RcloneContext) -> Self {
        ContextDescriptor::Rclone(ctx)
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
