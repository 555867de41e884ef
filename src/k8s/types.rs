// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pod template types.
//!
//! The subset of the Kubernetes `PodSpec` the planner reads and appends to.
//! Field names serialize exactly as in Kubernetes manifests. Fields the
//! planner does not model are kept verbatim in each type's `extra` map, so a
//! template round-trips through the planner with only the staged additions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Manifest fields carried through without interpretation.
pub type ExtraFields = Map<String, Value>;

/// Owner read-only, the mode used for every mounted credential.
pub const SECRET_DEFAULT_MODE: i32 = 0o400;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Execution pod template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    /// Run to completion, in order, before any main container starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub init_containers: Vec<Container>,
    pub containers: Vec<Container>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    /// `restartPolicy`, `serviceAccountName`, `nodeSelector`, ...
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl PodSpec {
    pub fn volume(&self, name: &str) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.name == name)
    }

    pub fn init_container(&self, name: &str) -> Option<&Container> {
        self.init_containers.iter().find(|c| c.name == name)
    }

    /// True if any init or main container already uses `name`.
    pub fn has_container_named(&self, name: &str) -> bool {
        self.init_containers
            .iter()
            .chain(self.containers.iter())
            .any(|c| c.name == name)
    }
}

/// A container in either the init or the main sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
    /// `workingDir`, `resources`, `securityContext`, ...
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Container {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            ..Default::default()
        }
    }

    pub fn mount(&self, volume_name: &str) -> Option<&VolumeMount> {
        self.volume_mounts.iter().find(|m| m.name == volume_name)
    }

    /// Set `name` to `value`, replacing an existing entry.
    pub fn set_env(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.env.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.value = value,
            None => self.env.push(EnvVar {
                name,
                value,
                extra: ExtraFields::new(),
            }),
        }
    }
}

/// Environment variable. `valueFrom` sources stay in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Mount of a named pod volume into one container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl VolumeMount {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
            read_only: false,
            extra: ExtraFields::new(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Named pod volume. A volume has exactly one source key besides `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    #[serde(flatten)]
    pub source: VolumeSource,
}

impl Volume {
    /// Pod-lifetime scratch volume.
    pub fn empty_dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: VolumeSource::EmptyDir(EmptyDirVolumeSource::default()),
        }
    }

    /// Secret volume with owner read-only file permissions.
    pub fn secret(name: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: VolumeSource::Secret(SecretVolumeSource {
                secret_name: secret_name.into(),
                default_mode: Some(SECRET_DEFAULT_MODE),
                extra: ExtraFields::new(),
            }),
        }
    }

    pub fn config_map(name: impl Into<String>, config_map_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: VolumeSource::ConfigMap(ConfigMapVolumeSource {
                name: config_map_name.into(),
                default_mode: None,
                extra: ExtraFields::new(),
            }),
        }
    }
}

/// Backing storage of a volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolumeSource {
    EmptyDir(EmptyDirVolumeSource),
    Secret(SecretVolumeSource),
    ConfigMap(ConfigMapVolumeSource),
    PersistentVolumeClaim(PersistentVolumeClaimVolumeSource),
    /// Any other source (`hostPath`, `csi`, `projected`, ...), kept as the
    /// raw entries of the volume object minus `name`.
    #[serde(untagged)]
    Other(ExtraFields),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyDirVolumeSource {
    /// `Memory` for tmpfs, unset for node disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    /// `sizeLimit`.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretVolumeSource {
    pub secret_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<i32>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapVolumeSource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<i32>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaimVolumeSource {
    pub claim_name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
