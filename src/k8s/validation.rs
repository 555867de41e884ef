// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Validation functions for context fields and pod template names.
//!
//! Rejects control characters in opaque strings, absolute sub-paths and
//! names Kubernetes would refuse.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum allowed length for string fields.
pub const MAX_FIELD_LENGTH: usize = 256;

/// Maximum allowed length for path fields.
const MAX_PATH_LENGTH: usize = 1024;

/// Maximum allowed length for URL fields.
const MAX_URL_LENGTH: usize = 2048;

/// DNS-1123 label limit (container and volume names).
pub const MAX_LABEL_LENGTH: usize = 63;

/// DNS-1123 subdomain limit (secret and config map names).
pub const MAX_SUBDOMAIN_LENGTH: usize = 253;

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Path is absolute where a relative path is required.
    AbsolutePath(String),
    /// Path is not usable.
    InvalidPath(String),
    /// Image reference is invalid.
    InvalidImage(String),
    /// Name is not a valid DNS-1123 label or subdomain.
    InvalidName(String),
    /// URL or remote reference contains forbidden characters.
    InvalidUrl(String),
    /// Field exceeds maximum length.
    MaxLengthExceeded { field: String, max: usize },
    /// Field is empty but required.
    EmptyField(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AbsolutePath(p) => write!(f, "Path must be relative: {}", p),
            Self::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            Self::InvalidImage(img) => write!(f, "Invalid image reference: {}", img),
            Self::InvalidName(name) => write!(f, "Invalid name: {}", name),
            Self::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            Self::MaxLengthExceeded { field, max } => {
                write!(f, "Field '{}' exceeds maximum length of {}", field, max)
            }
            Self::EmptyField(field) => write!(f, "Field '{}' cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("DNS-1123 label pattern is valid")
    })
}

fn subdomain_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
            .expect("DNS-1123 subdomain pattern is valid")
    })
}

fn env_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[-._a-zA-Z][-._a-zA-Z0-9]*$").expect("env var name pattern is valid")
    })
}

fn check_length(value: &str, field_name: &str, max: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField(field_name.to_string()));
    }
    if value.len() > max {
        return Err(ValidationError::MaxLengthExceeded {
            field: field_name.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validate a sub-path selecting a directory inside fetched content.
///
/// Must be relative and free of null bytes. `..` segments are left to the
/// path guard, which knows the base they are resolved against.
pub fn validate_sub_path(path: &str, field_name: &str) -> Result<(), ValidationError> {
    check_length(path, field_name, MAX_PATH_LENGTH)?;

    if path.contains('\0') {
        return Err(ValidationError::InvalidPath(format!(
            "{}: contains null byte",
            field_name
        )));
    }

    if path.starts_with('/') {
        return Err(ValidationError::AbsolutePath(format!(
            "{}: {}",
            field_name, path
        )));
    }

    Ok(())
}

/// Validate an absolute directory inside the helper image (e.g. its home).
pub fn validate_absolute_dir(path: &str, field_name: &str) -> Result<(), ValidationError> {
    check_length(path, field_name, MAX_PATH_LENGTH)?;

    if path.contains('\0') {
        return Err(ValidationError::InvalidPath(format!(
            "{}: contains null byte",
            field_name
        )));
    }

    if !path.starts_with('/') {
        return Err(ValidationError::InvalidPath(format!(
            "{}: must be an absolute path",
            field_name
        )));
    }

    Ok(())
}

/// Validate a container image reference.
///
/// Rejects shell metacharacters and invalid name formats.
pub fn validate_image(image: &str) -> Result<(), ValidationError> {
    check_length(image, "image", MAX_FIELD_LENGTH)?;

    let forbidden_chars = [
        ';', '&', '|', '`', '$', '(', ')', '{', '}', '<', '>', ' ', '\n', '\r', '\0',
    ];
    for ch in forbidden_chars {
        if image.contains(ch) {
            return Err(ValidationError::InvalidImage(format!(
                "contains forbidden character: {:?}",
                ch
            )));
        }
    }

    let parts: Vec<&str> = image.rsplitn(2, ':').collect();
    let name_part = parts.last().unwrap_or(&image);

    if name_part.starts_with('-') || name_part.starts_with('.') {
        return Err(ValidationError::InvalidImage(
            "name cannot start with dash or dot".to_string(),
        ));
    }

    Ok(())
}

/// Validate an opaque URL or remote reference.
///
/// The planner never parses URLs; it only refuses values that could not be
/// passed through as a single argument.
pub fn validate_url(url: &str, field_name: &str) -> Result<(), ValidationError> {
    check_length(url, field_name, MAX_URL_LENGTH)?;

    if url.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(ValidationError::InvalidUrl(format!(
            "{}: contains whitespace or control characters",
            field_name
        )));
    }

    if url.starts_with('-') {
        return Err(ValidationError::InvalidUrl(format!(
            "{}: cannot start with a dash",
            field_name
        )));
    }

    Ok(())
}

/// Validate a free-form argument such as a git revision.
pub fn validate_argument(value: &str, field_name: &str) -> Result<(), ValidationError> {
    check_length(value, field_name, MAX_FIELD_LENGTH)?;

    if value.chars().any(char::is_control) {
        return Err(ValidationError::InvalidUrl(format!(
            "{}: contains control characters",
            field_name
        )));
    }

    if value.starts_with('-') {
        return Err(ValidationError::InvalidUrl(format!(
            "{}: cannot start with a dash",
            field_name
        )));
    }

    Ok(())
}

/// Validate a container or volume name (DNS-1123 label).
pub fn validate_resource_name(name: &str, field_name: &str) -> Result<(), ValidationError> {
    check_length(name, field_name, MAX_LABEL_LENGTH)?;

    if !label_regex().is_match(name) {
        return Err(ValidationError::InvalidName(format!(
            "{}: '{}' must consist of lower case alphanumerics and '-'",
            field_name, name
        )));
    }

    Ok(())
}

/// Validate a secret or config map reference (DNS-1123 subdomain).
pub fn validate_object_ref(name: &str, field_name: &str) -> Result<(), ValidationError> {
    check_length(name, field_name, MAX_SUBDOMAIN_LENGTH)?;

    if !subdomain_regex().is_match(name) {
        return Err(ValidationError::InvalidName(format!(
            "{}: '{}' must be a DNS-1123 subdomain",
            field_name, name
        )));
    }

    Ok(())
}

/// Validate a container environment variable name.
pub fn validate_env_name(name: &str, field_name: &str) -> Result<(), ValidationError> {
    check_length(name, field_name, MAX_FIELD_LENGTH)?;

    if !env_name_regex().is_match(name) {
        return Err(ValidationError::InvalidName(format!(
            "{}: '{}' is not a valid environment variable name",
            field_name, name
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
