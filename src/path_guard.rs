// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Contained path resolution.
//!
//! [`resolve`] works on pod-internal paths, which are never inspectable from
//! where the planner runs, so it is purely lexical. [`resolve_in_filesystem`]
//! additionally walks the real filesystem and expands symlinks, refusing any
//! that lead outside the base.

use std::collections::VecDeque;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Linux `MAXSYMLINKS`.
const MAX_SYMLINK_EXPANSIONS: usize = 40;

/// Why a resolution was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeReason {
    /// A `..` segment climbed above the base.
    ParentTraversal,
    /// The relative path was absolute.
    AbsolutePath,
    NulByte,
    /// A symlink pointed outside the base.
    Symlink(String),
    SymlinkLoop,
    /// A component could not be inspected.
    Unreadable(String),
}

impl std::fmt::Display for EscapeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParentTraversal => write!(f, "'..' leaves the base directory"),
            Self::AbsolutePath => write!(f, "path is absolute"),
            Self::NulByte => write!(f, "path contains a null byte"),
            Self::Symlink(target) => write!(f, "symlink to {} leaves the base directory", target),
            Self::SymlinkLoop => write!(f, "too many levels of symbolic links"),
            Self::Unreadable(msg) => write!(f, "cannot inspect component: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Path {relative:?} escapes {base:?}: {reason}")]
pub struct PathEscapeError {
    pub base: String,
    pub relative: String,
    pub reason: EscapeReason,
}

impl PathEscapeError {
    fn new(base: &str, relative: &str, reason: EscapeReason) -> Self {
        Self {
            base: base.to_string(),
            relative: relative.to_string(),
            reason,
        }
    }
}

fn trim_base(base: &str) -> &str {
    let trimmed = base.trim_end_matches('/');
    if trimmed.is_empty() && base.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// Resolve `relative` against the pod path `base`.
///
/// An empty `relative` yields `base` itself. The result never leaves `base`.
pub fn resolve(base: &str, relative: &str) -> Result<String, PathEscapeError> {
    if relative.contains('\0') || base.contains('\0') {
        return Err(PathEscapeError::new(base, relative, EscapeReason::NulByte));
    }
    if relative.starts_with('/') {
        return Err(PathEscapeError::new(base, relative, EscapeReason::AbsolutePath));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(PathEscapeError::new(
                        base,
                        relative,
                        EscapeReason::ParentTraversal,
                    ));
                }
            }
            name => segments.push(name),
        }
    }

    let base = trim_base(base);
    if segments.is_empty() {
        return Ok(base.to_string());
    }
    let joined = segments.join("/");
    Ok(if base == "/" {
        format!("/{}", joined)
    } else {
        format!("{}/{}", base, joined)
    })
}

/// Resolve `relative` against `base` on the local filesystem.
///
/// Follows the same lexical rules as [`resolve`], and expands every symlink
/// met along the way. Relative link targets are interpreted where the link
/// lives; absolute ones are accepted only if they point under `base`.
/// Components that do not exist yet are resolved lexically.
pub fn resolve_in_filesystem(base: &Path, relative: &str) -> Result<PathBuf, PathEscapeError> {
    let base_display = base.display().to_string();
    let fail = |reason| PathEscapeError::new(&base_display, relative, reason);

    if relative.contains('\0') {
        return Err(fail(EscapeReason::NulByte));
    }
    if relative.starts_with('/') {
        return Err(fail(EscapeReason::AbsolutePath));
    }

    let mut pending: VecDeque<String> = relative
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let mut resolved: Vec<String> = Vec::new();
    let mut expansions = 0usize;

    while let Some(segment) = pending.pop_front() {
        match segment.as_str() {
            "." => continue,
            ".." => {
                if resolved.pop().is_none() {
                    return Err(fail(EscapeReason::ParentTraversal));
                }
                continue;
            }
            _ => {}
        }

        let candidate = resolved
            .iter()
            .fold(base.to_path_buf(), |acc, s| acc.join(s))
            .join(&segment);

        let metadata = match std::fs::symlink_metadata(&candidate) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                resolved.push(segment);
                continue;
            }
            Err(err) => return Err(fail(EscapeReason::Unreadable(err.to_string()))),
        };

        if !metadata.file_type().is_symlink() {
            resolved.push(segment);
            continue;
        }

        expansions += 1;
        if expansions > MAX_SYMLINK_EXPANSIONS {
            return Err(fail(EscapeReason::SymlinkLoop));
        }

        let target = std::fs::read_link(&candidate)
            .map_err(|err| fail(EscapeReason::Unreadable(err.to_string())))?;
        let target_display = target.display().to_string();

        if target.is_absolute() {
            let inside = target
                .strip_prefix(base)
                .map_err(|_| fail(EscapeReason::Symlink(target_display.clone())))?;
            resolved.clear();
            prepend_components(&mut pending, inside)
                .map_err(|_| fail(EscapeReason::Symlink(target_display)))?;
        } else {
            prepend_components(&mut pending, &target)
                .map_err(|_| fail(EscapeReason::Symlink(target_display)))?;
        }
    }

    Ok(resolved.iter().fold(base.to_path_buf(), |acc, s| acc.join(s)))
}

/// Push `path`'s components to the front of `pending`, keeping their order.
fn prepend_components(pending: &mut VecDeque<String>, path: &Path) -> Result<(), ()> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Err(()),
        }
    }
    for part in parts.into_iter().rev() {
        pending.push_front(part);
    }
    Ok(())
}

#[cfg(test)]
#[path = "path_guard_tests.rs"]
mod tests;
