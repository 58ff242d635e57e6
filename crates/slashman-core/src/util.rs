//! Path helpers for command generation

use std::env;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Fallback stem when a prompt name sanitizes to nothing
pub const DEFAULT_COMMAND_STEM: &str = "command";

/// Files or directories that mark a project root
pub const PROJECT_MARKERS: &[&str] = &[".git", "Cargo.toml", "pyproject.toml", "setup.py"];

/// Ancestors searched for a project marker
const PROJECT_SEARCH_DEPTH: usize = 10;

/// Errors related to path validation
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Path traversal attempt detected: {0}")]
    TraversalAttempt(String),

    #[error("Path escapes root directory: {0}")]
    EscapesRoot(String),

    #[error("Invalid path component: {0}")]
    InvalidComponent(String),
}

/// Reduce a prompt name to a safe file stem.
///
/// Keeps only the final path segment, collapses each run of characters
/// outside `[A-Za-z0-9._-]` to one hyphen, and strips leading and trailing
/// `-`, `_` and `.`. Empty results become `command`.
#[must_use]
pub fn sanitize_command_stem(name: &str) -> String {
    let last_segment = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let last_segment = match last_segment {
        "." | ".." => "",
        other => other,
    };

    let mut stem = String::with_capacity(last_segment.len());
    let mut in_run = false;
    for c in last_segment.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            stem.push(c);
            in_run = false;
        } else if !in_run {
            stem.push('-');
            in_run = true;
        }
    }

    let stem = stem.trim_matches(|c| matches!(c, '-' | '_' | '.'));
    if stem.is_empty() {
        DEFAULT_COMMAND_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// Join an untrusted relative path onto `root`, refusing anything that
/// would land outside it
///
/// # Errors
/// Returns an error if the path is absolute or climbs above `root`
pub fn safe_join(root: &Path, untrusted_path: &Path) -> Result<PathBuf, PathError> {
    let normalized = normalize_path(untrusted_path)?;
    let joined = root.join(normalized);
    if !joined.starts_with(root) {
        return Err(PathError::EscapesRoot(joined.display().to_string()));
    }
    Ok(joined)
}

/// Drop `.` components and resolve `..` without leaving the start
fn normalize_path(path: &Path) -> Result<PathBuf, PathError> {
    let mut normalized = PathBuf::new();
    let mut depth: usize = 0;

    for component in path.components() {
        match component {
            Component::Normal(c) => {
                if c.to_string_lossy().contains('\0') {
                    return Err(PathError::InvalidComponent(
                        "Null byte in path".to_string(),
                    ));
                }
                normalized.push(c);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(PathError::TraversalAttempt(path.display().to_string()));
                }
                normalized.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(PathError::InvalidComponent(
                    "Absolute path not allowed".to_string(),
                ));
            }
        }
    }

    Ok(normalized)
}

/// Project root for the current process.
///
/// `PROJECT_ROOT` wins when set; otherwise the nearest ancestor of the
/// working directory holding a project marker, else the working directory.
#[must_use]
pub fn find_project_root() -> PathBuf {
    if let Some(root) = env::var_os("PROJECT_ROOT").filter(|v| !v.is_empty()) {
        return PathBuf::from(root);
    }
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_project_root_from(&cwd).unwrap_or(cwd)
}

/// Nearest ancestor of `start` (itself included, at most ten levels) that
/// contains a project marker
#[must_use]
pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(PROJECT_SEARCH_DEPTH)
        .find(|dir| PROJECT_MARKERS.iter().any(|marker| dir.join(marker).exists()))
        .map(Path::to_path_buf)
}
