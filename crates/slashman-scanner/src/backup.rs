//! Backup file naming: `<original-filename>.<YYYYMMDD-HHMMSS>.bak`
//!
//! Backups live next to the file they copy. They are not tracked anywhere
//! else; the file name is the only record.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix shared by all backup files
pub const BACKUP_SUFFIX: &str = ".bak";

/// `chrono` format of the timestamp component
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Whether `token` is exactly `YYYYMMDD-HHMMSS` (8 digits, hyphen, 6 digits)
#[must_use]
pub fn is_backup_timestamp(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'-'
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[9..].iter().all(u8::is_ascii_digit)
}

/// Whether a file name follows the backup grammar.
///
/// Requires `<stem>.<ext>.<timestamp>.bak`: the name ends in `.bak`, has at
/// least three dots, and the second-to-last segment is a timestamp.
#[must_use]
pub fn is_backup_file_name(name: &str) -> bool {
    if !name.ends_with(BACKUP_SUFFIX) {
        return false;
    }
    let parts: Vec<&str> = name.rsplitn(4, '.').collect();
    parts.len() == 4 && is_backup_timestamp(parts[1])
}

/// Whether `path` names a backup file
#[must_use]
pub fn is_backup_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(is_backup_file_name)
}

/// Backup path for `path` taken at `timestamp`
#[must_use]
pub fn backup_path_for(path: &Path, timestamp: DateTime<Utc>) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}{BACKUP_SUFFIX}", timestamp.format(TIMESTAMP_FORMAT)));
    path.with_file_name(name)
}

/// Anchored pattern matching backups of one exact file name
///
/// # Errors
/// Returns an error if the pattern exceeds the regex size limit
pub fn backup_regex_for_file(file_name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"^{}\.\d{{8}}-\d{{6}}\.bak$",
        regex::escape(file_name)
    ))
}

/// Pattern matching backups of any file with the given extension
///
/// # Errors
/// Returns an error if the pattern exceeds the regex size limit
pub fn backup_regex_for_extension(extension: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"^.*{}\.\d{{8}}-\d{{6}}\.bak$",
        regex::escape(extension)
    ))
}

/// Count backups of `path` in its directory.
///
/// Returns 0 when `path` itself does not exist, even if orphaned backups
/// remain.
#[must_use]
pub fn count_backups(path: &Path) -> usize {
    if !path.exists() {
        return 0;
    }
    let (Some(dir), Some(name)) = (path.parent(), path.file_name().and_then(|n| n.to_str()))
    else {
        return 0;
    };
    let pattern = match backup_regex_for_file(name) {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::warn!("Cannot match backups of {name}: {e}");
            return 0;
        }
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read {}: {e}", dir.display());
            return 0;
        }
    };

    entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| pattern.is_match(name))
        })
        .count()
}
