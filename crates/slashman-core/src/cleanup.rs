//! Removal of generated command files and their backups

use crate::apply::FileError;
use crate::error::CoreResult;
use serde::Serialize;
use slashman_scanner::agents::{current_platform, get_agent_configs};
use slashman_scanner::backup::backup_regex_for_extension;
use slashman_scanner::discovery::list_files;
use slashman_scanner::CommandCodec;
use std::fs;
use std::path::PathBuf;

/// Kind of file cleanup removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupKind {
    Command,
    Backup,
}

/// A file cleanup would remove
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupCandidate {
    pub path: PathBuf,
    pub agent_key: String,
    pub agent_display_name: String,
    pub kind: CleanupKind,
    pub reason: &'static str,
}

/// Outcome of a cleanup run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    pub dry_run: bool,
    pub files_found: usize,
    /// Deleted files, or for a dry run the files that would be deleted
    pub files_deleted: usize,
    pub files: Vec<CleanupCandidate>,
    pub errors: Vec<FileError>,
}

/// Finds and deletes generated files under one base path
#[derive(Debug, Clone)]
pub struct Cleaner {
    base_path: PathBuf,
    platform: String,
    include_backups: bool,
}

impl Cleaner {
    /// Create a cleaner for the running platform that also removes backups
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            platform: current_platform().to_string(),
            include_backups: true,
        }
    }

    #[must_use]
    pub fn with_backups(mut self, include: bool) -> Self {
        self.include_backups = include;
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Generated command files (and backups, if enabled) of the given
    /// agents.
    ///
    /// A command file counts as generated when its `meta` has
    /// `source_prompt` or `version`, which also catches files written before
    /// `managed_by` existed.
    ///
    /// # Errors
    /// Returns an error for an unregistered agent key
    pub fn find_generated_files<S: AsRef<str>>(&self, agent_keys: &[S]) -> CoreResult<Vec<CleanupCandidate>> {
        let mut found = Vec::new();

        for agent in get_agent_configs(agent_keys)? {
            let dir = agent.command_path(&self.base_path, &self.platform);
            if !dir.is_dir() {
                continue;
            }
            let codec = CommandCodec::for_format(agent.command_format);
            let candidate = |path: PathBuf, kind, reason| CleanupCandidate {
                path,
                agent_key: agent.key.to_string(),
                agent_display_name: agent.display_name.to_string(),
                kind,
                reason,
            };

            for path in list_files(&dir, |name| name.ends_with(agent.command_file_extension)) {
                let generated = fs::read_to_string(&path).is_ok_and(|content| codec.is_generated(&content));
                if generated {
                    found.push(candidate(path, CleanupKind::Command, "Has generated metadata"));
                }
            }

            if self.include_backups {
                let pattern = match backup_regex_for_extension(agent.command_file_extension) {
                    Ok(pattern) => pattern,
                    Err(e) => {
                        tracing::warn!("Skipping backups of {}: {e}", agent.key);
                        continue;
                    }
                };
                for path in list_files(&dir, |name| pattern.is_match(name)) {
                    found.push(candidate(path, CleanupKind::Backup, "Matches backup pattern"));
                }
            }
        }

        Ok(found)
    }

    /// Delete everything [`Cleaner::find_generated_files`] finds. Failures
    /// are collected per file.
    ///
    /// # Errors
    /// Returns an error for an unregistered agent key
    pub fn cleanup<S: AsRef<str>>(&self, agent_keys: &[S], dry_run: bool) -> CoreResult<CleanupReport> {
        let found = self.find_generated_files(agent_keys)?;
        let mut report = CleanupReport {
            dry_run,
            files_found: found.len(),
            ..CleanupReport::default()
        };

        for candidate in found {
            if !dry_run {
                if let Err(e) = fs::remove_file(&candidate.path) {
                    tracing::warn!("Failed to delete {}: {e}", candidate.path.display());
                    report.errors.push(FileError {
                        path: candidate.path.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
                tracing::debug!("Deleted {}", candidate.path.display());
            }
            report.files.push(candidate);
        }

        report.files_deleted = report.files.len();
        tracing::info!(
            "Cleanup removed {} of {} files",
            report.files_deleted,
            report.files_found
        );
        Ok(report)
    }
}
