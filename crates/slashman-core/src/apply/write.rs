//! Writing command files for a batch of prompts

use crate::apply::plan::{
    find_existing_files, plan_destinations, ConflictResolver, ConflictState, OverwriteAction,
    PlannedFile,
};
use crate::backup::{backup_path_for, create_backup};
use crate::error::{CoreError, CoreResult};
use crate::render::{render_command, RenderContext};
use chrono::{DateTime, Utc};
use serde::Serialize;
use slashman_scanner::agents::{current_platform, get_agent_configs};
use slashman_scanner::{AgentConfig, CommandFormat, PromptRecord};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened (or would happen) to one destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteAction {
    Create,
    Overwrite,
    BackupAndOverwrite,
}

/// A command file written by a batch
#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub prompt_name: String,
    pub agent_key: String,
    pub agent_display_name: String,
    pub format: CommandFormat,
    pub action: WriteAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

/// A per-file failure that did not stop the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// A loaded prompt, as listed in a report
#[derive(Debug, Clone, Serialize)]
pub struct PromptSummary {
    pub name: String,
    pub path: PathBuf,
    pub enabled: bool,
}

/// Outcome of a generation batch
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub dry_run: bool,
    pub prompts_loaded: usize,
    /// Files actually written; always 0 for a dry run
    pub files_written: usize,
    /// Every destination handled, in prompt-major order
    pub files: Vec<WrittenFile>,
    pub prompts: Vec<PromptSummary>,
    /// Backups created, or for a dry run the backups that would be
    pub backups_created: Vec<PathBuf>,
    pub errors: Vec<FileError>,
}

impl GenerationReport {
    fn new(dry_run: bool, prompts: &[PromptRecord]) -> Self {
        Self {
            dry_run,
            prompts_loaded: prompts.len(),
            files_written: 0,
            files: Vec::new(),
            prompts: prompts
                .iter()
                .map(|p| PromptSummary {
                    name: p.name.clone(),
                    path: p.path.clone(),
                    enabled: p.enabled,
                })
                .collect(),
            backups_created: Vec::new(),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Generates command files for a set of agents under one base path
#[derive(Debug, Clone)]
pub struct Generator {
    base_path: PathBuf,
    agents: Vec<&'static AgentConfig>,
    dry_run: bool,
    overwrite_action: Option<OverwriteAction>,
    platform: String,
    context: RenderContext,
}

impl Generator {
    /// Create a generator for the running platform
    pub fn new(base_path: impl Into<PathBuf>, agents: Vec<&'static AgentConfig>) -> Self {
        Self {
            base_path: base_path.into(),
            agents,
            dry_run: false,
            overwrite_action: None,
            platform: current_platform().to_string(),
            context: RenderContext::default(),
        }
    }

    /// Create a generator from agent keys
    ///
    /// # Errors
    /// Returns an error for an unregistered key
    pub fn for_agents<S: AsRef<str>>(base_path: impl Into<PathBuf>, keys: &[S]) -> CoreResult<Self> {
        Ok(Self::new(base_path, get_agent_configs(keys)?))
    }

    /// Report without touching the filesystem
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Decide for existing files up front instead of asking
    #[must_use]
    pub fn with_overwrite_action(mut self, action: Option<OverwriteAction>) -> Self {
        self.overwrite_action = action;
        self
    }

    /// Resolve command directories for another platform
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Stamp generated files and backups with a fixed time
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.context = RenderContext::new(timestamp);
        self
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn agents(&self) -> &[&'static AgentConfig] {
        &self.agents
    }

    /// Destinations of enabled prompts that already exist
    ///
    /// # Errors
    /// Returns an error if a destination fails path validation
    pub fn existing_files(&self, prompts: &[PromptRecord]) -> CoreResult<Vec<PathBuf>> {
        let planned = plan_destinations(prompts, &self.agents, &self.base_path, &self.platform)?;
        Ok(find_existing_files(&planned))
    }

    /// Write every enabled prompt for every agent.
    ///
    /// Existing destinations are found before anything is written. Unless a
    /// preset action was given, `resolver` is asked once for the whole batch;
    /// a dry run never asks and reports existing files as overwritten. After
    /// writing starts, per-file failures are collected in the report.
    ///
    /// # Errors
    /// Returns `CoreError::Cancelled`, with nothing written, if the batch
    /// decision is cancel
    pub fn generate(
        &self,
        prompts: &[PromptRecord],
        resolver: &mut dyn ConflictResolver,
    ) -> CoreResult<GenerationReport> {
        let planned = plan_destinations(prompts, &self.agents, &self.base_path, &self.platform)?;
        let existing = find_existing_files(&planned);

        let preset = match (self.dry_run, self.overwrite_action) {
            (true, None) => Some(OverwriteAction::Overwrite),
            (_, preset) => preset,
        };
        let state = ConflictState::new(existing.clone(), preset).resolve(resolver);
        if state == ConflictState::Cancelled {
            tracing::info!("Generation cancelled; {} files left untouched", existing.len());
            return Err(CoreError::Cancelled);
        }

        let existing: BTreeSet<PathBuf> = existing.into_iter().collect();
        let mut report = GenerationReport::new(self.dry_run, prompts);

        for file in &planned {
            match self.write_one(file, existing.contains(&file.path), &state) {
                Ok(written) => {
                    if let Some(backup) = &written.backup_path {
                        report.backups_created.push(backup.clone());
                    }
                    if !self.dry_run {
                        report.files_written += 1;
                    }
                    report.files.push(written);
                }
                Err(e) => {
                    tracing::warn!("Failed to write {}: {e}", file.path.display());
                    report.errors.push(FileError {
                        path: file.path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Generated {} files ({} written, {} backups, {} errors)",
            report.files.len(),
            report.files_written,
            report.backups_created.len(),
            report.errors.len()
        );
        Ok(report)
    }

    fn write_one(
        &self,
        file: &PlannedFile<'_>,
        existed: bool,
        state: &ConflictState,
    ) -> CoreResult<WrittenFile> {
        let content = render_command(file.prompt, file.agent, &self.context)?;
        let timestamp = self.context.updated_at;

        let backup_path = match (existed && state.backs_up(), self.dry_run) {
            (false, _) => None,
            (true, true) => Some(backup_path_for(&file.path, timestamp)),
            (true, false) => Some(create_backup(&file.path, timestamp)?),
        };

        let action = match (existed, backup_path.is_some()) {
            (false, _) => WriteAction::Create,
            (true, false) => WriteAction::Overwrite,
            (true, true) => WriteAction::BackupAndOverwrite,
        };

        if !self.dry_run {
            if let Some(parent) = file.path.parent() {
                fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, &e))?;
            }
            fs::write(&file.path, content).map_err(|e| CoreError::io(&file.path, &e))?;
            tracing::debug!("Wrote {}", file.path.display());
        }

        Ok(WrittenFile {
            path: file.path.clone(),
            prompt_name: file.prompt.name.clone(),
            agent_key: file.agent.key.to_string(),
            agent_display_name: file.agent.display_name.to_string(),
            format: file.agent.command_format,
            action,
            backup_path,
        })
    }
}
