//! Discovery of generated commands across agent directories
//!
//! Directories are the source of truth; every call rescans them. A file that
//! cannot be read or parsed is dropped from the results and never aborts the
//! scan.

use crate::agents::{current_platform, get_agent_configs, AgentConfig};
use crate::backup::{backup_regex_for_extension, count_backups};
use crate::classify::{inspect, Inspection};
use crate::error::ScanResult;
use crate::meta::PromptMeta;
use crate::types::{Classification, ClassifiedFile, CommandFormat};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A managed command file found on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredPrompt {
    /// Logical prompt name
    pub name: String,
    pub description: Option<String>,
    pub agent_key: String,
    pub agent_display_name: String,
    pub file_path: PathBuf,
    pub meta: PromptMeta,
    pub format: CommandFormat,
}

/// One agent's copy of a grouped prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentEntry {
    pub agent_key: String,
    pub display_name: String,
    pub file_path: PathBuf,
    pub backup_count: usize,
}

/// All copies of one logical prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedPromptView {
    pub name: String,
    /// Formatted provenance, e.g. `github: owner/repo@main:prompts`
    pub source_info: String,
    pub updated_at: Option<String>,
    pub agents: Vec<AgentEntry>,
}

/// Every matching file of every agent, classified
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryAudit {
    pub files: Vec<ClassifiedFile>,
    /// Whether each agent's command directory exists
    pub directory_status: BTreeMap<String, bool>,
}

/// Input of the `list` presentation
#[derive(Debug, Clone, Serialize)]
pub struct ListReport {
    pub prompts: BTreeMap<String, GroupedPromptView>,
    /// Unmanaged file count for every scanned agent, zeros included
    pub unmanaged_counts: BTreeMap<String, usize>,
    pub scanned_at: DateTime<Utc>,
}

impl ListReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

/// Scanner over the command directories under one base path
#[derive(Debug, Clone)]
pub struct PromptScanner {
    base_path: PathBuf,
    platform: String,
}

impl PromptScanner {
    /// Create a scanner for the running platform
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            platform: current_platform().to_string(),
        }
    }

    /// Resolve command directories for another platform
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Command directory of `agent` under the base path
    #[must_use]
    pub fn command_dir(&self, agent: &AgentConfig) -> PathBuf {
        agent.command_path(&self.base_path, &self.platform)
    }

    /// Managed command files of the given agents
    ///
    /// # Errors
    /// Returns `ScanError::UnknownAgent` for an unregistered key
    pub fn discover_managed<S: AsRef<str>>(&self, agent_keys: &[S]) -> ScanResult<Vec<DiscoveredPrompt>> {
        let mut found = Vec::new();
        for agent in get_agent_configs(agent_keys)? {
            found.extend(self.managed_in(agent, &self.inspect_agent(agent)));
        }
        Ok(found)
    }

    /// Unmanaged file count per agent. Agents without a command directory
    /// count 0.
    ///
    /// # Errors
    /// Returns `ScanError::UnknownAgent` for an unregistered key
    pub fn count_unmanaged<S: AsRef<str>>(&self, agent_keys: &[S]) -> ScanResult<BTreeMap<String, usize>> {
        Ok(get_agent_configs(agent_keys)?
            .into_iter()
            .map(|agent| {
                let count = unmanaged_in(&self.inspect_agent(agent));
                (agent.key.to_string(), count)
            })
            .collect())
    }

    /// Classify every matching file, backups included
    ///
    /// # Errors
    /// Returns `ScanError::UnknownAgent` for an unregistered key
    pub fn discover_all<S: AsRef<str>>(&self, agent_keys: &[S]) -> ScanResult<DiscoveryAudit> {
        let mut audit = DiscoveryAudit::default();
        let mut seen = BTreeSet::new();

        for agent in get_agent_configs(agent_keys)? {
            let dir = self.command_dir(agent);
            let exists = dir.is_dir();
            audit.directory_status.insert(agent.key.to_string(), exists);
            if !exists {
                continue;
            }

            let mut paths = list_files(&dir, |name| name.ends_with(agent.command_file_extension));
            match backup_regex_for_extension(agent.command_file_extension) {
                Ok(pattern) => paths.extend(list_files(&dir, |name| pattern.is_match(name))),
                Err(e) => tracing::warn!("Skipping backups of {}: {e}", agent.key),
            }

            for path in paths {
                if !seen.insert(path.clone()) {
                    continue;
                }
                let classification = inspect(&path, agent).classification;
                audit.files.push(ClassifiedFile {
                    path,
                    agent_key: agent.key.to_string(),
                    classification,
                });
            }
        }

        Ok(audit)
    }

    /// Managed prompts grouped by name plus unmanaged counts, from a single
    /// pass over each directory
    ///
    /// # Errors
    /// Returns `ScanError::UnknownAgent` for an unregistered key
    pub fn list_report<S: AsRef<str>>(&self, agent_keys: &[S]) -> ScanResult<ListReport> {
        let mut managed = Vec::new();
        let mut unmanaged_counts = BTreeMap::new();

        for agent in get_agent_configs(agent_keys)? {
            let inspected = self.inspect_agent(agent);
            unmanaged_counts.insert(agent.key.to_string(), unmanaged_in(&inspected));
            managed.extend(self.managed_in(agent, &inspected));
        }

        tracing::info!(
            "Found {} managed command files across {} agents",
            managed.len(),
            unmanaged_counts.len()
        );

        Ok(ListReport {
            prompts: group_by_name(&managed),
            unmanaged_counts,
            scanned_at: Utc::now(),
        })
    }

    /// Inspect every non-backup file with the agent's extension
    fn inspect_agent(&self, agent: &AgentConfig) -> Vec<Inspection> {
        let dir = self.command_dir(agent);
        if !dir.is_dir() {
            tracing::debug!("No command directory for {} at {}", agent.key, dir.display());
            return Vec::new();
        }

        list_files(&dir, |name| name.ends_with(agent.command_file_extension))
            .into_iter()
            .map(|path| inspect(&path, agent))
            .filter(|inspection| inspection.classification != Classification::Backup)
            .collect()
    }

    fn managed_in(&self, agent: &AgentConfig, inspected: &[Inspection]) -> Vec<DiscoveredPrompt> {
        inspected
            .iter()
            .filter(|inspection| inspection.classification == Classification::Managed)
            .filter_map(|inspection| inspection.document.as_ref())
            .map(|doc| DiscoveredPrompt {
                name: doc.name.clone(),
                description: doc.description.clone(),
                agent_key: agent.key.to_string(),
                agent_display_name: agent.display_name.to_string(),
                file_path: doc.path.clone(),
                meta: doc.meta.clone(),
                format: doc.format,
            })
            .collect()
    }
}

/// Group discovered prompts by logical name.
///
/// Source info and update time come from the first record of each group;
/// copies from one generation run share them.
#[must_use]
pub fn group_by_name(records: &[DiscoveredPrompt]) -> BTreeMap<String, GroupedPromptView> {
    let mut groups: BTreeMap<String, GroupedPromptView> = BTreeMap::new();

    for record in records {
        let group = groups
            .entry(record.name.clone())
            .or_insert_with(|| GroupedPromptView {
                name: record.name.clone(),
                source_info: record.meta.source_info(),
                updated_at: record.meta.updated_at.clone(),
                agents: Vec::new(),
            });
        group.agents.push(AgentEntry {
            agent_key: record.agent_key.clone(),
            display_name: record.agent_display_name.clone(),
            file_path: record.file_path.clone(),
            backup_count: count_backups(&record.file_path),
        });
    }

    groups
}

fn unmanaged_in(inspected: &[Inspection]) -> usize {
    inspected
        .iter()
        .filter(|inspection| inspection.classification == Classification::Unmanaged)
        .count()
}

/// Regular files directly inside `dir` whose name satisfies `matches`,
/// sorted by name. Symlinks are followed.
pub fn list_files(dir: &Path, matches: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Failed to read entry in {}: {e}", dir.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_str().is_some_and(&matches))
        .map(walkdir::DirEntry::into_path)
        .collect()
}
