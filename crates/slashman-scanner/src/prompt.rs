//! Prompt source records and their provenance

use crate::meta::{PromptMeta, SOURCE_TYPE_GITHUB, SOURCE_TYPE_LOCAL};
use crate::types::MetadataMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A declared prompt argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptArgument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
}

impl PromptArgument {
    /// A required argument with no description
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: true,
        }
    }
}

/// Where a prompt source file came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceMetadata {
    /// A prompt directory on disk
    Local { path: PathBuf, timestamp: DateTime<Utc> },
    /// A directory in a remote repository
    Remote {
        origin_url: String,
        owner: String,
        repo: String,
        branch: String,
        path: String,
        timestamp: DateTime<Utc>,
    },
}

impl SourceMetadata {
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Local { timestamp, .. } | Self::Remote { timestamp, .. } => *timestamp,
        }
    }

    /// Source fields recorded in a generated file's `meta`
    #[must_use]
    pub fn to_meta(&self) -> PromptMeta {
        match self {
            Self::Local { path, .. } => PromptMeta {
                source_type: Some(SOURCE_TYPE_LOCAL.to_string()),
                source_dir: Some(path.display().to_string()),
                ..Default::default()
            },
            Self::Remote {
                origin_url,
                owner,
                repo,
                branch,
                path,
                ..
            } => PromptMeta {
                source_type: Some(SOURCE_TYPE_GITHUB.to_string()),
                source_repo: Some(format!("{owner}/{repo}")),
                source_branch: Some(branch.clone()),
                source_path: Some(path.clone()),
                source_url: Some(origin_url.clone()),
                ..Default::default()
            },
        }
    }
}

/// One parsed prompt source file.
///
/// Built in two steps: the frontmatter parser fills in everything except
/// `source`, then [`PromptRecord::with_source`] attaches provenance. The
/// same parser therefore serves local and remote prompts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptRecord {
    /// File the prompt was read from (for remote prompts, the file name)
    pub path: PathBuf,
    /// Logical name: frontmatter `name`, else the file stem
    pub name: String,
    pub description: Option<String>,
    pub tags: BTreeSet<String>,
    pub enabled: bool,
    /// `meta` block merged with unreserved top-level keys
    pub meta: PromptMeta,
    pub arguments: Vec<PromptArgument>,
    /// Per-agent overrides, carried through untouched
    pub agent_overrides: Option<MetadataMap>,
    pub body: String,
    pub source: Option<SourceMetadata>,
}

impl PromptRecord {
    /// Attach provenance
    #[must_use]
    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }
}
