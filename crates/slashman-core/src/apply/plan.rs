//! Destination planning and the batch overwrite decision

use crate::error::CoreResult;
use crate::render::command_file_name;
use crate::util::safe_join;
use serde::{Deserialize, Serialize};
use slashman_scanner::{AgentConfig, PromptRecord};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What to do with command files that already exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwriteAction {
    Cancel,
    Overwrite,
    Backup,
    /// Single-file answer meaning "overwrite this and every later file".
    /// For a whole batch it is the same as `Overwrite`.
    OverwriteAll,
}

impl OverwriteAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Overwrite => "overwrite",
            Self::Backup => "backup",
            Self::OverwriteAll => "overwrite-all",
        }
    }
}

impl fmt::Display for OverwriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverwriteAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cancel" => Ok(Self::Cancel),
            "overwrite" => Ok(Self::Overwrite),
            "backup" => Ok(Self::Backup),
            "overwrite-all" => Ok(Self::OverwriteAll),
            _ => Err(format!("Invalid overwrite action: {s}")),
        }
    }
}

/// Source of the single decision covering every conflicting file in a batch
pub trait ConflictResolver {
    /// Choose an action for `existing`. An interrupted prompt must answer
    /// `Cancel`.
    fn resolve(&mut self, existing: &[PathBuf]) -> OverwriteAction;
}

impl<F> ConflictResolver for F
where
    F: FnMut(&[PathBuf]) -> OverwriteAction,
{
    fn resolve(&mut self, existing: &[PathBuf]) -> OverwriteAction {
        self(existing)
    }
}

/// Resolver that always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub OverwriteAction);

impl ConflictResolver for FixedDecision {
    fn resolve(&mut self, _existing: &[PathBuf]) -> OverwriteAction {
        self.0
    }
}

/// Where a batch stands with respect to pre-existing files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictState {
    /// No destination exists yet
    NoConflict,
    /// Destinations exist and nobody has decided
    PendingDecision(Vec<PathBuf>),
    Cancelled,
    ApplyOverwrite,
    ApplyBackupThenOverwrite,
}

impl ConflictState {
    /// Initial state for a batch whose existing destinations are `existing`.
    /// A preset action only applies when something exists.
    #[must_use]
    pub fn new(existing: Vec<PathBuf>, preset: Option<OverwriteAction>) -> Self {
        if existing.is_empty() {
            return Self::NoConflict;
        }
        match preset {
            Some(action) => Self::from_action(action),
            None => Self::PendingDecision(existing),
        }
    }

    #[must_use]
    pub fn from_action(action: OverwriteAction) -> Self {
        match action {
            OverwriteAction::Cancel => Self::Cancelled,
            OverwriteAction::Overwrite | OverwriteAction::OverwriteAll => Self::ApplyOverwrite,
            OverwriteAction::Backup => Self::ApplyBackupThenOverwrite,
        }
    }

    /// Ask `resolver` if a decision is pending; other states are returned
    /// unchanged
    #[must_use]
    pub fn resolve(self, resolver: &mut dyn ConflictResolver) -> Self {
        match self {
            Self::PendingDecision(existing) => {
                let action = resolver.resolve(&existing);
                tracing::info!("Batch decision for {} existing files: {action}", existing.len());
                Self::from_action(action)
            }
            other => other,
        }
    }

    /// Whether existing files are copied before being replaced
    #[must_use]
    pub fn backs_up(&self) -> bool {
        matches!(self, Self::ApplyBackupThenOverwrite)
    }
}

/// One file a batch will write
#[derive(Debug, Clone)]
pub struct PlannedFile<'a> {
    pub prompt: &'a PromptRecord,
    pub agent: &'static AgentConfig,
    pub path: PathBuf,
}

/// Destinations for every enabled prompt and agent, prompt-major.
/// Disabled prompts are left out entirely. Each destination is planned at
/// most once: a later prompt whose name sanitizes to an already planned file
/// is skipped, so an existing file is backed up at most once per batch.
///
/// # Errors
/// Returns `CoreError::Path` if a destination escapes its command directory
pub fn plan_destinations<'a>(
    prompts: &'a [PromptRecord],
    agents: &[&'static AgentConfig],
    base_path: &Path,
    platform: &str,
) -> CoreResult<Vec<PlannedFile<'a>>> {
    let mut planned = Vec::new();
    let mut seen = BTreeSet::new();

    for prompt in prompts.iter().filter(|prompt| prompt.enabled) {
        for &agent in agents {
            let dir = agent.command_path(base_path, platform);
            let path = safe_join(&dir, Path::new(&command_file_name(&prompt.name, agent)))?;
            if !seen.insert(path.clone()) {
                tracing::warn!(
                    "Skipping prompt '{}': {} is already written by an earlier prompt",
                    prompt.name,
                    path.display()
                );
                continue;
            }
            planned.push(PlannedFile {
                prompt,
                agent,
                path,
            });
        }
    }

    Ok(planned)
}

/// Destinations of `planned` that already exist, each listed once
#[must_use]
pub fn find_existing_files(planned: &[PlannedFile<'_>]) -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    planned
        .iter()
        .filter(|file| file.path.exists())
        .filter(|file| seen.insert(file.path.clone()))
        .map(|file| file.path.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slashman_scanner::get_agent_config;
    use slashman_scanner::parser::parse_markdown_prompt;

    #[test]
    fn test_action_parsing() {
        assert_eq!("backup".parse(), Ok(OverwriteAction::Backup));
        assert_eq!("Overwrite-All".parse(), Ok(OverwriteAction::OverwriteAll));
        assert!("skip".parse::<OverwriteAction>().is_err());
    }

    #[test]
    fn test_state_transitions() {
        assert_eq!(ConflictState::new(vec![], None), ConflictState::NoConflict);
        assert_eq!(
            ConflictState::new(vec![], Some(OverwriteAction::Cancel)),
            ConflictState::NoConflict
        );
        let existing = vec![PathBuf::from("/a.md")];
        let pending = ConflictState::new(existing.clone(), None);
        assert_eq!(pending, ConflictState::PendingDecision(existing.clone()));

        let mut asked = 0;
        let mut resolver = |files: &[PathBuf]| {
            asked += files.len();
            OverwriteAction::Backup
        };
        let decided = pending.resolve(&mut resolver);
        assert_eq!(decided, ConflictState::ApplyBackupThenOverwrite);
        assert_eq!(asked, 1);

        assert_eq!(
            ConflictState::new(existing, Some(OverwriteAction::OverwriteAll)),
            ConflictState::ApplyOverwrite
        );
    }

    #[test]
    fn test_preset_skips_resolver() {
        let state = ConflictState::new(vec![PathBuf::from("/a.md")], Some(OverwriteAction::Cancel));
        let mut resolver = |_: &[PathBuf]| -> OverwriteAction { panic!("must not be asked") };
        assert_eq!(state.resolve(&mut resolver), ConflictState::Cancelled);
    }

    #[test]
    fn test_disabled_prompts_not_planned() {
        let active =
            parse_markdown_prompt(Path::new("active.md"), "---\nname: active\n---\nx").unwrap();
        let paused = parse_markdown_prompt(
            Path::new("paused.md"),
            "---\nname: paused\nenabled: false\n---\nx",
        )
        .unwrap();
        let prompts = vec![active, paused];
        let agents = vec![get_agent_config("claude-code").unwrap()];
        let planned = plan_destinations(&prompts, &agents, Path::new("/home/u"), "linux").unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].path, PathBuf::from("/home/u/.claude/commands/active.md"));
    }

    #[test]
    fn test_colliding_names_planned_once() {
        let spaced =
            parse_markdown_prompt(Path::new("a.md"), "---\nname: review pr\n---\nx").unwrap();
        let dashed =
            parse_markdown_prompt(Path::new("b.md"), "---\nname: review-pr\n---\ny").unwrap();
        let prompts = vec![spaced, dashed];
        let agents = vec![get_agent_config("claude-code").unwrap()];
        let planned = plan_destinations(&prompts, &agents, Path::new("/home/u"), "linux").unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].prompt.name, "review pr");
        assert_eq!(planned[0].path, PathBuf::from("/home/u/.claude/commands/review-pr.md"));
    }
}
