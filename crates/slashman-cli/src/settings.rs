//! Resolution of flags, environment and defaults

use anyhow::{bail, Context, Result};
use slashman_core::util::find_project_root;
use slashman_scanner::agents::{detect_agents, get_agent_configs};
use slashman_scanner::AgentConfig;
use std::path::{Path, PathBuf};

/// Directory name of the default prompt source under the project root
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";

/// Where prompts are loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    Local(PathBuf),
    GitHub(String),
}

/// `--target-path`, else the home directory
pub fn base_path(target: Option<PathBuf>) -> Result<PathBuf> {
    match target {
        Some(path) => Ok(path),
        None => dirs::home_dir().context("Could not determine the home directory; pass --target-path"),
    }
}

/// `--github-url`, else `--prompts-dir`, else `<project root>/prompts`
pub fn prompt_source(prompts_dir: Option<PathBuf>, github_url: Option<String>) -> PromptSource {
    match (github_url, prompts_dir) {
        (Some(url), _) => PromptSource::GitHub(url),
        (None, Some(dir)) => PromptSource::Local(dir),
        (None, None) => PromptSource::Local(find_project_root().join(DEFAULT_PROMPTS_DIR)),
    }
}

/// The requested agents, or those detected under `base` when none were
/// requested. May be empty.
pub fn agents(requested: &[String], base: &Path) -> Result<Vec<&'static AgentConfig>> {
    if requested.is_empty() {
        let detected = detect_agents(base);
        tracing::debug!(
            "Detected agents under {}: {:?}",
            base.display(),
            detected.iter().map(|a| a.key).collect::<Vec<_>>()
        );
        return Ok(detected);
    }
    Ok(get_agent_configs(requested)?)
}

/// Reject an explicit target path that is not a directory
pub fn check_target(base: &Path) -> Result<()> {
    if base.exists() && !base.is_dir() {
        bail!("Target path is not a directory: {}", base.display());
    }
    Ok(())
}
