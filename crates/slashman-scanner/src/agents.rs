//! Catalogue of supported coding-assistant tools
//!
//! Each agent has a command directory (relative to a base path, usually the
//! user's home), a file format and an extension. The catalogue is static and
//! sorted by key.

use crate::error::{ScanError, ScanResult};
use crate::types::CommandFormat;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Platform identifiers used for per-OS command directories
pub const PLATFORM_LINUX: &str = "linux";
pub const PLATFORM_MACOS: &str = "darwin";
pub const PLATFORM_WINDOWS: &str = "win32";

/// How to generate and discover commands for one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentConfig {
    /// Unique short identifier, e.g. `claude-code`
    pub key: &'static str,
    /// Human-readable label
    pub display_name: &'static str,
    /// Default command directory, relative to the base path
    pub command_dir: &'static str,
    /// File format of generated commands
    pub command_format: CommandFormat,
    /// Extension including the leading dot
    pub command_file_extension: &'static str,
    /// Relative paths whose presence means the tool is installed
    pub detection_dirs: &'static [&'static str],
    /// Per-platform overrides of `command_dir`
    pub platform_command_dirs: Option<&'static [(&'static str, &'static str)]>,
}

impl AgentConfig {
    /// Command directory for the given platform id.
    ///
    /// Unknown platforms, and agents without overrides, use `command_dir`.
    #[must_use]
    pub fn command_dir_for(&self, platform: &str) -> &'static str {
        self.platform_command_dirs
            .and_then(|dirs| dirs.iter().find(|(id, _)| *id == platform))
            .map_or(self.command_dir, |(_, dir)| dir)
    }

    /// Absolute command directory under `base` for the given platform
    #[must_use]
    pub fn command_path(&self, base: &Path, platform: &str) -> PathBuf {
        base.join(self.command_dir_for(platform))
    }

    /// Whether any detection directory exists under `base`
    #[must_use]
    pub fn is_installed(&self, base: &Path) -> bool {
        self.detection_dirs.iter().any(|dir| base.join(dir).is_dir())
    }
}

const VS_CODE_DIRS: &[(&str, &str)] = &[
    (PLATFORM_LINUX, ".config/Code/User/prompts"),
    (PLATFORM_MACOS, "Library/Application Support/Code/User/prompts"),
    (PLATFORM_WINDOWS, "AppData/Roaming/Code/User/prompts"),
];

/// All supported agents, sorted by key
pub static SUPPORTED_AGENTS: &[AgentConfig] = &[
    AgentConfig {
        key: "amazon-q",
        display_name: "Amazon Q",
        command_dir: ".aws/amazonq/prompts",
        command_format: CommandFormat::Markdown,
        command_file_extension: ".md",
        detection_dirs: &[".aws/amazonq"],
        platform_command_dirs: None,
    },
    AgentConfig {
        key: "claude-code",
        display_name: "Claude Code",
        command_dir: ".claude/commands",
        command_format: CommandFormat::Markdown,
        command_file_extension: ".md",
        detection_dirs: &[".claude"],
        platform_command_dirs: None,
    },
    AgentConfig {
        key: "codex-cli",
        display_name: "Codex CLI",
        command_dir: ".codex/prompts",
        command_format: CommandFormat::Markdown,
        command_file_extension: ".md",
        detection_dirs: &[".codex"],
        platform_command_dirs: None,
    },
    AgentConfig {
        key: "cursor",
        display_name: "Cursor",
        command_dir: ".cursor/commands",
        command_format: CommandFormat::Markdown,
        command_file_extension: ".md",
        detection_dirs: &[".cursor"],
        platform_command_dirs: None,
    },
    AgentConfig {
        key: "gemini-cli",
        display_name: "Gemini CLI",
        command_dir: ".gemini/commands",
        command_format: CommandFormat::Toml,
        command_file_extension: ".toml",
        detection_dirs: &[".gemini"],
        platform_command_dirs: None,
    },
    AgentConfig {
        key: "opencode",
        display_name: "OpenCode CLI",
        command_dir: ".config/opencode/command",
        command_format: CommandFormat::Markdown,
        command_file_extension: ".md",
        detection_dirs: &[".opencode"],
        platform_command_dirs: None,
    },
    AgentConfig {
        key: "vs-code",
        display_name: "VS Code",
        command_dir: ".config/Code/User/prompts",
        command_format: CommandFormat::Markdown,
        command_file_extension: ".prompt.md",
        detection_dirs: &[
            ".config/Code",
            "Library/Application Support/Code",
            "AppData/Roaming/Code",
        ],
        platform_command_dirs: Some(VS_CODE_DIRS),
    },
    AgentConfig {
        key: "windsurf",
        display_name: "Windsurf",
        command_dir: ".codeium/windsurf/global_workflows",
        command_format: CommandFormat::Markdown,
        command_file_extension: ".md",
        detection_dirs: &[".codeium", ".codeium/windsurf"],
        platform_command_dirs: None,
    },
];

/// Platform id of the running binary
#[must_use]
pub fn current_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        PLATFORM_MACOS
    } else if cfg!(windows) {
        PLATFORM_WINDOWS
    } else {
        PLATFORM_LINUX
    }
}

/// Look up an agent by key
///
/// # Errors
/// Returns `ScanError::UnknownAgent` if the key is not registered
pub fn get_agent_config(key: &str) -> ScanResult<&'static AgentConfig> {
    SUPPORTED_AGENTS
        .iter()
        .find(|agent| agent.key == key)
        .ok_or_else(|| ScanError::UnknownAgent(key.to_string()))
}

/// Resolve a list of keys, failing on the first unknown one
pub fn get_agent_configs<S: AsRef<str>>(keys: &[S]) -> ScanResult<Vec<&'static AgentConfig>> {
    keys.iter().map(|key| get_agent_config(key.as_ref())).collect()
}

/// All agent keys, sorted lexicographically
#[must_use]
pub fn list_agent_keys() -> Vec<&'static str> {
    let mut keys: Vec<_> = SUPPORTED_AGENTS.iter().map(|agent| agent.key).collect();
    keys.sort_unstable();
    keys
}

/// Command directory for `agent` on `platform`
#[must_use]
pub fn resolve_command_dir(agent: &AgentConfig, platform: &str) -> &'static str {
    agent.command_dir_for(platform)
}

/// Agents with at least one detection directory under `base`, in registry order
#[must_use]
pub fn detect_agents(base: &Path) -> Vec<&'static AgentConfig> {
    SUPPORTED_AGENTS
        .iter()
        .filter(|agent| agent.is_installed(base))
        .collect()
}
