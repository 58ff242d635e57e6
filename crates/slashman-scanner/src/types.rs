//! Shared types for the slash command scanner

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A decoded key/value document (frontmatter block or TOML table)
pub type MetadataMap = serde_json::Map<String, serde_json::Value>;

/// On-disk format of an agent's command files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandFormat {
    /// Markdown body with a YAML frontmatter block
    Markdown,
    /// Flat TOML table with an optional `[meta]` table
    Toml,
}

impl CommandFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Toml => "toml",
        }
    }
}

impl fmt::Display for CommandFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "toml" => Ok(Self::Toml),
            _ => Err(format!("Invalid command format: {s}")),
        }
    }
}

/// Result of classifying a single file in an agent's command directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Generated by slash-man (`meta.managed_by == "slash-man"`)
    Managed,
    /// Valid command file without the managed marker
    Unmanaged,
    /// Timestamped copy created before an overwrite
    Backup,
    /// Unreadable, unparseable, or not a command file
    Other,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Managed => "managed",
            Self::Unmanaged => "unmanaged",
            Self::Backup => "backup",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// A file seen during a discovery pass. Recomputed on every scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedFile {
    /// Path to the file
    pub path: PathBuf,
    /// Agent whose command directory holds the file
    pub agent_key: String,
    /// How the file was classified
    pub classification: Classification,
}
