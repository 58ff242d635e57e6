//! Classification of files found in an agent's command directory

use crate::agents::AgentConfig;
use crate::backup::is_backup_path;
use crate::parser::{CommandCodec, CommandDocument};
use crate::types::Classification;
use std::fs;
use std::path::Path;

/// A classified file together with the document it parsed to, if any
#[derive(Debug, Clone)]
pub struct Inspection {
    pub classification: Classification,
    /// Present for `Managed` and `Unmanaged` files
    pub document: Option<CommandDocument>,
}

impl Inspection {
    fn without_document(classification: Classification) -> Self {
        Self {
            classification,
            document: None,
        }
    }
}

/// Classify `path` as a command file of `agent`
#[must_use]
pub fn classify(path: &Path, agent: &AgentConfig) -> Classification {
    inspect(path, agent).classification
}

/// Classify `path` and keep the parsed document.
///
/// First match wins:
/// 1. backup file name → `Backup` (content is never read)
/// 2. unreadable file → `Other`
/// 3. undecodable or not a command file → `Other`
/// 4. `meta.managed_by == "slash-man"` → `Managed`
/// 5. anything else → `Unmanaged`
#[must_use]
pub fn inspect(path: &Path, agent: &AgentConfig) -> Inspection {
    if is_backup_path(path) {
        return Inspection::without_document(Classification::Backup);
    }

    // Covers the file vanishing between listing and reading
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("Skipping unreadable {}: {e}", path.display());
            return Inspection::without_document(Classification::Other);
        }
    };

    let codec = CommandCodec::for_format(agent.command_format);
    let document = match codec.parse(path, &content) {
        Ok(Some(document)) => document,
        Ok(None) => return Inspection::without_document(Classification::Other),
        Err(e) => {
            tracing::debug!("Skipping malformed {}: {e}", path.display());
            return Inspection::without_document(Classification::Other);
        }
    };

    let classification = if document.meta.is_managed() {
        Classification::Managed
    } else {
        Classification::Unmanaged
    };
    Inspection {
        classification,
        document: Some(document),
    }
}
