//! Parsers for prompt sources and agent command files

pub mod frontmatter;
pub mod toml_command;

pub use frontmatter::{parse_markdown_prompt, render_markdown, split_frontmatter};
pub use toml_command::{parse_toml_command, render_toml, TomlCommand};

use crate::error::ScanResult;
use crate::meta::PromptMeta;
use crate::types::CommandFormat;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// The parts of a command file the scanner cares about
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDocument {
    pub path: PathBuf,
    /// Logical prompt name the file belongs to
    pub name: String,
    pub description: Option<String>,
    /// The file's explicit `meta` block
    pub meta: PromptMeta,
    pub format: CommandFormat,
}

/// Codec for one command file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCodec {
    Markdown,
    Toml,
}

impl CommandCodec {
    #[must_use]
    pub fn for_format(format: CommandFormat) -> Self {
        match format {
            CommandFormat::Markdown => Self::Markdown,
            CommandFormat::Toml => Self::Toml,
        }
    }

    /// Parse a command file.
    ///
    /// `Ok(None)` means the text decoded but is not a command file: Markdown
    /// without frontmatter, or TOML whose `meta` is not a table.
    ///
    /// # Errors
    /// Returns `ScanError::InvalidFormat` for undecodable TOML
    pub fn parse(self, path: &Path, content: &str) -> ScanResult<Option<CommandDocument>> {
        match self {
            Self::Markdown => Ok(parse_markdown_command(path, content)),
            Self::Toml => Ok(parse_toml_command(path, content)?.map(|cmd| CommandDocument {
                path: cmd.path,
                name: cmd.name,
                description: cmd.description,
                meta: cmd.meta,
                format: CommandFormat::Toml,
            })),
        }
    }

    /// Whether `content` carries the marker of a slash-man generated file
    /// (`meta.source_prompt` or `meta.version`). Unparseable text is not
    /// generated.
    #[must_use]
    pub fn is_generated(self, content: &str) -> bool {
        self.parse(Path::new(""), content)
            .ok()
            .flatten()
            .is_some_and(|doc| doc.meta.has_generated_marker())
    }
}

fn parse_markdown_command(path: &Path, content: &str) -> Option<CommandDocument> {
    let (mut fields, _body) = split_frontmatter(content);
    if fields.is_empty() {
        return None;
    }

    let name = fields
        .get("name")
        .and_then(frontmatter::scalar_string)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| frontmatter::file_stem(path));
    let description = fields.get("description").and_then(frontmatter::scalar_string);
    let meta = match fields.remove("meta") {
        Some(Value::Object(map)) => PromptMeta::from_map(map),
        _ => PromptMeta::default(),
    };

    Some(CommandDocument {
        path: path.to_path_buf(),
        name,
        description,
        meta,
        format: CommandFormat::Markdown,
    })
}
