//! TOML command codec (Gemini CLI style)
//!
//! ```toml
//! description = "Review a pull request"
//! prompt = """..."""
//!
//! [meta]
//! managed_by = "slash-man"
//! source_prompt = "review-pr"
//! ```

use crate::error::{ScanError, ScanResult};
use crate::meta::PromptMeta;
use crate::parser::frontmatter::file_stem;
use crate::types::MetadataMap;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A parsed TOML command file
#[derive(Debug, Clone, PartialEq)]
pub struct TomlCommand {
    pub path: PathBuf,
    /// `meta.source_prompt`, else the file stem. Never derived from `prompt`.
    pub name: String,
    pub description: Option<String>,
    pub prompt: String,
    pub meta: PromptMeta,
}

/// Parse a TOML command file.
///
/// Returns `Ok(None)` when `meta` exists but is not a table; such a file is
/// not a usable command.
///
/// # Errors
/// Returns `ScanError::InvalidFormat` if the text is not valid TOML
pub fn parse_toml_command(path: &Path, content: &str) -> ScanResult<Option<TomlCommand>> {
    let mut table: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| ScanError::InvalidFormat(e.message().to_string()))?;

    let meta = match table.remove("meta") {
        None => PromptMeta::default(),
        Some(toml::Value::Table(meta)) => PromptMeta::from_map(table_to_map(meta)),
        Some(_) => return Ok(None),
    };

    let name = meta
        .source_prompt
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| file_stem(path));
    let description = table
        .get("description")
        .and_then(toml::Value::as_str)
        .map(str::to_string);
    let prompt = table
        .get("prompt")
        .and_then(toml::Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Some(TomlCommand {
        path: path.to_path_buf(),
        name,
        description,
        prompt,
        meta,
    }))
}

#[derive(Serialize)]
struct TomlCommandOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    prompt: &'a str,
    #[serde(skip_serializing_if = "toml::Table::is_empty")]
    meta: toml::Table,
}

/// Serialize a TOML command file. `null` meta values are dropped; TOML has
/// no representation for them.
///
/// # Errors
/// Returns `ScanError::Render` if a meta value cannot be encoded as TOML
pub fn render_toml(description: Option<&str>, prompt: &str, meta: &PromptMeta) -> ScanResult<String> {
    let out = TomlCommandOut {
        description: description.filter(|d| !d.is_empty()),
        prompt,
        meta: map_to_table(meta.to_map())?,
    };
    toml::to_string(&out).map_err(|e| ScanError::Render(e.to_string()))
}

fn table_to_map(table: toml::Table) -> MetadataMap {
    table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect()
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(table_to_map(table)),
    }
}

fn map_to_table(map: MetadataMap) -> ScanResult<toml::Table> {
    map.into_iter()
        .filter_map(|(key, value)| json_to_toml(value).map(|v| v.map(|v| (key, v))))
        .collect()
}

fn json_to_toml(value: Value) -> Option<ScanResult<toml::Value>> {
    let converted = match value {
        Value::Null => return None,
        Value::Bool(b) => toml::Value::Boolean(b),
        Value::String(s) => toml::Value::String(s),
        Value::Number(n) => match n.as_i64() {
            Some(i) => toml::Value::Integer(i),
            None => match n.as_f64() {
                Some(f) => toml::Value::Float(f),
                None => {
                    return Some(Err(ScanError::Render(format!(
                        "number out of range for TOML: {n}"
                    ))))
                }
            },
        },
        Value::Array(items) => {
            let items: ScanResult<Vec<_>> = items.into_iter().filter_map(json_to_toml).collect();
            match items {
                Ok(items) => toml::Value::Array(items),
                Err(e) => return Some(Err(e)),
            }
        }
        Value::Object(map) => match map_to_table(map) {
            Ok(table) => toml::Value::Table(table),
            Err(e) => return Some(Err(e)),
        },
    };
    Some(Ok(converted))
}
