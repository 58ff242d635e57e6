//! YAML frontmatter codec for Markdown prompts and commands

use crate::error::{ScanError, ScanResult};
use crate::meta::PromptMeta;
use crate::prompt::{PromptArgument, PromptRecord};
use crate::types::MetadataMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// Frontmatter delimiter
pub const DELIMITER: &str = "---";

/// Top-level keys that are not folded into `meta`
pub const RESERVED_KEYS: &[&str] = &[
    "name",
    "description",
    "tags",
    "arguments",
    "meta",
    "enabled",
    "agent_overrides",
];

/// Split `content` into its frontmatter mapping and body.
///
/// Never fails. Content that does not start with `---`, or whose block is
/// unterminated, has no frontmatter and keeps its full text as body. YAML
/// that does not decode to a mapping yields an empty mapping, so an empty
/// result does not mean the input was valid.
#[must_use]
pub fn split_frontmatter(content: &str) -> (MetadataMap, String) {
    if !content.starts_with(DELIMITER) {
        return (MetadataMap::new(), content.to_string());
    }

    let parts: Vec<&str> = content.splitn(3, DELIMITER).collect();
    if parts.len() < 3 {
        return (MetadataMap::new(), content.to_string());
    }

    let frontmatter = match serde_yml::from_str::<Value>(parts[1]) {
        Ok(Value::Object(map)) => map,
        Ok(_) => MetadataMap::new(),
        Err(e) => {
            tracing::debug!("Ignoring malformed frontmatter: {e}");
            MetadataMap::new()
        }
    };

    (frontmatter, parts[2].trim().to_string())
}

/// Parse a Markdown prompt source file
///
/// # Errors
/// Returns `ScanError::SchemaViolation` if `arguments` is malformed.
/// Malformed YAML is not an error (see [`split_frontmatter`]).
pub fn parse_markdown_prompt(path: &Path, content: &str) -> ScanResult<PromptRecord> {
    let (mut frontmatter, body) = split_frontmatter(content);

    let name = frontmatter
        .get("name")
        .and_then(scalar_string)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| file_stem(path));
    let description = frontmatter.get("description").and_then(scalar_string);
    let tags = frontmatter.get("tags").map(tag_set).unwrap_or_default();
    let enabled = frontmatter.get("enabled").map_or(true, truthy);
    let arguments = normalize_arguments(frontmatter.get("arguments"))?;
    let agent_overrides = match frontmatter.remove("agent_overrides") {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    };

    let mut meta = match frontmatter.remove("meta") {
        Some(Value::Object(map)) => PromptMeta::from_map(map),
        _ => PromptMeta::default(),
    };
    let additional: MetadataMap = frontmatter
        .into_iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .collect();
    meta.merge(additional);

    Ok(PromptRecord {
        path: path.to_path_buf(),
        name,
        description,
        tags,
        enabled,
        meta,
        arguments,
        agent_overrides,
        body,
        source: None,
    })
}

/// Normalize the `arguments` field.
///
/// Accepts a list of bare names (each required) or a list of mappings with
/// at least a string `name`.
///
/// # Errors
/// Returns `ScanError::SchemaViolation` for any other shape
pub fn normalize_arguments(raw: Option<&Value>) -> ScanResult<Vec<PromptArgument>> {
    let entries = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(ScanError::SchemaViolation(
                "arguments metadata must be a list of argument definitions".into(),
            ))
        }
    };

    entries
        .iter()
        .map(|entry| match entry {
            Value::String(name) => Ok(PromptArgument::required(name.clone())),
            Value::Object(map) => {
                let name = map
                    .get("name")
                    .and_then(Value::as_str)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| {
                        ScanError::SchemaViolation(
                            "argument definitions must include a string 'name'".into(),
                        )
                    })?;
                Ok(PromptArgument {
                    name: name.to_string(),
                    description: map.get("description").and_then(scalar_string),
                    required: map.get("required").map_or(true, truthy),
                })
            }
            _ => Err(ScanError::SchemaViolation(
                "each argument definition must be a string or mapping".into(),
            )),
        })
        .collect()
}

#[derive(Serialize)]
struct FrontmatterOut<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arguments: Option<&'a [PromptArgument]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    agent_overrides: Option<&'a MetadataMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a PromptMeta>,
}

/// Serialize a prompt as `---\n<yaml>---\n\n<body>\n`.
///
/// Key order is fixed; tags are sorted. `description`, `tags` and `meta`
/// are omitted when empty and `enabled` is written only when false.
///
/// # Errors
/// Returns `ScanError::Render` if the metadata cannot be encoded as YAML
pub fn render_markdown(prompt: &PromptRecord) -> ScanResult<String> {
    let out = FrontmatterOut {
        name: &prompt.name,
        description: prompt.description.as_deref().filter(|d| !d.is_empty()),
        tags: (!prompt.tags.is_empty()).then_some(&prompt.tags),
        arguments: (!prompt.arguments.is_empty()).then_some(prompt.arguments.as_slice()),
        enabled: (!prompt.enabled).then_some(false),
        agent_overrides: prompt.agent_overrides.as_ref().filter(|m| !m.is_empty()),
        meta: (!prompt.meta.is_empty()).then_some(&prompt.meta),
    };
    let yaml = serde_yml::to_string(&out).map_err(|e| ScanError::Render(e.to_string()))?;

    let mut content = String::with_capacity(yaml.len() + prompt.body.len() + 16);
    content.push_str(DELIMITER);
    content.push('\n');
    content.push_str(&yaml);
    if !yaml.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(DELIMITER);
    content.push_str("\n\n");
    content.push_str(prompt.body.trim());
    content.push('\n');
    Ok(content)
}

/// File stem used as the fallback prompt name
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("command")
        .to_string()
}

pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn tag_set(raw: &Value) -> BTreeSet<String> {
    match raw {
        Value::Null => BTreeSet::new(),
        Value::Array(items) => items.iter().filter_map(scalar_string).collect(),
        Value::Object(map) => map.keys().cloned().collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
