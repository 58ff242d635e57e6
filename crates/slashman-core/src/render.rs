//! Rendering prompts into agent command files

use crate::error::{CoreError, CoreResult};
use crate::util::sanitize_command_stem;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use slashman_scanner::meta::MANAGED_BY;
use slashman_scanner::parser::{render_markdown, render_toml};
use slashman_scanner::{AgentConfig, CommandFormat, PromptMeta, PromptRecord, ScanError};

/// Version recorded in generated files
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Values shared by every file of one generation run
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub version: String,
    pub updated_at: DateTime<Utc>,
}

impl RenderContext {
    #[must_use]
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            version: GENERATOR_VERSION.to_string(),
            updated_at,
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// File name of `prompt_name` in `agent`'s command directory
#[must_use]
pub fn command_file_name(prompt_name: &str, agent: &AgentConfig) -> String {
    format!(
        "{}{}",
        sanitize_command_stem(prompt_name),
        agent.command_file_extension
    )
}

/// `meta` written into a generated command file.
///
/// Prompt-level extras come first; provenance and generation fields
/// override them.
#[must_use]
pub fn command_meta(prompt: &PromptRecord, agent: &AgentConfig, ctx: &RenderContext) -> PromptMeta {
    let mut meta = prompt.meta.clone();
    if let Some(source) = &prompt.source {
        meta.merge(source.to_meta().to_map());
    }

    meta.managed_by = Some(MANAGED_BY.to_string());
    meta.source_prompt = Some(prompt.name.clone());
    meta.version = Some(ctx.version.clone());
    meta.updated_at = Some(ctx.updated_at.to_rfc3339_opts(SecondsFormat::Secs, false));

    for (key, value) in [
        ("agent_id", agent.key),
        ("agent_display_name", agent.display_name),
        ("command_file_extension", agent.command_file_extension),
    ] {
        meta.insert(key.to_string(), Value::String(value.to_string()));
    }
    meta
}

/// Description for `agent`, honouring `agent_overrides.<key>.description`
#[must_use]
pub fn agent_description<'a>(prompt: &'a PromptRecord, agent: &AgentConfig) -> Option<&'a str> {
    prompt
        .agent_overrides
        .as_ref()
        .and_then(|overrides| overrides.get(agent.key))
        .and_then(|entry| entry.get("description"))
        .and_then(Value::as_str)
        .or(prompt.description.as_deref())
}

/// Render `prompt` in `agent`'s command format
///
/// # Errors
/// Returns `CoreError::Render` if the metadata cannot be encoded
pub fn render_command(prompt: &PromptRecord, agent: &AgentConfig, ctx: &RenderContext) -> CoreResult<String> {
    let meta = command_meta(prompt, agent, ctx);
    let description = agent_description(prompt, agent);

    let rendered = match agent.command_format {
        CommandFormat::Markdown => {
            let command = PromptRecord {
                description: description.map(str::to_string),
                meta,
                agent_overrides: None,
                source: None,
                ..prompt.clone()
            };
            render_markdown(&command)
        }
        CommandFormat::Toml => render_toml(description, &prompt.body, &meta),
    };

    rendered.map_err(|e| match e {
        ScanError::Render(message) => CoreError::Render {
            name: prompt.name.clone(),
            agent: agent.key.to_string(),
            message,
        },
        other => other.into(),
    })
}
