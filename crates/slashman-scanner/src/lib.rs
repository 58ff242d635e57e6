//! slash-man scanner - slash command discovery
//!
//! This crate provides the read-only side of slash-man: the agent
//! catalogue, the Markdown and TOML command codecs, file classification and
//! discovery of generated commands across agent directories.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::items_after_statements,
    clippy::single_match_else,
    clippy::match_same_arms,
    clippy::unnecessary_debug_formatting,
    clippy::ref_option,
    clippy::option_if_let_else,
    clippy::needless_pass_by_value,
    clippy::map_unwrap_or,
    clippy::manual_let_else,
    clippy::unnecessary_wraps,
    clippy::unused_self
)]

pub mod agents;
pub mod backup;
pub mod classify;
pub mod discovery;
pub mod error;
pub mod meta;
pub mod output;
pub mod parser;
pub mod prompt;
pub mod types;

pub use agents::{get_agent_config, AgentConfig, SUPPORTED_AGENTS};
pub use classify::classify;
pub use discovery::{DiscoveredPrompt, GroupedPromptView, ListReport, PromptScanner};
pub use error::{ScanError, ScanResult};
pub use meta::PromptMeta;
pub use parser::{CommandCodec, CommandDocument};
pub use prompt::{PromptArgument, PromptRecord, SourceMetadata};
pub use types::{Classification, ClassifiedFile, CommandFormat};
