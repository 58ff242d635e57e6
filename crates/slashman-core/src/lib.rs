//! slash-man core - prompt loading, command generation and cleanup
//!
//! This crate provides the write side of slash-man: loading prompt
//! sources, rendering them for each agent, resolving conflicts with
//! existing files, backups, and removal of generated files.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod apply;
pub mod backup;
pub mod cleanup;
pub mod error;
pub mod loader;
pub mod render;
pub mod util;

pub use slashman_scanner;

pub use apply::{ConflictResolver, FixedDecision, GenerationReport, Generator, OverwriteAction};
pub use cleanup::{Cleaner, CleanupReport};
pub use error::{CoreError, CoreResult};
pub use loader::{load_local_prompts, load_prompt_file, load_remote_prompts, RemoteFile, RemoteOrigin};
