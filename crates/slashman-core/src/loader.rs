//! Loading prompt sources from disk or from fetched file contents

use crate::error::{CoreError, CoreResult};
use chrono::Utc;
use slashman_scanner::discovery::list_files;
use slashman_scanner::parser::parse_markdown_prompt;
use slashman_scanner::{PromptRecord, SourceMetadata};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of prompt source files
pub const PROMPT_EXTENSION: &str = ".md";

/// Where a set of remote prompt files was fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOrigin {
    pub origin_url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
}

/// A fetched prompt file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub name: String,
    pub content: String,
}

/// Load a single prompt file, without provenance
///
/// # Errors
/// Returns an error if the file is missing or unreadable, or its
/// `arguments` are malformed
pub fn load_prompt_file(path: &Path) -> CoreResult<PromptRecord> {
    let content = fs::read_to_string(path).map_err(|e| CoreError::io(path, &e))?;
    Ok(parse_markdown_prompt(path, &content)?)
}

/// Load every `*.md` prompt directly inside `dir`, sorted by file name
///
/// # Errors
/// Returns `CoreError::PromptsDirMissing` if `dir` does not exist, or the
/// first error from [`load_prompt_file`]
pub fn load_local_prompts(dir: &Path) -> CoreResult<Vec<PromptRecord>> {
    if !dir.is_dir() {
        return Err(CoreError::PromptsDirMissing(dir.to_path_buf()));
    }

    let timestamp = Utc::now();
    let prompts = list_files(dir, |name| name.ends_with(PROMPT_EXTENSION))
        .into_iter()
        .map(|path| {
            load_prompt_file(&path).map(|prompt| {
                prompt.with_source(SourceMetadata::Local {
                    path: dir.to_path_buf(),
                    timestamp,
                })
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    tracing::info!("Loaded {} prompts from {}", prompts.len(), dir.display());
    Ok(prompts)
}

/// Parse fetched prompt files, sorted by file name. Names not ending in
/// `.md` are ignored.
///
/// # Errors
/// Returns the first `arguments` schema violation
pub fn load_remote_prompts(files: &[RemoteFile], origin: &RemoteOrigin) -> CoreResult<Vec<PromptRecord>> {
    let timestamp = Utc::now();
    let mut files: Vec<&RemoteFile> = files
        .iter()
        .filter(|file| file.name.ends_with(PROMPT_EXTENSION))
        .collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));

    let prompts = files
        .into_iter()
        .map(|file| {
            let path = PathBuf::from(&file.name);
            let prompt = parse_markdown_prompt(&path, &file.content)?;
            Ok(prompt.with_source(SourceMetadata::Remote {
                origin_url: origin.origin_url.clone(),
                owner: origin.owner.clone(),
                repo: origin.repo.clone(),
                branch: origin.branch.clone(),
                path: origin.path.clone(),
                timestamp,
            }))
        })
        .collect::<CoreResult<Vec<_>>>()?;

    tracing::info!(
        "Loaded {} prompts from {}/{}",
        prompts.len(),
        origin.owner,
        origin.repo
    );
    Ok(prompts)
}
