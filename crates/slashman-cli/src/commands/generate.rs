//! `slash-man generate`

use crate::commands::agents::agents_table;
use crate::prompt::ConflictPrompt;
use crate::settings::{self, PromptSource};
use anyhow::{bail, Context, Result};
use clap::Args;
use slashman_core::apply::WriteAction;
use slashman_core::{
    load_local_prompts, load_remote_prompts, GenerationReport, Generator, OverwriteAction,
    RemoteFile, RemoteOrigin,
};
use slashman_github::{parse_github_url, GitHubClient};
use slashman_scanner::agents::list_agent_keys;
use slashman_scanner::PromptRecord;
use std::fmt::Write;
use std::io;
use std::path::PathBuf;

/// Arguments for `slash-man generate`
#[derive(Args)]
pub struct GenerateArgs {
    /// List supported agents and exit
    #[arg(long)]
    pub list_agents: bool,

    /// Agent to generate for (can specify multiple times; defaults to
    /// agents detected under the target path)
    #[arg(short, long = "agent", value_name = "KEY")]
    pub agents: Vec<String>,

    /// Directory containing prompt files (defaults to <project root>/prompts)
    #[arg(short, long, conflicts_with = "github_url")]
    pub prompts_dir: Option<PathBuf>,

    /// GitHub tree URL to fetch prompts from, e.g.
    /// https://github.com/owner/repo/tree/main/prompts
    #[arg(long, value_name = "URL")]
    pub github_url: Option<String>,

    /// Base directory for agent command directories (defaults to home)
    #[arg(short, long)]
    pub target_path: Option<PathBuf>,

    /// Show what would be written without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Action for existing files instead of asking: cancel, overwrite,
    /// backup or overwrite-all
    #[arg(long, value_name = "ACTION")]
    pub overwrite: Option<OverwriteAction>,

    /// Do not ask; existing files are backed up unless --overwrite says
    /// otherwise
    #[arg(short, long)]
    pub yes: bool,

    /// Output the generation report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let base = settings::base_path(args.target_path)?;
    if args.list_agents {
        print!("{}", agents_table(&base));
        return Ok(());
    }
    settings::check_target(&base)?;

    let agents = settings::agents(&args.agents, &base)?;
    if agents.is_empty() {
        println!("No agents detected under {}.", base.display());
        println!("Use --agent to choose from: {}", list_agent_keys().join(", "));
        return Ok(());
    }

    let source = settings::prompt_source(args.prompts_dir, args.github_url);
    let prompts = load_prompts(&source)?;
    if prompts.is_empty() {
        println!("No prompts found in {}.", describe(&source));
        return Ok(());
    }

    let overwrite = args
        .overwrite
        .or_else(|| args.yes.then_some(OverwriteAction::Backup));
    let generator = Generator::new(&base, agents)
        .with_dry_run(args.dry_run)
        .with_overwrite_action(overwrite);

    let mut resolver = ConflictPrompt::new(io::stdin().lock(), io::stderr());
    let report = generator.generate(&prompts, &mut resolver)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    if report.has_errors() {
        bail!("{} files could not be written", report.errors.len());
    }
    Ok(())
}

fn describe(source: &PromptSource) -> String {
    match source {
        PromptSource::Local(dir) => dir.display().to_string(),
        PromptSource::GitHub(url) => url.clone(),
    }
}

fn load_prompts(source: &PromptSource) -> Result<Vec<PromptRecord>> {
    match source {
        PromptSource::Local(dir) => Ok(load_local_prompts(dir)?),
        PromptSource::GitHub(url) => fetch_github_prompts(url),
    }
}

fn fetch_github_prompts(url: &str) -> Result<Vec<PromptRecord>> {
    let target = parse_github_url(url)?;
    let client = GitHubClient::from_env()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let files = runtime
        .block_on(async {
            let info = client.repo_info(&target.owner, &target.repo).await?;
            tracing::info!(
                "Fetching prompts from {} (default branch {})",
                info.full_name,
                info.default_branch
            );
            client.fetch_prompt_files(&target).await
        })
        .with_context(|| format!("Failed to fetch prompts from {url}"))?;

    let files: Vec<RemoteFile> = files
        .into_iter()
        .map(|file| RemoteFile {
            name: file.name,
            content: file.content,
        })
        .collect();
    let origin = RemoteOrigin {
        origin_url: url.to_string(),
        owner: target.owner,
        repo: target.repo,
        branch: target.branch,
        path: target.path,
    };
    Ok(load_remote_prompts(&files, &origin)?)
}

fn action_label(action: WriteAction, dry_run: bool) -> &'static str {
    match (action, dry_run) {
        (WriteAction::Create, false) => "created",
        (WriteAction::Create, true) => "would create",
        (WriteAction::Overwrite, false) => "overwritten",
        (WriteAction::Overwrite, true) => "would overwrite",
        (WriteAction::BackupAndOverwrite, false) => "backed up and overwritten",
        (WriteAction::BackupAndOverwrite, true) => "would back up and overwrite",
    }
}

/// Human-readable summary of a generation run
pub fn format_report(report: &GenerationReport) -> String {
    let mut out = String::new();
    if report.dry_run {
        let _ = writeln!(out, "Dry run - no files were written.");
    }
    let enabled = report.prompts.iter().filter(|p| p.enabled).count();
    let _ = writeln!(
        out,
        "Prompts loaded: {} ({} enabled)",
        report.prompts_loaded, enabled
    );
    let _ = writeln!(out, "Files written: {}", report.files_written);

    if !report.files.is_empty() {
        let _ = writeln!(out, "\nFiles:");
        for file in &report.files {
            let _ = writeln!(
                out,
                "  {} [{}] {}",
                file.path.display(),
                file.agent_display_name,
                action_label(file.action, report.dry_run)
            );
        }
    }

    if !report.backups_created.is_empty() {
        let heading = if report.dry_run { "Backups that would be created" } else { "Backups created" };
        let _ = writeln!(out, "\n{heading}:");
        for backup in &report.backups_created {
            let _ = writeln!(out, "  {}", backup.display());
        }
    }

    if report.has_errors() {
        let _ = writeln!(out, "\nErrors:");
        for error in &report.errors {
            let _ = writeln!(out, "  {}: {}", error.path.display(), error.message);
        }
    }
    out
}
