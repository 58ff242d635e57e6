//! `slash-man cleanup`

use crate::prompt::confirm;
use crate::settings;
use anyhow::{bail, Result};
use clap::Args;
use slashman_core::cleanup::{CleanupCandidate, CleanupKind};
use slashman_core::{Cleaner, CoreError};
use slashman_scanner::agents::list_agent_keys;
use std::io;
use std::path::PathBuf;

/// Arguments for `slash-man cleanup`
#[derive(Args)]
pub struct CleanupArgs {
    /// Base directory containing agent command directories (defaults to home)
    #[arg(short, long)]
    pub target_path: Option<PathBuf>,

    /// Agent to clean up (can specify multiple times; defaults to all)
    #[arg(short, long = "agent", value_name = "KEY")]
    pub agents: Vec<String>,

    /// Show what would be deleted without deleting
    #[arg(long)]
    pub dry_run: bool,

    /// Keep backup files
    #[arg(long)]
    pub no_backups: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Output the cleanup report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CleanupArgs) -> Result<()> {
    let base = settings::base_path(args.target_path)?;
    let keys = if args.agents.is_empty() {
        list_agent_keys().into_iter().map(String::from).collect()
    } else {
        args.agents
    };
    let cleaner = Cleaner::new(&base).with_backups(!args.no_backups);

    let found = cleaner.find_generated_files(&keys)?;
    if found.is_empty() && !args.json {
        println!("No generated files found.");
        return Ok(());
    }

    if !args.dry_run && !args.yes {
        print_candidates(&found);
        let question = format!("Delete {} files?", found.len());
        if !confirm(&mut io::stdin().lock(), &mut io::stderr(), &question)? {
            return Err(CoreError::Cancelled.into());
        }
    }

    let report = cleaner.cleanup(&keys, args.dry_run)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if args.dry_run || args.yes {
            print_candidates(&report.files);
        }
        let verb = if args.dry_run { "Would delete" } else { "Deleted" };
        println!("\n{verb} {} of {} files.", report.files_deleted, report.files_found);
        for error in &report.errors {
            println!("  Failed: {}: {}", error.path.display(), error.message);
        }
    }

    if !report.errors.is_empty() {
        bail!("{} files could not be deleted", report.errors.len());
    }
    Ok(())
}

fn print_candidates(files: &[CleanupCandidate]) {
    println!("Generated files:");
    for file in files {
        let kind = match file.kind {
            CleanupKind::Command => "command",
            CleanupKind::Backup => "backup",
        };
        println!(
            "  {} [{}, {kind}] {}",
            file.path.display(),
            file.agent_display_name,
            file.reason
        );
    }
}
