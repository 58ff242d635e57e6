//! `slash-man list`

use crate::settings;
use anyhow::Result;
use clap::Args;
use slashman_scanner::agents::list_agent_keys;
use slashman_scanner::output::{to_json, to_text};
use slashman_scanner::PromptScanner;
use std::path::PathBuf;

/// Arguments for `slash-man list`
#[derive(Args)]
pub struct ListArgs {
    /// Base directory containing agent command directories (defaults to home)
    #[arg(short, long)]
    pub target_path: Option<PathBuf>,

    /// Agent to scan (can specify multiple times; defaults to all)
    #[arg(short, long = "agent", value_name = "KEY")]
    pub agents: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ListArgs) -> Result<()> {
    let base = settings::base_path(args.target_path)?;
    let keys = if args.agents.is_empty() {
        list_agent_keys().into_iter().map(String::from).collect()
    } else {
        args.agents
    };

    let report = PromptScanner::new(&base).list_report(&keys)?;
    if args.json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", to_text(&report));
    }
    Ok(())
}
