//! `slash-man agents`

use crate::settings;
use anyhow::Result;
use clap::Args;
use serde_json::json;
use slashman_scanner::agents::current_platform;
use slashman_scanner::SUPPORTED_AGENTS;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Arguments for `slash-man agents`
#[derive(Args)]
pub struct AgentsArgs {
    /// Base directory to check for installed agents (defaults to home)
    #[arg(short, long)]
    pub target_path: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AgentsArgs) -> Result<()> {
    let base = settings::base_path(args.target_path)?;
    if args.json {
        println!("{}", agents_json(&base)?);
    } else {
        print!("{}", agents_table(&base));
    }
    Ok(())
}

/// One line per supported agent, with its command directory under `base`
pub fn agents_table(base: &Path) -> String {
    let platform = current_platform();
    let key_width = SUPPORTED_AGENTS.iter().map(|a| a.key.len()).max().unwrap_or(0);
    let name_width = SUPPORTED_AGENTS.iter().map(|a| a.display_name.len()).max().unwrap_or(0);

    let mut out = String::from("Supported agents:\n");
    for agent in SUPPORTED_AGENTS {
        let marker = if agent.is_installed(base) { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {:key_width$}  {:name_width$}  {:8}  {}",
            agent.key,
            agent.display_name,
            agent.command_format.as_str(),
            agent.command_path(base, platform).display(),
        );
    }
    let _ = writeln!(out, "\n* detected under {}", base.display());
    out
}

fn agents_json(base: &Path) -> Result<String> {
    let platform = current_platform();
    let agents: Vec<_> = SUPPORTED_AGENTS
        .iter()
        .map(|agent| {
            json!({
                "key": agent.key,
                "display_name": agent.display_name,
                "command_format": agent.command_format,
                "command_file_extension": agent.command_file_extension,
                "command_dir": agent.command_path(base, platform),
                "detected": agent.is_installed(base),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&agents)?)
}
