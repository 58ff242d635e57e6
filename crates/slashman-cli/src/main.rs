//! slash-man CLI - manage slash commands across AI coding assistants
//!
//! Provides `slash-man generate`, `slash-man list`, `slash-man cleanup` and
//! `slash-man agents`.

mod commands;
mod logging;
mod prompt;
mod settings;

use clap::{Parser, Subcommand};
use commands::agents::AgentsArgs;
use commands::cleanup::CleanupArgs;
use commands::generate::GenerateArgs;
use commands::list::ListArgs;
use slashman_core::CoreError;

#[derive(Parser)]
#[command(name = "slash-man")]
#[command(about = "slash-man - generate and manage slash commands for AI coding assistants")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate slash command files from prompts
    Generate(GenerateArgs),
    /// List managed prompts found in agent command directories
    List(ListArgs),
    /// Delete generated command files and their backups
    Cleanup(CleanupArgs),
    /// List supported agents
    Agents(AgentsArgs),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::List(args) => commands::list::run(args),
        Commands::Cleanup(args) => commands::cleanup::run(args),
        Commands::Agents(args) => commands::agents::run(args),
    };

    if let Err(e) = result {
        if matches!(e.downcast_ref::<CoreError>(), Some(CoreError::Cancelled)) {
            eprintln!("Cancelled.");
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}
