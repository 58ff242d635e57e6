//! CLI integration tests using assert_cmd
//!
//! These tests verify the CLI commands work correctly end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the slash-man binary
fn slash_man() -> Command {
    let mut cmd = Command::cargo_bin("slash-man").expect("Failed to find slash-man binary");
    cmd.env_remove("SLASH_MAN_LOG").env_remove("RUST_LOG");
    cmd
}

const REVIEW_PR: &str = "---\nname: review-pr\ndescription: Review a pull request\n---\n\nReview the diff.\n";

struct Workspace {
    home: TempDir,
    prompts: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let prompts = TempDir::new().expect("Failed to create prompts dir");
        fs::write(prompts.path().join("review-pr.md"), REVIEW_PR).unwrap();
        Self {
            home: TempDir::new().expect("Failed to create home dir"),
            prompts,
        }
    }

    fn home(&self) -> &Path {
        self.home.path()
    }

    fn generate(&self) -> Command {
        let mut cmd = slash_man();
        cmd.arg("generate")
            .arg("--target-path")
            .arg(self.home())
            .arg("--prompts-dir")
            .arg(self.prompts.path())
            .args(["--agent", "claude-code", "--agent", "gemini-cli"]);
        cmd
    }
}

fn count_files(dir: &Path, suffix: &str) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.file_name().to_string_lossy().ends_with(suffix))
                .count()
        })
        .unwrap_or(0)
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_help_command() {
    slash_man()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate and manage slash commands"));
}

#[test]
fn test_version_command() {
    slash_man()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("slash-man"));
}

#[test]
fn test_generate_help() {
    slash_man()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--github-url"))
        .stdout(predicate::str::contains("--overwrite"));
}

// =============================================================================
// Agents
// =============================================================================

#[test]
fn test_agents_lists_catalogue() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join(".claude")).unwrap();

    slash_man()
        .args(["agents", "--target-path"])
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("claude-code"))
        .stdout(predicate::str::contains("gemini-cli"))
        .stdout(predicate::str::contains("windsurf"))
        .stdout(predicate::str::contains("* claude-code"));
}

#[test]
fn test_agents_json() {
    let home = TempDir::new().unwrap();
    let output = slash_man()
        .args(["agents", "--json", "--target-path"])
        .arg(home.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let agents: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let keys: Vec<_> = agents
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["key"].as_str().unwrap().to_string())
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(keys.len(), 8);
}

#[test]
fn test_generate_list_agents() {
    slash_man()
        .args(["generate", "--list-agents"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Supported agents"));
}

// =============================================================================
// Generate
// =============================================================================

#[test]
fn test_generate_writes_files() {
    let ws = Workspace::new();
    ws.generate()
        .assert()
        .success()
        .stdout(predicate::str::contains("Files written: 2"))
        .stdout(predicate::str::contains("created"));

    assert!(ws.home().join(".claude/commands/review-pr.md").is_file());
    let toml_text = fs::read_to_string(ws.home().join(".gemini/commands/review-pr.toml")).unwrap();
    assert!(toml_text.contains("managed_by = \"slash-man\""));
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let ws = Workspace::new();
    ws.generate()
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("would create"));

    assert!(!ws.home().join(".claude").exists());
    assert!(!ws.home().join(".gemini").exists());
}

#[test]
fn test_generate_json_report() {
    let ws = Workspace::new();
    let output = ws.generate().arg("--json").output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files_written"], 2);
    assert_eq!(report["prompts_loaded"], 1);
}

#[test]
fn test_generate_cancel_on_closed_stdin() {
    let ws = Workspace::new();
    ws.generate().assert().success();
    let before = fs::read_to_string(ws.home().join(".claude/commands/review-pr.md")).unwrap();

    ws.generate()
        .write_stdin("")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cancelled."));

    let after = fs::read_to_string(ws.home().join(".claude/commands/review-pr.md")).unwrap();
    assert_eq!(before, after);
    assert_eq!(count_files(&ws.home().join(".claude/commands"), ".bak"), 0);
}

#[test]
fn test_generate_interactive_backup() {
    let ws = Workspace::new();
    ws.generate().assert().success();

    ws.generate()
        .write_stdin("3\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 2 existing files"))
        .stdout(predicate::str::contains("Backups created"));

    assert_eq!(count_files(&ws.home().join(".claude/commands"), ".bak"), 1);
    assert_eq!(count_files(&ws.home().join(".gemini/commands"), ".bak"), 1);
}

#[test]
fn test_generate_overwrite_flag_skips_prompt() {
    let ws = Workspace::new();
    ws.generate().assert().success();

    ws.generate()
        .args(["--overwrite", "overwrite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("overwritten"));
    assert_eq!(count_files(&ws.home().join(".claude/commands"), ".bak"), 0);
}

#[test]
fn test_generate_invalid_overwrite_action() {
    let ws = Workspace::new();
    ws.generate()
        .args(["--overwrite", "skip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid overwrite action"));
}

#[test]
fn test_generate_missing_prompts_dir() {
    let home = TempDir::new().unwrap();
    slash_man()
        .arg("generate")
        .arg("--target-path")
        .arg(home.path())
        .arg("--prompts-dir")
        .arg(home.path().join("missing"))
        .args(["--agent", "claude-code"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Prompts directory does not exist"));
}

#[test]
fn test_generate_unknown_agent() {
    let ws = Workspace::new();
    slash_man()
        .arg("generate")
        .arg("--target-path")
        .arg(ws.home())
        .arg("--prompts-dir")
        .arg(ws.prompts.path())
        .args(["--agent", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Unsupported agent: nope"));
}

#[test]
fn test_generate_without_detected_agents_succeeds() {
    let ws = Workspace::new();
    slash_man()
        .arg("generate")
        .arg("--target-path")
        .arg(ws.home())
        .arg("--prompts-dir")
        .arg(ws.prompts.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No agents detected"));
}

#[test]
fn test_generate_uses_detected_agents() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.home().join(".gemini")).unwrap();
    slash_man()
        .arg("generate")
        .arg("--target-path")
        .arg(ws.home())
        .arg("--prompts-dir")
        .arg(ws.prompts.path())
        .assert()
        .success();
    assert!(ws.home().join(".gemini/commands/review-pr.toml").is_file());
    assert!(!ws.home().join(".claude").exists());
}

#[test]
fn test_prompt_sources_conflict() {
    slash_man()
        .args([
            "generate",
            "--prompts-dir",
            "prompts",
            "--github-url",
            "https://github.com/o/r/tree/main/prompts",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_invalid_github_url() {
    let home = TempDir::new().unwrap();
    slash_man()
        .arg("generate")
        .arg("--target-path")
        .arg(home.path())
        .args(["--agent", "claude-code", "--github-url", "https://gitlab.com/o/r/tree/main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid GitHub URL format"));
}

// =============================================================================
// List
// =============================================================================

#[test]
fn test_list_empty_state() {
    let home = TempDir::new().unwrap();
    slash_man()
        .args(["list", "--target-path"])
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No managed prompts found."));
}

#[test]
fn test_list_after_generate() {
    let ws = Workspace::new();
    ws.generate().assert().success();
    fs::write(
        ws.home().join(".claude/commands/mine.md"),
        "---\ndescription: hand written\n---\nBody\n",
    )
    .unwrap();

    slash_man()
        .args(["list", "--target-path"])
        .arg(ws.home())
        .assert()
        .success()
        .stdout(predicate::str::contains("Managed prompts (1)"))
        .stdout(predicate::str::contains("review-pr"))
        .stdout(predicate::str::contains("Claude Code (claude-code)"))
        .stdout(predicate::str::contains("Unmanaged prompts"));
}

#[test]
fn test_list_json() {
    let ws = Workspace::new();
    ws.generate().assert().success();

    let output = slash_man()
        .args(["list", "--json", "--target-path"])
        .arg(ws.home())
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report["prompts"]["review-pr"]["agents"].as_array().unwrap().len(),
        2
    );
    assert_eq!(report["unmanaged_counts"]["gemini-cli"], 0);
}

// =============================================================================
// Cleanup
// =============================================================================

#[test]
fn test_cleanup_nothing_found() {
    let home = TempDir::new().unwrap();
    slash_man()
        .args(["cleanup", "--target-path"])
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No generated files found."));
}

#[test]
fn test_cleanup_dry_run() {
    let ws = Workspace::new();
    ws.generate().assert().success();

    slash_man()
        .args(["cleanup", "--dry-run", "--target-path"])
        .arg(ws.home())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would delete 2 of 2 files."));
    assert!(ws.home().join(".claude/commands/review-pr.md").exists());
}

#[test]
fn test_cleanup_declined() {
    let ws = Workspace::new();
    ws.generate().assert().success();

    slash_man()
        .args(["cleanup", "--target-path"])
        .arg(ws.home())
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cancelled."));
    assert!(ws.home().join(".claude/commands/review-pr.md").exists());
}

#[test]
fn test_cleanup_removes_generated_and_backups() {
    let ws = Workspace::new();
    ws.generate().assert().success();
    ws.generate().args(["--overwrite", "backup"]).assert().success();

    slash_man()
        .args(["cleanup", "--yes", "--target-path"])
        .arg(ws.home())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 4 of 4 files."));
    assert_eq!(count_files(&ws.home().join(".claude/commands"), ""), 0);
    assert_eq!(count_files(&ws.home().join(".gemini/commands"), ""), 0);
}

#[test]
fn test_cleanup_keeps_backups() {
    let ws = Workspace::new();
    ws.generate().assert().success();
    ws.generate().args(["--overwrite", "backup"]).assert().success();

    slash_man()
        .args(["cleanup", "--yes", "--no-backups", "--target-path"])
        .arg(ws.home())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 of 2 files."));
    assert_eq!(count_files(&ws.home().join(".claude/commands"), ".bak"), 1);
}
