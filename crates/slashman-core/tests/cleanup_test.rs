//! Cleanup of generated command files

use slashman_core::cleanup::CleanupKind;
use slashman_core::slashman_scanner::agents::PLATFORM_LINUX;
use slashman_core::{Cleaner, CoreError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const GENERATED_MD: &str = "---\nname: review\nmeta:\n  source_prompt: review\n  version: 0.3.0\n---\n\nBody\n";
const LEGACY_TOML: &str = "description = \"old\"\nprompt = \"Body\"\n\n[meta]\nversion = \"0.1.0\"\n";
const HAND_WRITTEN_MD: &str = "---\ndescription: mine\n---\n\nBody\n";
const HAND_WRITTEN_TOML: &str = "prompt = \"Mine\"\n";

fn seed(base: &Path) {
    let claude = base.join(".claude/commands");
    let gemini = base.join(".gemini/commands");
    fs::create_dir_all(&claude).unwrap();
    fs::create_dir_all(&gemini).unwrap();

    fs::write(claude.join("review.md"), GENERATED_MD).unwrap();
    fs::write(claude.join("review.md.20250101-120000.bak"), "old").unwrap();
    fs::write(claude.join("mine.md"), HAND_WRITTEN_MD).unwrap();
    fs::write(claude.join("notes.md.bak"), "not a timestamped backup").unwrap();

    fs::write(gemini.join("legacy.toml"), LEGACY_TOML).unwrap();
    fs::write(gemini.join("mine.toml"), HAND_WRITTEN_TOML).unwrap();
}

fn cleaner(base: &Path) -> Cleaner {
    Cleaner::new(base).with_platform(PLATFORM_LINUX)
}

#[test]
fn test_finds_generated_files_and_backups() {
    let base = TempDir::new().unwrap();
    seed(base.path());

    let found = cleaner(base.path())
        .find_generated_files(&["claude-code", "gemini-cli"])
        .unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|c| c.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["review.md", "review.md.20250101-120000.bak", "legacy.toml"]
    );
    assert_eq!(found[0].kind, CleanupKind::Command);
    assert_eq!(found[1].kind, CleanupKind::Backup);
    assert_eq!(found[2].agent_key, "gemini-cli");
}

#[test]
fn test_without_backups() {
    let base = TempDir::new().unwrap();
    seed(base.path());

    let found = cleaner(base.path())
        .with_backups(false)
        .find_generated_files(&["claude-code"])
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, CleanupKind::Command);
}

#[test]
fn test_dry_run_deletes_nothing() {
    let base = TempDir::new().unwrap();
    seed(base.path());

    let report = cleaner(base.path())
        .cleanup(&["claude-code", "gemini-cli"], true)
        .unwrap();
    assert!(report.dry_run);
    assert_eq!(report.files_found, 3);
    assert_eq!(report.files_deleted, 3);
    assert!(base.path().join(".claude/commands/review.md").exists());
    assert!(base.path().join(".gemini/commands/legacy.toml").exists());
}

#[test]
fn test_cleanup_deletes_only_generated() {
    let base = TempDir::new().unwrap();
    seed(base.path());

    let report = cleaner(base.path())
        .cleanup(&["claude-code", "gemini-cli"], false)
        .unwrap();
    assert_eq!(report.files_deleted, 3);
    assert!(report.errors.is_empty());

    let claude = base.path().join(".claude/commands");
    assert!(!claude.join("review.md").exists());
    assert!(!claude.join("review.md.20250101-120000.bak").exists());
    assert!(claude.join("mine.md").exists());
    assert!(claude.join("notes.md.bak").exists());
    assert!(base.path().join(".gemini/commands/mine.toml").exists());
}

#[test]
fn test_missing_directories_are_empty() {
    let base = TempDir::new().unwrap();
    let report = cleaner(base.path()).cleanup(&["cursor"], false).unwrap();
    assert_eq!(report.files_found, 0);
}

#[test]
fn test_unknown_agent_is_an_error() {
    let base = TempDir::new().unwrap();
    let result = cleaner(base.path()).cleanup(&["nope"], true);
    assert!(matches!(result, Err(CoreError::Scan(_))));
}
