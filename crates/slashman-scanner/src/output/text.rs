//! Plain-text tree output formatter

use crate::agents::get_agent_config;
use crate::discovery::ListReport;
use std::fmt::Write;

/// Shown instead of an empty list
pub const EMPTY_STATE: &str = "No managed prompts found.";

/// Render a list report as a text tree
#[must_use]
pub fn to_text(report: &ListReport) -> String {
    let mut output = String::new();

    if report.is_empty() {
        output.push_str(EMPTY_STATE);
        output.push('\n');
    } else {
        let _ = writeln!(output, "Managed prompts ({})\n", report.prompts.len());

        for group in report.prompts.values() {
            let _ = writeln!(output, "{}", group.name);
            let _ = writeln!(output, "  Source:  {}", group.source_info);
            let _ = writeln!(
                output,
                "  Updated: {}",
                group.updated_at.as_deref().unwrap_or("unknown")
            );

            let last = group.agents.len().saturating_sub(1);
            for (i, entry) in group.agents.iter().enumerate() {
                let (branch, rail) = if i == last { ("└─", " ") } else { ("├─", "│") };
                let _ = writeln!(
                    output,
                    "  {branch} {} ({})",
                    entry.display_name, entry.agent_key
                );
                let _ = writeln!(output, "  {rail}    Path:    {}", entry.file_path.display());
                let _ = writeln!(output, "  {rail}    Backups: {}", entry.backup_count);
            }
            output.push('\n');
        }
    }

    let unmanaged: Vec<_> = report
        .unmanaged_counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .collect();
    if !unmanaged.is_empty() {
        if report.is_empty() {
            output.push('\n');
        }
        output.push_str("Unmanaged prompts\n");
        for (key, count) in unmanaged {
            let name = get_agent_config(key).map_or(key.as_str(), |agent| agent.display_name);
            let _ = writeln!(output, "  {name} ({key}): {count}");
        }
    }

    output
}
