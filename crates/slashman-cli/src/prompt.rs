//! Interactive questions on the terminal

use slashman_core::{ConflictResolver, OverwriteAction};
use std::io::{BufRead, Write};
use std::path::PathBuf;

const BATCH_CHOICES: [(OverwriteAction, &str); 3] = [
    (OverwriteAction::Cancel, "Cancel"),
    (OverwriteAction::Overwrite, "Overwrite all existing files"),
    (OverwriteAction::Backup, "Create backups and overwrite all"),
];

/// Asks once what to do with every existing file of a batch. End of input
/// or a read error answers `Cancel`.
pub struct ConflictPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConflictPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, existing: &[PathBuf]) -> std::io::Result<OverwriteAction> {
        let count = existing.len();
        let plural = if count == 1 { "" } else { "s" };
        writeln!(self.output, "Found {count} existing file{plural} that will be overwritten:")?;
        for path in existing {
            writeln!(self.output, "  {}", path.display())?;
        }
        writeln!(self.output, "What would you like to do?")?;
        for (i, (_, label)) in BATCH_CHOICES.iter().enumerate() {
            writeln!(self.output, "  {}) {label}", i + 1)?;
        }

        loop {
            write!(self.output, "Choice [1-{}]: ", BATCH_CHOICES.len())?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(OverwriteAction::Cancel);
            }
            if let Some(action) = parse_choice(&line) {
                return Ok(action);
            }
            writeln!(self.output, "Please answer 1, 2 or 3.")?;
        }
    }
}

impl<R: BufRead, W: Write> ConflictResolver for ConflictPrompt<R, W> {
    fn resolve(&mut self, existing: &[PathBuf]) -> OverwriteAction {
        self.ask(existing).unwrap_or_else(|e| {
            tracing::warn!("Could not read an answer: {e}");
            OverwriteAction::Cancel
        })
    }
}

/// A menu number or an action token. `overwrite-all` is a per-file answer
/// and means plain overwrite for a batch.
fn parse_choice(line: &str) -> Option<OverwriteAction> {
    let answer = line.trim();
    if let Ok(n) = answer.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| BATCH_CHOICES.get(i))
            .map(|(action, _)| *action);
    }
    match answer.parse::<OverwriteAction>().ok()? {
        OverwriteAction::OverwriteAll => Some(OverwriteAction::Overwrite),
        action => Some(action),
    }
}

/// `[y/N]` question; anything but `y`/`yes` (including end of input) is no
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> std::io::Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
