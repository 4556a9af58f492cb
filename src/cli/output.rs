//! Styled terminal output shared by every command.
//!
//! Status lines carry a one-character marker; results the user asked for
//! (revealed secrets, generated passwords) are printed plainly by the
//! commands themselves so they stay pipeable.

use comfy_table::{ContentArrangement, Table};
use console::{style, StyledObject};

use crate::vault::EntryMetadata;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Status marker placed in front of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Success,
    Error,
    Warning,
    Info,
    Tip,
}

impl Mark {
    fn symbol(self) -> StyledObject<&'static str> {
        match self {
            Mark::Success => style("\u{2713}").green().bold(),
            Mark::Error => style("\u{2717}").red().bold(),
            Mark::Warning => style("\u{26a0}").yellow().bold(),
            Mark::Info => style("\u{2139}").blue().bold(),
            Mark::Tip => style("\u{2192}").dim(),
        }
    }

    /// Errors and warnings go to stderr so stdout stays clean.
    fn to_stderr(self) -> bool {
        matches!(self, Mark::Error | Mark::Warning)
    }
}

fn emit(mark: Mark, msg: &str) {
    let line = match mark {
        Mark::Tip => format!("{} {}", mark.symbol(), style(msg).dim()),
        _ => format!("{} {}", mark.symbol(), msg),
    };
    if mark.to_stderr() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn success(msg: &str) {
    emit(Mark::Success, msg);
}

pub fn error(msg: &str) {
    emit(Mark::Error, msg);
}

pub fn warning(msg: &str) {
    emit(Mark::Warning, msg);
}

pub fn info(msg: &str) {
    emit(Mark::Info, msg);
}

/// Dimmed hint, usually the next command to run.
pub fn tip(msg: &str) {
    emit(Mark::Tip, msg);
}

/// Build the Name / Created table for a set of entries.
fn entries_table(entries: &[EntryMetadata]) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Created"]);

    for entry in entries {
        table.add_row(vec![
            entry.name.clone(),
            entry.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ]);
    }
    table
}

/// Print entry metadata as a table. Never shows secret values.
pub fn print_entries_table(entries: &[EntryMetadata]) {
    println!("{}", entries_table(entries));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn only_errors_and_warnings_go_to_stderr() {
        assert!(Mark::Error.to_stderr());
        assert!(Mark::Warning.to_stderr());
        assert!(!Mark::Success.to_stderr());
        assert!(!Mark::Info.to_stderr());
        assert!(!Mark::Tip.to_stderr());
    }

    #[test]
    fn table_lists_name_and_creation_time() {
        let entries = vec![EntryMetadata {
            name: "gmail".into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        }];

        let rendered = entries_table(&entries).to_string();
        assert!(rendered.contains("Name"));
        assert!(rendered.contains("gmail"));
        assert!(rendered.contains("2024-03-01 12:30:00"));
    }
}
