//! `passvault search` — list entries whose name contains a substring.

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::Result;

/// Execute the `search` command.
pub fn execute(cli: &Cli, pattern: &str) -> Result<()> {
    let vault = unlock_vault(cli)?;
    let entries = vault.search_entries(pattern)?;

    if entries.is_empty() {
        output::info(&format!("No entries matching '{pattern}'."));
        return Ok(());
    }

    output::print_entries_table(&entries);
    Ok(())
}
