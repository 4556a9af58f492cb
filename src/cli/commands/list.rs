//! `passvault list` — display all entry names in a table.

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = unlock_vault(cli)?;
    let entries = vault.list_entries()?;

    if entries.is_empty() {
        output::info("No entries in this vault yet.");
        output::tip("Run `passvault add <NAME>` to store your first password.");
        return Ok(());
    }

    output::info(&format!("{} entry(ies)", entries.len()));
    output::print_entries_table(&entries);

    Ok(())
}
