//! `passvault get` — reveal and print a single entry's password.

use crate::cli::{unlock_vault, Cli};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let vault = unlock_vault(cli)?;

    let value = vault.reveal_entry(name)?;
    println!("{}", value.as_str());

    Ok(())
}
