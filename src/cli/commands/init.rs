//! `passvault init` — create the vault and set its master password.

use crate::cli::output;
use crate::cli::{open_vault, prompt_new_password, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::VaultState;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;

    if vault.state()? != VaultState::Uninitialized {
        output::tip("Use `passvault add <NAME>` to store passwords in the existing vault.");
        return Err(VaultError::AlreadyInitialized);
    }

    let (password, confirm) = prompt_new_password()?;
    vault.create_master(&password, &confirm)?;

    output::success("Vault created and unlocked.");
    output::tip("Run `passvault add <NAME>` to store a password.");
    output::tip("Run `passvault generate` to create a strong random password.");

    Ok(())
}
