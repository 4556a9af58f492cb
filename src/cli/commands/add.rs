//! `passvault add` — encrypt and store a new entry.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, unlock_vault, Cli};
use crate::errors::{Result, VaultError};
use crate::generator::{generate_password, PasswordOptions};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    name: &str,
    value: Option<&str>,
    generate: bool,
    length: Option<usize>,
) -> Result<()> {
    let secret = if generate {
        // Source 1: Freshly generated password.
        let (_, settings) = load_settings()?;
        let length = length.unwrap_or(settings.password_length);
        Zeroizing::new(generate_password(length, &PasswordOptions::default())?)
    } else if let Some(v) = value {
        // Source 2: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 3: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end().to_string())
    } else {
        // Source 4: Interactive secure prompt (default).
        let entered = dialoguer::Password::new()
            .with_prompt(format!("Enter password for {name}"))
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(entered)
    };

    let vault = unlock_vault(cli)?;
    vault.add_entry(name, &secret)?;

    if generate {
        output::success(&format!(
            "Entry '{name}' added with a generated {}-character password",
            secret.chars().count()
        ));
        output::tip(&format!("Run `passvault get {name}` to reveal it."));
    } else {
        output::success(&format!("Entry '{name}' added"));
    }

    Ok(())
}
