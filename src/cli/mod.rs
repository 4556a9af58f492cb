//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::{VaultService, VaultState};

/// Environment variable checked before prompting for the master password.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// PassVault CLI: local encrypted password vault.
#[derive(Parser)]
#[command(name = "passvault", about = "Local encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault database path (overrides .passvault.toml)
    #[arg(long, global = true)]
    pub vault: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create the vault and choose the master password
    Init,

    /// Add a new password entry
    Add {
        /// Entry name (e.g. gmail)
        name: String,
        /// Password value (omit for interactive prompt)
        value: Option<String>,
        /// Generate a random password instead of entering one
        #[arg(short, long, conflicts_with = "value")]
        generate: bool,
        /// Length of the generated password
        #[arg(short, long, requires = "generate")]
        length: Option<usize>,
    },

    /// Reveal an entry's password
    Get {
        /// Entry name
        name: String,
    },

    /// List all entries
    List,

    /// List entries whose name contains a substring (case-sensitive)
    Search {
        /// Substring to look for
        pattern: String,
    },

    /// Delete an entry
    Delete {
        /// Entry name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password without storing it
    Generate {
        /// Password length (default from config, 15)
        #[arg(short, long)]
        length: Option<usize>,
        /// Leave out lowercase letters
        #[arg(long)]
        no_lower: bool,
        /// Leave out uppercase letters
        #[arg(long)]
        no_upper: bool,
        /// Leave out digits
        #[arg(long)]
        no_numbers: bool,
        /// Leave out symbols
        #[arg(long)]
        no_symbols: bool,
        /// Keep easily confused characters (i I o O 0 1 l !)
        #[arg(long)]
        allow_ambiguous: bool,
        /// Only use characters that are safe in URLs
        #[arg(long)]
        url_safe: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.passvault.toml` from the current directory.
pub fn load_settings() -> Result<(PathBuf, Settings)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    Ok((cwd, settings))
}

/// Resolve the vault path: `--vault` wins over the configured path.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.vault {
        Some(path) => cwd.join(path),
        None => settings.vault_path(&cwd),
    })
}

/// Open the vault service without unlocking it.
pub fn open_vault(cli: &Cli) -> Result<VaultService> {
    let (_, settings) = load_settings()?;
    let path = vault_path(cli, &settings)?;
    VaultService::open(&path, settings.kdf_params())
}

/// Open an existing vault and unlock it with the master password.
///
/// A missing vault file is reported as `NotInitialized` without creating
/// it; only `init` creates the file.
pub fn unlock_vault(cli: &Cli) -> Result<VaultService> {
    let (_, settings) = load_settings()?;
    let path = vault_path(cli, &settings)?;
    if !path.exists() {
        return Err(VaultError::NotInitialized);
    }

    let vault = VaultService::open(&path, settings.kdf_params())?;
    if vault.state()? == VaultState::Uninitialized {
        return Err(VaultError::NotInitialized);
    }

    let password = prompt_password()?;
    vault.unlock(&password)?;
    Ok(vault)
}

/// Get the master password, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Ask for a new master password twice (used during `init`).
///
/// The pair is returned unchecked; `VaultService::create_master`
/// decides whether they match.  `PASSVAULT_PASSWORD` supplies both.
pub fn prompt_new_password() -> Result<(Zeroizing<String>, Zeroizing<String>)> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok((Zeroizing::new(pw.clone()), Zeroizing::new(pw)));
        }
    }

    let password = dialoguer::Password::new()
        .with_prompt("Choose a master password")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    let confirm = dialoguer::Password::new()
        .with_prompt("Confirm master password")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

    Ok((Zeroizing::new(password), Zeroizing::new(confirm)))
}
