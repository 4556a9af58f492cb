//! `passvault generate` — print a random password without storing it.

use crate::cli::load_settings;
use crate::errors::Result;
use crate::generator::{generate_password, PasswordOptions};

/// Execute the `generate` command.
pub fn execute(length: Option<usize>, options: &PasswordOptions) -> Result<()> {
    let length = match length {
        Some(n) => n,
        None => load_settings()?.1.password_length,
    };

    let password = generate_password(length, options)?;
    println!("{password}");

    Ok(())
}
