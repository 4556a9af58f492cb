//! `passvault completions <shell>` — print a completion script to stdout.
//!
//! Any shell `clap_complete` knows is accepted by name, case-insensitively,
//! plus `ps` as shorthand for PowerShell.

use std::io;

use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}

fn parse_shell(name: &str) -> Result<Shell> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("ps") {
        return Ok(Shell::PowerShell);
    }
    <Shell as ValueEnum>::from_str(name, true).map_err(|_| {
        let supported: Vec<String> = Shell::value_variants()
            .iter()
            .filter_map(|s| s.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        VaultError::CommandFailed(format!(
            "unknown shell '{name}', supported: {}",
            supported.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_shell_parses() {
        assert_eq!(parse_shell("bash").unwrap(), Shell::Bash);
        assert_eq!(parse_shell("ZSH").unwrap(), Shell::Zsh);
        assert_eq!(parse_shell("fish").unwrap(), Shell::Fish);
        assert_eq!(parse_shell("PowerShell").unwrap(), Shell::PowerShell);
        assert_eq!(parse_shell("ps").unwrap(), Shell::PowerShell);
        assert_eq!(parse_shell("elvish").unwrap(), Shell::Elvish);
    }

    #[test]
    fn blank_shell_name_is_rejected() {
        assert!(matches!(parse_shell(""), Err(VaultError::CommandFailed(_))));
        assert!(matches!(parse_shell("  "), Err(VaultError::CommandFailed(_))));
    }

    #[test]
    fn unknown_shell_error_lists_supported_shells() {
        match parse_shell("csh") {
            Err(VaultError::CommandFailed(msg)) => {
                assert!(msg.contains("'csh'"));
                assert!(msg.contains("bash"));
                assert!(msg.contains("elvish"));
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }
}
