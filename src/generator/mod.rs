//! Random password generation.
//!
//! Stateless: builds a character set from `PasswordOptions` and draws
//! each character uniformly from it with the thread-local CSPRNG.

use rand::Rng;

use crate::errors::{Result, VaultError};

const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&(){}[]-_<>?";

/// Characters that are easy to misread.
pub const AMBIGUOUS: &str = "iIoO01l!";

/// Characters that need escaping in URLs.
pub const URL_UNSAFE: &str = "$&+/,;=?@<>#%{}|^~[]`";

/// Default generated password length.
pub const DEFAULT_LENGTH: usize = 15;

/// Which characters a generated password may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordOptions {
    pub skip_lower_case: bool,
    pub skip_upper_case: bool,
    pub skip_numbers: bool,
    pub skip_symbols: bool,
    /// Drop `i I o O 0 1 l !` (on by default).
    pub exclude_ambiguous_chars: bool,
    pub url_safe_only: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            skip_lower_case: false,
            skip_upper_case: false,
            skip_numbers: false,
            skip_symbols: false,
            exclude_ambiguous_chars: true,
            url_safe_only: false,
        }
    }
}

impl PasswordOptions {
    /// The character set these options allow, in a stable order.
    pub fn charset(&self) -> Vec<char> {
        let mut chars = Vec::new();
        if !self.skip_lower_case {
            chars.extend(LOWER.chars());
        }
        if !self.skip_upper_case {
            chars.extend(UPPER.chars());
        }
        if !self.skip_numbers {
            chars.extend(DIGITS.chars());
        }
        if !self.skip_symbols {
            chars.extend(SYMBOLS.chars());
        }
        if self.exclude_ambiguous_chars {
            chars.retain(|c| !AMBIGUOUS.contains(*c));
        }
        if self.url_safe_only {
            chars.retain(|c| !URL_UNSAFE.contains(*c));
        }
        chars
    }
}

/// Generate a random password of `length` characters.
///
/// Fails with `InvalidParameters` if the options leave no characters
/// to choose from.
pub fn generate_password(length: usize, options: &PasswordOptions) -> Result<String> {
    let charset = options.charset();
    if charset.is_empty() {
        return Err(VaultError::InvalidParameters(
            "password options exclude every character".into(),
        ));
    }

    let mut rng = rand::rng();
    Ok((0..length)
        .map(|_| charset[rng.random_range(0..charset.len())])
        .collect())
}
