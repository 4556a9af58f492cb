//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects the master password
//! against offline brute force.  Parameters are configurable via
//! `KdfParams` (loaded from `.passvault.toml` or sensible defaults) and
//! are persisted with the master record so unlock re-derives with the
//! exact settings used at creation.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use super::keys::{MasterKey, KEY_LEN};
use crate::errors::{Result, VaultError};

/// Length of the per-vault salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Argon2 refuses salts shorter than this.
const MIN_SALT_LEN: usize = 8;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// Reject parameters that would make the KDF dangerously cheap.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::InvalidParameters(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(VaultError::InvalidParameters(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(VaultError::InvalidParameters(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Derive `key_len` bytes from a password and salt using Argon2id.
///
/// Deterministic: the same password, salt, params and length always
/// produce the same key.  The returned buffer is wiped on drop.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    kdf_params: &KdfParams,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if password.is_empty() {
        return Err(VaultError::InvalidParameters(
            "password must not be empty".into(),
        ));
    }
    if key_len == 0 {
        return Err(VaultError::InvalidParameters(
            "key length must be positive".into(),
        ));
    }
    if salt.len() < MIN_SALT_LEN {
        return Err(VaultError::InvalidParameters(format!(
            "salt must be at least {MIN_SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    kdf_params.validate()?;

    let params = Params::new(
        kdf_params.memory_kib,
        kdf_params.iterations,
        kdf_params.parallelism,
        Some(key_len),
    )
    .map_err(|e| VaultError::InvalidParameters(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new(vec![0u8; key_len]);
    argon2
        .hash_password_into(password, salt, key.as_mut_slice())
        .map_err(|e| VaultError::InvalidParameters(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Derive the 32-byte vault master key.
pub fn derive_master_key(password: &[u8], salt: &[u8], kdf_params: &KdfParams) -> Result<MasterKey> {
    let derived = derive_key(password, salt, kdf_params, KEY_LEN)?;

    let mut bytes = [0u8; KEY_LEN];
    bytes.copy_from_slice(&derived);
    let master_key = MasterKey::new(bytes);
    bytes.zeroize();

    Ok(master_key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
