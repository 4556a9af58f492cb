//! Sub-key derivation using HKDF-SHA256.
//!
//! From a single master key we derive:
//! - A unique **per-entry** encryption key for each entry name.
//! - The **verifier** stored in the master record to check unlock attempts.
//!
//! HKDF (RFC 5869) uses the master key as input keying material and a
//! context string (`info`) to produce independent sub-keys.

use hkdf::Hkdf;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Length of the master key and derived sub-keys (256 bits).
pub const KEY_LEN: usize = 32;

/// Derive a per-entry encryption key from the master key.
///
/// `info` is `"passvault-entry:<name>"`, so a ciphertext copied under a
/// different name will not decrypt.
pub fn derive_entry_key(master_key: &[u8], entry_name: &str) -> Result<[u8; KEY_LEN]> {
    let info = format!("passvault-entry:{entry_name}");
    hkdf_derive(master_key, info.as_bytes())
}

/// Derive the master-password verifier from the master key.
///
/// One-way with respect to the master key and distinct from every
/// entry key, so it is safe to persist.
pub fn derive_verifier(master_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(master_key, b"passvault-verifier")
}

/// HKDF-SHA256 expand with the given `info`.
///
/// The extract step is skipped (zero salt) because the master key
/// already came out of Argon2id.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| VaultError::InvalidParameters(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A 32-byte master key that zeroes its memory when dropped.
///
/// Only `VaultService` holds one for longer than a single call.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive the encryption key for one entry.
    pub fn derive_entry_key(&self, entry_name: &str) -> Result<[u8; KEY_LEN]> {
        derive_entry_key(&self.bytes, entry_name)
    }

    /// Derive the verifier persisted in the master record.
    pub fn derive_verifier(&self) -> Result<[u8; KEY_LEN]> {
        derive_verifier(&self.bytes)
    }

    /// Check this key against a stored verifier in constant time.
    pub fn matches_verifier(&self, stored: &[u8]) -> Result<bool> {
        let mut verifier = self.derive_verifier()?;
        let matches = verifier.as_slice().ct_eq(stored).into();
        verifier.zeroize();
        Ok(matches)
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}
