//! Entry encryption: PKCS#7 padding sealed with AES-256-GCM.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! returns it separately as the entry's IV.  Plaintext is padded to
//! the 16-byte AES block size before sealing so stored ciphertext
//! lengths only reveal the block count, not the exact secret length.
//!
//! Layout of the returned ciphertext:
//!   [ padded plaintext (n * 16 bytes) encrypted | 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Size of the AES-256-GCM nonce (the stored IV) in bytes.
pub const IV_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Ciphertext and the IV it was produced under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub iv: Vec<u8>,
}

/// Encrypt `plaintext` with a 32-byte `key` under a fresh random IV.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut padded = pad(plaintext);
    let ciphertext = cipher.encrypt(&nonce, padded.as_slice());
    padded.zeroize();

    let ciphertext =
        ciphertext.map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(Sealed {
        ciphertext,
        iv: nonce.to_vec(),
    })
}

/// Decrypt data produced by `encrypt`.
///
/// Fails with `DecryptionFailed` on a malformed IV or ciphertext length,
/// an authentication failure, or invalid padding.
pub fn decrypt(key: &[u8], ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    if iv.len() != IV_LEN {
        return Err(VaultError::DecryptionFailed);
    }
    if ciphertext.len() < BLOCK_LEN + TAG_LEN || (ciphertext.len() - TAG_LEN) % BLOCK_LEN != 0 {
        return Err(VaultError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::DecryptionFailed)?;

    let mut padded = cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)?;

    let result = unpad(&padded);
    padded.zeroize();
    result
}

/// Apply PKCS#7 padding.  Always adds between 1 and 16 bytes.
fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_LEN - data.len() % BLOCK_LEN;
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    // pad_len is in 1..=16
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

/// Strip PKCS#7 padding, validating every pad byte.
fn unpad(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() || data.len() % BLOCK_LEN != 0 {
        return Err(VaultError::DecryptionFailed);
    }

    let pad_len = usize::from(data[data.len() - 1]);
    if pad_len == 0 || pad_len > BLOCK_LEN {
        return Err(VaultError::DecryptionFailed);
    }

    let (body, padding) = data.split_at(data.len() - pad_len);
    if !padding.iter().all(|&b| usize::from(b) == pad_len) {
        return Err(VaultError::DecryptionFailed);
    }

    Ok(body.to_vec())
}
