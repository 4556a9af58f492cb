//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - Argon2id password-based key derivation (`kdf`)
//! - HKDF-based per-entry key and verifier derivation (`keys`)
//! - Padded AES-256-GCM encryption and decryption (`encryption`)

pub mod encryption;
pub mod kdf;
pub mod keys;

pub use encryption::{decrypt, encrypt, Sealed};
pub use kdf::{derive_key, derive_master_key, generate_salt, KdfParams};
pub use keys::{derive_entry_key, derive_verifier, MasterKey};
