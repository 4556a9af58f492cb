//! Records persisted in the vault database.

use chrono::{DateTime, Utc};

use crate::crypto::KdfParams;

/// One stored credential: the name plus what is needed to decrypt it.
///
/// The plaintext never appears here.  `iv` is unique per encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub ciphertext: Vec<u8>,
    pub iv: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// Lightweight metadata about an entry (no ciphertext).
///
/// Returned by `VaultService::list_entries` and `search_entries` so
/// callers can show names without touching any encrypted bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Entry> for EntryMetadata {
    fn from(entry: Entry) -> Self {
        Self {
            name: entry.name,
            created_at: entry.created_at,
        }
    }
}

/// The single master-password record of a vault.
///
/// `hash` is the verifier derived from the master key, `salt` the
/// per-vault Argon2 salt and `kdf_params` the cost settings used when
/// the vault was created.
#[derive(Debug, Clone)]
pub struct MasterRecord {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
    pub kdf_params: KdfParams,
    pub created_at: DateTime<Utc>,
}
