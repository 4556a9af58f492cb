//! Vault lifecycle and entry operations.
//!
//! `VaultService` owns the single master-key slot and drives the
//! `Uninitialized -> Unlocked <-> Locked` state machine on top of a
//! `VaultStore`.  Every operation that needs the key holds the slot's
//! lock for its whole duration, so `lock()` cannot pull the key out
//! from under an in-flight `add_entry` or `reveal_entry`.

use std::path::Path;

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use zeroize::{Zeroize, Zeroizing};

use super::entry::EntryMetadata;
use super::store::VaultStore;
use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::kdf::{derive_master_key, generate_salt, KdfParams};
use crate::crypto::keys::MasterKey;
use crate::errors::{Result, VaultError};

/// Longest entry name accepted.
const MAX_NAME_LEN: usize = 256;

/// Lifecycle state of a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No master record has been persisted yet.
    Uninitialized,
    /// A master record exists but no key is cached.
    Locked,
    /// The master key is cached and verified.
    Unlocked,
}

/// The vault handle handed to the presentation layer.
pub struct VaultService {
    store: VaultStore,
    kdf_params: KdfParams,
    key: Mutex<Option<MasterKey>>,
}

impl VaultService {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open the vault database at `path`, creating the schema if needed.
    ///
    /// `kdf_params` are only used by `create_master`; an existing vault
    /// is always unlocked with the params stored in its master record.
    pub fn open(path: &Path, kdf_params: KdfParams) -> Result<Self> {
        Self::with_store(VaultStore::open(path)?, kdf_params)
    }

    /// Build a service over an already opened store.
    pub fn with_store(store: VaultStore, kdf_params: KdfParams) -> Result<Self> {
        store.initialize_schema()?;
        Ok(Self {
            store,
            kdf_params,
            key: Mutex::new(None),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> Result<VaultState> {
        if self.key.lock().is_some() {
            return Ok(VaultState::Unlocked);
        }
        if self.store.load_master_record()?.is_some() {
            Ok(VaultState::Locked)
        } else {
            Ok(VaultState::Uninitialized)
        }
    }

    // ------------------------------------------------------------------
    // Master password lifecycle
    // ------------------------------------------------------------------

    /// Set the master password of a fresh vault and unlock it.
    ///
    /// Generates the per-vault salt, derives the master key and stores
    /// the verifier.  `confirm` must equal `password`.
    pub fn create_master(&self, password: &str, confirm: &str) -> Result<()> {
        if password.is_empty() {
            return Err(VaultError::EmptyPassword);
        }
        if password != confirm {
            return Err(VaultError::PasswordMismatch);
        }

        let mut slot = self.key.lock();
        if self.store.load_master_record()?.is_some() {
            return Err(VaultError::AlreadyInitialized);
        }

        self.kdf_params.validate()?;
        let salt = generate_salt();
        let master_key = derive_master_key(password.as_bytes(), &salt, &self.kdf_params)?;
        let mut verifier = master_key.derive_verifier()?;

        let stored = self
            .store
            .store_master_record(&verifier, &salt, &self.kdf_params);
        verifier.zeroize();
        stored?;

        *slot = Some(master_key);
        info!("master password created, vault unlocked");
        Ok(())
    }

    /// Unlock the vault with the master password.
    ///
    /// Re-derives the key from the stored salt and params and checks it
    /// against the stored verifier before caching it.  On a wrong
    /// password the vault stays as it was: an unlocked vault keeps its
    /// current key.
    pub fn unlock(&self, password: &str) -> Result<()> {
        let record = self
            .store
            .load_master_record()?
            .ok_or(VaultError::NotInitialized)?;

        if password.is_empty() {
            warn!("unlock attempt with empty password");
            return Err(VaultError::InvalidCredentials);
        }

        let master_key = derive_master_key(password.as_bytes(), &record.salt, &record.kdf_params)?;
        if !master_key.matches_verifier(&record.hash)? {
            warn!("unlock attempt with wrong master password");
            return Err(VaultError::InvalidCredentials);
        }

        *self.key.lock() = Some(master_key);
        info!("vault unlocked");
        Ok(())
    }

    /// Discard the cached master key.  Idempotent.
    pub fn lock(&self) {
        if self.key.lock().take().is_some() {
            info!("vault locked");
        }
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Encrypt and store a new entry.
    pub fn add_entry(&self, name: &str, plaintext: &str) -> Result<()> {
        let slot = self.unlocked()?;
        let master_key = slot.as_ref().ok_or(VaultError::VaultLocked)?;
        validate_entry_name(name)?;

        if self.store.is_name_taken(name)? {
            return Err(VaultError::DuplicateName(name.to_string()));
        }

        let mut entry_key = master_key.derive_entry_key(name)?;
        let sealed = encrypt(&entry_key, plaintext.as_bytes());
        entry_key.zeroize();
        let sealed = sealed?;

        self.store
            .insert_entry(name, &sealed.ciphertext, &sealed.iv)?;
        debug!(entry = name, "entry added");
        Ok(())
    }

    /// Decrypt and return the plaintext of one entry.
    ///
    /// A decryption failure here means the stored row does not belong
    /// to the unlocked key and is reported as `CorruptedEntry`.
    pub fn reveal_entry(&self, name: &str) -> Result<Zeroizing<String>> {
        let slot = self.unlocked()?;
        let master_key = slot.as_ref().ok_or(VaultError::VaultLocked)?;

        let entry = self
            .store
            .get_entry(name)?
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;

        let mut entry_key = master_key.derive_entry_key(name)?;
        let decrypted = decrypt(&entry_key, &entry.ciphertext, &entry.iv);
        entry_key.zeroize();

        let plaintext = decrypted.map_err(|e| match e {
            VaultError::DecryptionFailed => {
                warn!(entry = name, "stored entry failed to decrypt");
                VaultError::CorruptedEntry(name.to_string())
            }
            other => other,
        })?;

        String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::CorruptedEntry(name.to_string())
        })
    }

    /// Remove an entry.  Requires an unlocked vault.
    pub fn delete_entry(&self, name: &str) -> Result<()> {
        let _slot = self.unlocked()?;
        self.store.delete_entry(name)?;
        debug!(entry = name, "entry deleted");
        Ok(())
    }

    /// Names and creation times of every entry, ordered by name.
    pub fn list_entries(&self) -> Result<Vec<EntryMetadata>> {
        let _slot = self.unlocked()?;
        let entries = self.store.list_entries()?;
        Ok(entries.into_iter().map(EntryMetadata::from).collect())
    }

    /// Entries whose name contains `pattern` (case-sensitive substring).
    pub fn search_entries(&self, pattern: &str) -> Result<Vec<EntryMetadata>> {
        let _slot = self.unlocked()?;
        let entries = self.store.find_entries_by_name_pattern(pattern)?;
        Ok(entries.into_iter().map(EntryMetadata::from).collect())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Lock the key slot, failing with `VaultLocked` if it is empty.
    fn unlocked(&self) -> Result<MutexGuard<'_, Option<MasterKey>>> {
        let slot = self.key.lock();
        if slot.is_none() {
            return Err(VaultError::VaultLocked);
        }
        Ok(slot)
    }
}

/// Entry names must be non-blank and at most 256 characters.
fn validate_entry_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(VaultError::InvalidParameters(
            "entry name cannot be empty".into(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(VaultError::InvalidParameters(format!(
            "entry name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> VaultService {
        let params = KdfParams {
            memory_kib: 8_192,
            iterations: 1,
            parallelism: 1,
        };
        VaultService::with_store(VaultStore::open_in_memory().unwrap(), params).unwrap()
    }

    #[test]
    fn fresh_vault_is_uninitialized() {
        assert_eq!(service().state().unwrap(), VaultState::Uninitialized);
    }

    #[test]
    fn unlock_before_create_is_rejected() {
        assert!(matches!(
            service().unlock("pw"),
            Err(VaultError::NotInitialized)
        ));
    }

    #[test]
    fn blank_entry_name_is_rejected() {
        let vault = service();
        vault.create_master("pw", "pw").unwrap();
        assert!(matches!(
            vault.add_entry("   ", "x"),
            Err(VaultError::InvalidParameters(_))
        ));
    }

    #[test]
    fn overlong_entry_name_is_rejected() {
        let vault = service();
        vault.create_master("pw", "pw").unwrap();
        let name = "n".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            vault.add_entry(&name, "x"),
            Err(VaultError::InvalidParameters(_))
        ));
    }

    #[test]
    fn locked_check_comes_before_name_validation() {
        let vault = service();
        vault.create_master("pw", "pw").unwrap();
        vault.lock();
        assert!(matches!(
            vault.add_entry("   ", "x"),
            Err(VaultError::VaultLocked)
        ));
    }

    #[test]
    fn create_master_rejects_weak_kdf_params() {
        let weak = KdfParams {
            memory_kib: 1_024,
            iterations: 1,
            parallelism: 1,
        };
        let vault =
            VaultService::with_store(VaultStore::open_in_memory().unwrap(), weak).unwrap();
        assert!(matches!(
            vault.create_master("pw", "pw"),
            Err(VaultError::InvalidParameters(_))
        ));
        assert_eq!(vault.state().unwrap(), VaultState::Uninitialized);
    }

    #[test]
    fn lock_is_idempotent() {
        let vault = service();
        vault.create_master("pw", "pw").unwrap();
        vault.lock();
        vault.lock();
        assert_eq!(vault.state().unwrap(), VaultState::Locked);
    }
}
