//! SQLite persistence for entries and the master record.
//!
//! `VaultStore` only moves bytes: it never sees a key or a plaintext.
//! Name uniqueness and the single-master-record rule are enforced by
//! table constraints, so every insert is one atomic statement and two
//! writers can never both win for the same name.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tracing::debug;

use super::entry::{Entry, MasterRecord};
use crate::crypto::KdfParams;
use crate::errors::{Result, VaultError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS entries (
    name        TEXT PRIMARY KEY NOT NULL,
    ciphertext  BLOB NOT NULL,
    iv          BLOB NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS master_record (
    id          INTEGER PRIMARY KEY CHECK (id = 1),
    hash        BLOB NOT NULL,
    salt        BLOB NOT NULL,
    memory_kib  INTEGER NOT NULL,
    iterations  INTEGER NOT NULL,
    parallelism INTEGER NOT NULL,
    created_at  TEXT NOT NULL
);
";

/// SQLite-backed vault storage.
pub struct VaultStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl VaultStore {
    /// Open (or create) the vault database at `path`.
    ///
    /// The parent directory is created if needed and the file is
    /// restricted to its owner.  Call `initialize_schema` before use.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            path: None,
        })
    }

    /// Path of the backing file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the entry and master-record tables if they are absent.
    ///
    /// Idempotent; safe to run on every startup.
    pub fn initialize_schema(&self) -> Result<()> {
        self.conn.lock().execute_batch(SCHEMA)?;
        debug!("vault schema ready");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Returns `true` if an entry with exactly this name exists.
    pub fn is_name_taken(&self, name: &str) -> Result<bool> {
        let taken = self.conn.lock().query_row(
            "SELECT EXISTS(SELECT 1 FROM entries WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        Ok(taken)
    }

    /// Insert a new entry.
    ///
    /// Fails with `DuplicateName` when the name is already stored; the
    /// check and the write are the same statement.
    pub fn insert_entry(&self, name: &str, ciphertext: &[u8], iv: &[u8]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.lock().execute(
            "INSERT INTO entries (name, ciphertext, iv, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, ciphertext, iv, now],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(VaultError::DuplicateName(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove exactly one entry, failing with `NotFound` if it is absent.
    pub fn delete_entry(&self, name: &str) -> Result<()> {
        let removed = self
            .conn
            .lock()
            .execute("DELETE FROM entries WHERE name = ?1", params![name])?;

        if removed == 0 {
            return Err(VaultError::NotFound(name.to_string()));
        }
        Ok(())
    }

    /// Fetch a single entry by exact name.
    pub fn get_entry(&self, name: &str) -> Result<Option<Entry>> {
        let entry = self
            .conn
            .lock()
            .query_row(
                "SELECT name, ciphertext, iv, created_at FROM entries WHERE name = ?1",
                params![name],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// All entries, ordered by name.
    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT name, ciphertext, iv, created_at FROM entries ORDER BY name")?;
        let rows = stmt.query_map([], entry_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Entries whose name contains `pattern`, ordered by name.
    ///
    /// Matching is a case-sensitive substring test; `%` and `_` have no
    /// special meaning.  An empty pattern matches every entry.
    pub fn find_entries_by_name_pattern(&self, pattern: &str) -> Result<Vec<Entry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT name, ciphertext, iv, created_at FROM entries
             WHERE ?1 = '' OR instr(name, ?1) > 0
             ORDER BY name",
        )?;
        let rows = stmt.query_map(params![pattern], entry_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Number of stored entries.
    pub fn entry_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    // ------------------------------------------------------------------
    // Master record
    // ------------------------------------------------------------------

    /// Persist the master record.  A vault has exactly one; a second
    /// call fails with `AlreadyInitialized`.
    pub fn store_master_record(&self, hash: &[u8], salt: &[u8], kdf_params: &KdfParams) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.lock().execute(
            "INSERT INTO master_record (id, hash, salt, memory_kib, iterations, parallelism, created_at)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                hash,
                salt,
                kdf_params.memory_kib,
                kdf_params.iterations,
                kdf_params.parallelism,
                now
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(VaultError::AlreadyInitialized),
            Err(e) => Err(e.into()),
        }
    }

    /// Load the master record, or `None` if the vault was never initialized.
    pub fn load_master_record(&self) -> Result<Option<MasterRecord>> {
        let record = self
            .conn
            .lock()
            .query_row(
                "SELECT hash, salt, memory_kib, iterations, parallelism, created_at
                 FROM master_record WHERE id = 1",
                [],
                |row| {
                    Ok(MasterRecord {
                        hash: row.get(0)?,
                        salt: row.get(1)?,
                        kdf_params: KdfParams {
                            memory_kib: row.get(2)?,
                            iterations: row.get(3)?,
                            parallelism: row.get(4)?,
                        },
                        created_at: timestamp_from_row(row, 5)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        name: row.get(0)?,
        ciphertext: row.get(1)?,
        iv: row.get(2)?,
        created_at: timestamp_from_row(row, 3)?,
    })
}

fn timestamp_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> VaultStore {
        let store = VaultStore::open_in_memory().unwrap();
        store.initialize_schema().unwrap();
        store
    }

    #[test]
    fn schema_initialization_is_idempotent() {
        let store = store();
        store.insert_entry("gmail", b"ct", b"iv").unwrap();
        store.initialize_schema().unwrap();
        assert_eq!(store.entry_count().unwrap(), 1);
    }

    #[test]
    fn insert_rejects_duplicate_name() {
        let store = store();
        store.insert_entry("gmail", b"ct1", b"iv1").unwrap();
        let err = store.insert_entry("gmail", b"ct2", b"iv2").unwrap_err();
        assert!(matches!(err, VaultError::DuplicateName(ref n) if n == "gmail"));

        // The original row is untouched.
        let entry = store.get_entry("gmail").unwrap().unwrap();
        assert_eq!(entry.ciphertext, b"ct1");
    }

    #[test]
    fn names_are_case_sensitive() {
        let store = store();
        store.insert_entry("Gmail", b"ct", b"iv").unwrap();
        assert!(!store.is_name_taken("gmail").unwrap());
        store.insert_entry("gmail", b"ct", b"iv").unwrap();
        assert_eq!(store.entry_count().unwrap(), 2);
    }

    #[test]
    fn delete_missing_entry_is_not_found() {
        let store = store();
        assert!(matches!(
            store.delete_entry("ghost"),
            Err(VaultError::NotFound(_))
        ));
    }

    #[test]
    fn pattern_is_literal_substring() {
        let store = store();
        store.insert_entry("100%_done", b"ct", b"iv").unwrap();
        store.insert_entry("1000", b"ct", b"iv").unwrap();

        let hits = store.find_entries_by_name_pattern("%_").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "100%_done");
    }

    #[test]
    fn empty_pattern_matches_everything() {
        let store = store();
        store.insert_entry("a", b"ct", b"iv").unwrap();
        store.insert_entry("b", b"ct", b"iv").unwrap();
        assert_eq!(store.find_entries_by_name_pattern("").unwrap().len(), 2);
    }

    #[test]
    fn master_record_can_only_be_stored_once() {
        let store = store();
        assert!(store.load_master_record().unwrap().is_none());

        let params = KdfParams::default();
        store.store_master_record(b"hash", b"salt-bytes", &params).unwrap();
        assert!(matches!(
            store.store_master_record(b"other", b"salt-bytes", &params),
            Err(VaultError::AlreadyInitialized)
        ));

        let record = store.load_master_record().unwrap().unwrap();
        assert_eq!(record.hash, b"hash");
        assert_eq!(record.kdf_params, params);
    }
}
