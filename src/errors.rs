use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Parameter errors ---
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    // --- Entry errors ---
    #[error("Entry '{0}' already exists")]
    DuplicateName(String),

    #[error("Entry '{0}' not found")]
    NotFound(String),

    // --- Master password errors ---
    #[error("Password mismatch — passwords do not match")]
    PasswordMismatch,

    #[error("Master password cannot be empty")]
    EmptyPassword,

    #[error("Invalid master password")]
    InvalidCredentials,

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Entry '{0}' could not be decrypted with the unlocked key — vault data may be corrupted")]
    CorruptedEntry(String),

    // --- Lifecycle errors ---
    #[error("Vault is locked — unlock it with the master password first")]
    VaultLocked,

    #[error("Vault already has a master password")]
    AlreadyInitialized,

    #[error("Vault has no master password yet — run `passvault init`")]
    NotInitialized,

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    StorageError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
