//! Vault module — encrypted entry storage and lifecycle.
//!
//! This module provides:
//! - `Entry`, `EntryMetadata` and `MasterRecord` types (`entry`)
//! - SQLite persistence with uniqueness enforced by the schema (`store`)
//! - The lock/unlock state machine and entry operations (`service`)

pub mod entry;
pub mod service;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{Entry, EntryMetadata, MasterRecord};
pub use service::{VaultService, VaultState};
pub use store::VaultStore;
