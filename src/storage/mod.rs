//! Key/value storage the configuration is read from.
//!
//! # Data Flow
//! ```text
//! config namespace:   "config.yml"  → raw YAML document
//! snapshot namespace: "config"      → previously persisted CompleteConfig (JSON)
//! ```
//!
//! # Design Decisions
//! - One `Storage` value per namespace; the loader holds two
//! - Read-only: persisting configuration is someone else's job
//! - Reads are the only await points of a load

pub mod fs;
pub mod memory;

use async_trait::async_trait;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

/// Error type for storage access.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on \"{key}\": {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key \"{0}\"")]
    InvalidKey(String),
}

/// A namespace of string items addressed by key.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether an item exists under `key`.
    async fn has_item(&self, key: &str) -> Result<bool, StorageError>;

    /// The item under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// All keys currently present.
    async fn get_keys(&self) -> Result<Vec<String>, StorageError>;
}
