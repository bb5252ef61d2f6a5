//! In-memory storage backed by a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::storage::{Storage, StorageError};

/// Thread-safe in-memory namespace. Mostly useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.items.remove(key).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn has_item(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.items.contains_key(key))
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).map(|r| r.value().clone()))
    }

    async fn get_keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys: Vec<String> = self.items.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}
