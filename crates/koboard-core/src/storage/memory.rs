//! In-memory storage implementation.

use super::{BlobStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(blobs.get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        blobs.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        assert!(storage.load("k").unwrap().is_none());
        storage.save("k", "{}").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("{}"));
        storage.save("k", "[]").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_remove() {
        let storage = MemoryStorage::new();
        storage.save("k", "x").unwrap();
        storage.remove("k").unwrap();
        storage.remove("never-written").unwrap();
        assert!(storage.is_empty());
    }
}
