//! In-memory storage, for tests and throwaway sessions.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::db::Storage;
use crate::error::{AppError, Result};

/// Storage backed by a concurrent map.
///
/// Clones share the same map. Can be switched offline, in which case every
/// operation fails with a persistence error.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<DashMap<String, Vec<u8>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage where all operations return an error.
    pub fn new_offline() -> Self {
        let storage = Self::default();
        storage.set_offline(true);
        storage
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Raw access for tests that plant or inspect blobs.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    pub fn insert_raw(&self, key: &str, value: Vec<u8>) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Persistence(
                "Storage not available (offline mode)".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_online()?;
        Ok(self.raw(key))
    }

    async fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        self.check_online()?;
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.check_online()?;
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_clear() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load("state").await.unwrap(), None);

        storage.save("state", b"{}").await.unwrap();
        assert_eq!(storage.load("state").await.unwrap(), Some(b"{}".to_vec()));

        storage.clear().await.unwrap();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_offline_fails_every_operation() {
        let storage = MemoryStorage::new_offline();
        assert!(matches!(storage.load("k").await, Err(AppError::Persistence(_))));
        assert!(matches!(storage.save("k", b"v").await, Err(AppError::Persistence(_))));
        assert!(matches!(storage.clear().await, Err(AppError::Persistence(_))));

        storage.set_offline(false);
        assert!(storage.save("k", b"v").await.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        handle.save("k", b"v").await.unwrap();
        assert_eq!(storage.raw("k"), Some(b"v".to_vec()));
    }
}
