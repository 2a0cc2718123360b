//! In-memory cache implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::cache::ResultCache;

/// In-memory byte store.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, payload: &[u8]) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), payload.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete_roundtrip() {
        let cache = MemoryCache::new();
        cache.put("k", b"payload").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"payload".to_vec()));

        cache.delete("k").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let cache = MemoryCache::new();
        cache.put("k", b"old").await.unwrap();
        cache.put("k", b"new").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"new".to_vec()));
        assert_eq!(cache.len(), 1);
    }
}
