use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

use super::{check_path, signed_url, verify_signature, BlobStorage, StorageError};

const MEMORY_BASE_URL: &str = "http://localhost/storage";
const MEMORY_SECRET: &str = "memory";

#[derive(Default, Clone)]
pub struct MemoryBlobStorage {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, path: &str, contents: impl Into<Vec<u8>>) -> Result<(), StorageError> {
        let key = check_path(path)?.to_string();
        self.files.write().await.insert(key, contents.into());
        Ok(())
    }
}

#[async_trait]
impl BlobStorage for MemoryBlobStorage {
    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let key = check_path(path)?;
        Ok(self.files.read().await.contains_key(key))
    }

    async fn size(&self, path: &str) -> Result<u64, StorageError> {
        let key = check_path(path)?;
        self.files
            .read()
            .await
            .get(key)
            .map(|contents| contents.len() as u64)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<(), StorageError> {
        let from = check_path(from)?;
        let to = check_path(to)?.to_string();
        let mut files = self.files.write().await;
        let contents = files
            .remove(from)
            .ok_or_else(|| StorageError::NotFound(from.to_string()))?;
        files.insert(to, contents);
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let key = check_path(path)?;
        self.files
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn temporary_url(&self, path: &str, expires_at: DateTime<Utc>) -> Result<Url, StorageError> {
        signed_url(MEMORY_BASE_URL, path, expires_at, MEMORY_SECRET)
    }

    fn verify(&self, path: &str, expires: i64, signature: &str, now: DateTime<Utc>) -> bool {
        verify_signature(path, expires, signature, MEMORY_SECRET, now)
    }
}
