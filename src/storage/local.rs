use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;

use super::{check_path, signed_url, verify_signature, BlobStorage, StorageError};

/// Files under a root directory; temporary URLs are signed with a shared secret
pub struct LocalBlobStorage {
    root: PathBuf,
    public_url: String,
    secret: String,
}

impl LocalBlobStorage {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into(),
            secret: secret.into(),
        }
    }

    pub fn from_config(config: &crate::config::StorageConfig) -> Self {
        Self::new(&config.root, &config.public_url, &config.signing_secret)
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(check_path(path)?))
    }
}

fn not_found(path: &Path, err: std::io::Error) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound(path.display().to_string())
    } else {
        StorageError::Io(err)
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        match fs::metadata(&full).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, path: &str) -> Result<u64, StorageError> {
        let full = self.resolve(path)?;
        let meta = fs::metadata(&full).await.map_err(|e| not_found(&full, e))?;
        Ok(meta.len())
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<(), StorageError> {
        let source = self.resolve(from)?;
        let target = self.resolve(to)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::rename(&source, &target).await.map_err(|e| not_found(&source, e))?;
        tracing::debug!("Moved {} to {}", source.display(), target.display());
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path)?;
        fs::read(&full).await.map_err(|e| not_found(&full, e))
    }

    fn temporary_url(&self, path: &str, expires_at: DateTime<Utc>) -> Result<Url, StorageError> {
        signed_url(&self.public_url, path, expires_at, &self.secret)
    }

    fn verify(&self, path: &str, expires: i64, signature: &str, now: DateTime<Utc>) -> bool {
        verify_signature(path, expires, signature, &self.secret, now)
    }
}
