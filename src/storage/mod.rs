// Blob storage abstraction for form assets and submission uploads

pub mod file_name;
pub mod local;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use url::Url;

pub use file_name::{validate_asset, UploadToken};
pub use local::LocalBlobStorage;
pub use memory::MemoryBlobStorage;

/// Where client uploads wait before a form claims them
pub const TMP_UPLOAD_PATH: &str = "tmp";
/// Persistent location of form assets (logos, cover images)
pub const ASSETS_UPLOAD_PATH: &str = "assets/forms";

/// Storage key of a file submitted through a form
pub fn submission_path(form_id: uuid::Uuid, file_name: &str) -> String {
    format!("forms/{}/submissions/{}", form_id, file_name)
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error("Signing error: {0}")]
    Signing(String),
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Size in bytes; NotFound when absent
    async fn size(&self, path: &str) -> Result<u64, StorageError>;

    /// Move `from` to `to`, replacing any existing file at `to`
    async fn move_file(&self, from: &str, to: &str) -> Result<(), StorageError>;

    /// Whole file contents; NotFound when absent
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Signed link to `path` that stops working at `expires_at`
    fn temporary_url(&self, path: &str, expires_at: DateTime<Utc>) -> Result<Url, StorageError>;

    /// Whether `signature` was issued by `temporary_url` for `path` and is still valid at `now`
    fn verify(&self, path: &str, expires: i64, signature: &str, now: DateTime<Utc>) -> bool;
}

/// Keys are relative, '/'-separated and may not climb out of the root
pub(crate) fn check_path(path: &str) -> Result<&str, StorageError> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(trimmed)
}

type HmacSha256 = Hmac<Sha256>;

fn signature_mac(path: &str, expires: i64, secret: &str) -> Result<HmacSha256, StorageError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| StorageError::Signing(e.to_string()))?;
    mac.update(path.as_bytes());
    mac.update(b":");
    mac.update(expires.to_string().as_bytes());
    Ok(mac)
}

/// Hex HMAC-SHA256 of `path:expires` keyed by the secret
pub(crate) fn sign(path: &str, expires: i64, secret: &str) -> Result<String, StorageError> {
    Ok(hex::encode(signature_mac(path, expires, secret)?.finalize().into_bytes()))
}

/// Constant-time check of a `signed_url` signature that has not expired at `now`
pub(crate) fn verify_signature(path: &str, expires: i64, signature: &str, secret: &str, now: DateTime<Utc>) -> bool {
    if expires < now.timestamp() {
        return false;
    }
    let (Ok(path), Ok(expected)) = (check_path(path), hex::decode(signature)) else {
        return false;
    };
    match signature_mac(path, expires, secret) {
        Ok(mac) => mac.verify_slice(&expected).is_ok(),
        Err(_) => false,
    }
}

/// `<base>/<path>?expires=<unix>&signature=<hex>`
pub(crate) fn signed_url(base: &str, path: &str, expires_at: DateTime<Utc>, secret: &str) -> Result<Url, StorageError> {
    let path = check_path(path)?;
    let expires = expires_at.timestamp();
    let mut url = Url::parse(&format!("{}/{}", base.trim_end_matches('/'), path))?;
    url.query_pairs_mut()
        .append_pair("expires", &expires.to_string())
        .append_pair("signature", &sign(path, expires, secret)?);
    Ok(url)
}
