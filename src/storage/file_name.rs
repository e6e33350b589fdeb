use uuid::Uuid;

use super::{BlobStorage, StorageError, TMP_UPLOAD_PATH};
use crate::forms::slug::slugify;

/// Extensions accepted for form assets unless the upload is a generic file
pub const ASSET_EXTENSIONS: &[&str] = &["png", "jpeg", "jpg", "bmp", "gif", "svg", "mp4"];

const MAX_NAME_LENGTH: usize = 50;

/// Reference to a pending upload: `<name>_<uuid>.<ext>` or a bare `<uuid>`.
/// Clients may send the full temporary URL; only the last segment counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadToken {
    pub uuid: Uuid,
    pub name: Option<String>,
    pub extension: Option<String>,
}

impl UploadToken {
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let invalid = || StorageError::InvalidUpload(format!("Unrecognized upload reference '{}'", raw));

        let without_query = raw.split(['?', '#']).next().unwrap_or_default();
        let segment = without_query.rsplit('/').next().unwrap_or_default().trim();
        if segment.is_empty() {
            return Err(invalid());
        }

        if let Ok(uuid) = Uuid::parse_str(segment) {
            return Ok(Self { uuid, name: None, extension: None });
        }

        let (stem, extension) = segment.rsplit_once('.').ok_or_else(invalid)?;
        let (name, uuid) = stem.rsplit_once('_').ok_or_else(invalid)?;
        let uuid = Uuid::parse_str(uuid).map_err(|_| invalid())?;
        if name.is_empty() || extension.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            uuid,
            name: Some(name.to_string()),
            extension: Some(extension.to_ascii_lowercase()),
        })
    }

    /// Key of the waiting upload
    pub fn tmp_path(&self) -> String {
        format!("{}/{}", TMP_UPLOAD_PATH, self.uuid)
    }

    /// Name the file takes once claimed
    pub fn moved_file_name(&self) -> String {
        match (&self.name, &self.extension) {
            (Some(name), Some(ext)) => {
                let mut slug = slugify(name);
                slug.truncate(MAX_NAME_LENGTH);
                format!("{}_{}.{}", slug, self.uuid, ext)
            }
            _ => self.uuid.to_string(),
        }
    }
}

/// The waiting upload must exist, fit in `max_bytes` and, for assets, carry an image or video extension
pub async fn validate_asset(
    storage: &dyn BlobStorage,
    token: &UploadToken,
    upload_type: Option<&str>,
    max_bytes: u64,
) -> Result<(), StorageError> {
    let path = token.tmp_path();
    if !storage.exists(&path).await? {
        return Err(StorageError::InvalidUpload("File not found.".to_string()));
    }

    let size = storage.size(&path).await?;
    if size > max_bytes {
        return Err(StorageError::InvalidUpload(format!(
            "File is too large ({} bytes, max {})",
            size, max_bytes
        )));
    }

    if upload_type != Some("files") {
        let allowed = token
            .extension
            .as_deref()
            .map(|ext| ASSET_EXTENSIONS.contains(&ext))
            .unwrap_or(false);
        if !allowed {
            return Err(StorageError::InvalidUpload(format!(
                "File type must be one of: {}",
                ASSET_EXTENSIONS.join(", ")
            )));
        }
    }

    Ok(())
}
