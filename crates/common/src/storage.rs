//! Media storage abstraction for uploaded files.
//!
//! The platform treats binary media storage as an opaque collaborator:
//! bytes go in, a durable public URL comes out. The local filesystem backend
//! is the default; a hosted object store can be slotted in behind the same
//! trait.

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base path for stored files.
    pub base_path: PathBuf,
    /// Base URL for serving files.
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./media"),
            base_url: "/media".to_string(),
        }
    }
}

/// What kind of media a file is, which decides its storage prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Full video files.
    Video,
    /// Video thumbnail images.
    Thumbnail,
    /// User/channel avatar images.
    Avatar,
}

impl MediaKind {
    /// Storage key prefix for this kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Video => "videos",
            Self::Thumbnail => "thumbnails",
            Self::Avatar => "avatars",
        }
    }
}

/// Uploaded file metadata.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Storage key (path or object key).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
    /// MD5 hash of the file.
    pub md5: String,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upload a file.
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<UploadedFile>;

    /// Delete a file.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;

    /// Check if a file exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}

/// Generate a storage key for a new upload.
///
/// Keys are `{kind}/{id}.{ext}` where the extension is derived from the
/// original file name when present.
#[must_use]
pub fn generate_storage_key(kind: MediaKind, id: &str, file_name: Option<&str>) -> String {
    let ext = file_name
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, e)| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()));

    match ext {
        Some(ext) => format!("{}/{id}.{ext}", kind.prefix()),
        None => format!("{}/{id}", kind.prefix()),
    }
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    /// Create a backend from a [`StorageConfig`].
    #[must_use]
    pub fn from_config(config: StorageConfig) -> Self {
        Self::new(config.base_path, config.base_url)
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<UploadedFile> {
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        let md5 = format!("{:x}", md5::compute(data));

        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to delete file: {e}")))?;
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.base_path.join(key);
        Ok(path.exists())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key_with_extension() {
        let key = generate_storage_key(MediaKind::Video, "01abc", Some("clip.MP4"));
        assert_eq!(key, "videos/01abc.mp4");
    }

    #[test]
    fn test_generate_storage_key_without_extension() {
        let key = generate_storage_key(MediaKind::Thumbnail, "01abc", None);
        assert_eq!(key, "thumbnails/01abc");
    }

    #[test]
    fn test_generate_storage_key_rejects_odd_extensions() {
        let key = generate_storage_key(MediaKind::Avatar, "01abc", Some("x.not-an-ext!"));
        assert_eq!(key, "avatars/01abc");
    }

    #[tokio::test]
    async fn test_local_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("clipstream-test-{}", std::process::id()));
        let storage = LocalStorage::new(dir.clone(), "/media".to_string());

        let uploaded = storage
            .upload("thumbnails/t1.png", b"fake-png", "image/png")
            .await
            .unwrap();

        assert_eq!(uploaded.url, "/media/thumbnails/t1.png");
        assert_eq!(uploaded.size, 8);
        assert!(storage.exists("thumbnails/t1.png").await.unwrap());

        storage.delete("thumbnails/t1.png").await.unwrap();
        assert!(!storage.exists("thumbnails/t1.png").await.unwrap());

        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
