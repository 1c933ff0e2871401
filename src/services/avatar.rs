//! Avatar storage
//!
//! Stores uploaded profile pictures on disk and produces the public URL the
//! directory records. The store only ever sees a `(bytes, content_type)`
//! pair; multipart parsing is the API layer's job.

use crate::services::{ServiceError, ServiceResult};
use anyhow::Context;
use std::path::PathBuf;
use tokio::fs;

/// Content types accepted for avatars, with their file extensions.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// On-disk avatar storage.
pub struct AvatarStore {
    dir: PathBuf,
    base_url: String,
}

impl AvatarStore {
    /// Create a store writing under `dir` and producing URLs under
    /// `base_url` (e.g. `http://localhost:8000`).
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
        }
    }

    /// Write the avatar for a user and return its public URL.
    ///
    /// One avatar per user: the filename derives from the email, so a new
    /// upload overwrites the previous one. Unsupported content types are
    /// rejected with `InvalidInput`.
    pub async fn store(
        &self,
        email: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> ServiceResult<String> {
        let ext = ALLOWED_TYPES
            .iter()
            .find(|(ct, _)| *ct == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("Unsupported file type: {}", content_type))
            })?;

        fs::create_dir_all(&self.dir)
            .await
            .context("Failed to create avatar directory")?;

        let filename = format!("{}.{}", sanitize_email(email), ext);
        let path = self.dir.join(&filename);
        fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write avatar file: {:?}", path))?;

        Ok(format!("{}/uploads/avatars/{}", self.base_url, filename))
    }
}

/// Path separators must not leak into the filename.
fn sanitize_email(email: &str) -> String {
    email.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> AvatarStore {
        AvatarStore::new(dir.path(), "http://localhost:8000")
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_url() {
        let dir = TempDir::new().unwrap();
        let url = store(&dir)
            .store("user@example.com", "image/png", b"fake-png-bytes")
            .await
            .expect("Store failed");

        assert_eq!(
            url,
            "http://localhost:8000/uploads/avatars/user@example.com.png"
        );
        let written = std::fs::read(dir.path().join("user@example.com.png")).unwrap();
        assert_eq!(written, b"fake-png-bytes");
    }

    #[tokio::test]
    async fn test_store_rejects_unsupported_type() {
        let dir = TempDir::new().unwrap();
        let result = store(&dir)
            .store("user@example.com", "image/gif", b"gif-bytes")
            .await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_store_overwrites_previous_avatar() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.store("user@example.com", "image/jpeg", b"old").await.unwrap();
        s.store("user@example.com", "image/jpeg", b"new").await.unwrap();

        let written = std::fs::read(dir.path().join("user@example.com.jpg")).unwrap();
        assert_eq!(written, b"new");
    }

    #[tokio::test]
    async fn test_store_sanitizes_path_separators() {
        let dir = TempDir::new().unwrap();
        let url = store(&dir)
            .store("weird/../name@example.com", "image/webp", b"bytes")
            .await
            .expect("Store failed");

        assert!(url.ends_with("/uploads/avatars/weird_.._name@example.com.webp"));
        assert!(dir.path().join("weird_.._name@example.com.webp").exists());
    }
}
