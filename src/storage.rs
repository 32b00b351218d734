// ABOUTME: Uploaded image storage - validation, persistence, URL resolution, orphan sweep
// ABOUTME: Records are deleted before their files; the sweep reclaims anything left behind
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Image storage
//!
//! Uploaded images live under `<upload_dir>/<namespace>/` with generated
//! filenames; records hold the relative path and responses resolve it to a
//! public URL. File removal is best-effort and never fails a request: the
//! record is the source of truth, and `sweep_orphans` reclaims files no
//! record references.

use crate::errors::{AppError, AppResult, FieldErrorMap};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// Maximum accepted image size: 2048 KB, matching the validation message
pub const MAX_IMAGE_BYTES: usize = 2048 * 1024;

/// Accepted image extensions and their content types
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
];

/// An uploaded image part, before validation
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied filename
    pub file_name: String,
    /// Client-supplied content type
    pub content_type: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

/// Filesystem store for uploaded images
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl ImageStore {
    /// Create a store rooted at `root`; URLs are prefixed with `public_base_url`
    #[must_use]
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Root directory of the store
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate an upload against the type whitelist and size cap.
    /// Failures surface as a field error on `image`, like any other rule.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the `image` field
    pub fn validate(upload: &ImageUpload) -> AppResult<()> {
        let mut errors = FieldErrorMap::new();

        let extension = Path::new(&upload.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let type_ok = ALLOWED_TYPES.iter().any(|(ext, content_type)| {
            *ext == extension && *content_type == upload.content_type
        });
        if !type_ok {
            errors.insert(
                "image".into(),
                vec!["The image must be a file of type: jpeg, png, jpg, gif, svg.".into()],
            );
        }

        if upload.bytes.len() > MAX_IMAGE_BYTES {
            errors
                .entry("image".into())
                .or_default()
                .push("The image may not be greater than 2048 kilobytes.".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(errors))
        }
    }

    /// Persist a validated upload under `namespace`; returns the relative path
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be written
    pub async fn save(&self, namespace: &str, upload: &ImageUpload) -> AppResult<String> {
        let extension = Path::new(&upload.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "bin".into());

        let relative = format!("{namespace}/{}.{extension}", Uuid::new_v4());
        let absolute = self.root.join(&relative);

        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(format!("Failed to create {namespace}: {e}")))?;
        }

        tokio::fs::write(&absolute, &upload.bytes)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write image: {e}")))?;

        tracing::debug!(path = %relative, size = upload.bytes.len(), "stored image");
        Ok(relative)
    }

    /// Best-effort removal of a stored file; failures are logged, not surfaced
    pub async fn delete(&self, relative: &str) {
        let Some(absolute) = self.resolve(relative) else {
            tracing::warn!(path = %relative, "refusing to delete path outside store");
            return;
        };
        if let Err(e) = tokio::fs::remove_file(&absolute).await {
            tracing::warn!(path = %relative, "failed to remove image file: {e}");
        }
    }

    /// Public URL for a stored relative path
    #[must_use]
    pub fn url(&self, relative: &str) -> String {
        format!("{}/storage/{relative}", self.public_base_url)
    }

    /// Remove stored files whose relative path is not in `referenced`.
    /// Returns the number of files removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be read
    pub async fn sweep_orphans(&self, referenced: &HashSet<String>) -> AppResult<usize> {
        let mut removed = 0;

        let mut namespaces = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            // Nothing stored yet
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(AppError::storage(format!("Failed to read store: {e}"))),
        };

        while let Some(namespace) = namespaces
            .next_entry()
            .await
            .map_err(|e| AppError::storage(format!("Failed to read store: {e}")))?
        {
            if !namespace.path().is_dir() {
                continue;
            }
            let dir_name = namespace.file_name().to_string_lossy().into_owned();

            let mut files = tokio::fs::read_dir(namespace.path())
                .await
                .map_err(|e| AppError::storage(format!("Failed to read {dir_name}: {e}")))?;

            while let Some(file) = files
                .next_entry()
                .await
                .map_err(|e| AppError::storage(format!("Failed to read {dir_name}: {e}")))?
            {
                let relative = format!("{dir_name}/{}", file.file_name().to_string_lossy());
                if !referenced.contains(&relative) {
                    if let Err(e) = tokio::fs::remove_file(file.path()).await {
                        tracing::warn!(path = %relative, "failed to remove orphan: {e}");
                    } else {
                        tracing::info!(path = %relative, "removed orphaned image");
                        removed += 1;
                    }
                }
            }
        }

        Ok(removed)
    }

    /// Resolve a relative path inside the store, rejecting traversal
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        let safe = path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        safe.then(|| self.root.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_upload(bytes: Vec<u8>) -> ImageUpload {
        ImageUpload {
            file_name: "photo.png".into(),
            content_type: "image/png".into(),
            bytes,
        }
    }

    fn store(dir: &tempfile::TempDir) -> ImageStore {
        ImageStore::new(dir.path().to_path_buf(), "http://localhost:8081".into())
    }

    #[test]
    fn test_validate_accepts_whitelisted_types() {
        assert!(ImageStore::validate(&png_upload(vec![1, 2, 3])).is_ok());

        let svg = ImageUpload {
            file_name: "logo.svg".into(),
            content_type: "image/svg+xml".into(),
            bytes: vec![b'<'],
        };
        assert!(ImageStore::validate(&svg).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_type_and_size() {
        let pdf = ImageUpload {
            file_name: "doc.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: vec![0],
        };
        let err = ImageStore::validate(&pdf).unwrap_err();
        assert!(err.field_errors.unwrap().contains_key("image"));

        let oversized = png_upload(vec![0; MAX_IMAGE_BYTES + 1]);
        assert!(ImageStore::validate(&oversized).is_err());

        // Extension/content-type mismatch is rejected too
        let mismatched = ImageUpload {
            file_name: "photo.png".into(),
            content_type: "image/gif".into(),
            bytes: vec![0],
        };
        assert!(ImageStore::validate(&mismatched).is_err());
    }

    #[tokio::test]
    async fn test_save_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let relative = store.save("produits", &png_upload(vec![9, 9, 9])).await.unwrap();
        assert!(relative.starts_with("produits/"));
        assert!(relative.ends_with(".png"));

        let on_disk = dir.path().join(&relative);
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), vec![9, 9, 9]);
        assert_eq!(
            store.url(&relative),
            format!("http://localhost:8081/storage/{relative}")
        );

        store.delete(&relative).await;
        assert!(!on_disk.exists());
        // Re-delete is silent
        store.delete(&relative).await;
    }

    #[tokio::test]
    async fn test_sweep_removes_only_orphans() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let kept = store.save("services", &png_upload(vec![1])).await.unwrap();
        let orphan = store.save("services", &png_upload(vec![2])).await.unwrap();

        let referenced = HashSet::from([kept.clone()]);
        let removed = store.sweep_orphans(&referenced).await.unwrap();

        assert_eq!(removed, 1);
        assert!(dir.path().join(&kept).exists());
        assert!(!dir.path().join(&orphan).exists());
    }

    #[tokio::test]
    async fn test_delete_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("outside.txt");
        tokio::fs::write(&outside, b"keep").await.unwrap();

        let sub = dir.path().join("store");
        let store = ImageStore::new(sub, "http://localhost".into());
        store.delete("../outside.txt").await;

        assert!(outside.exists());
    }
}
