//! Image file storage.
//!
//! Files are written under a root directory split by [`ImageKind`] folder.
//! The stored path recorded in the database is the root-relative location
//! joined onto the root, exactly as written to disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::domain::image::NewProductImage;
use crate::domain::types::{FileName, ImageKind, StoredPath, TypeConstraintError};

#[cfg(test)]
pub mod test;

/// An uploaded file as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageUpload {
    /// Client-side filename; `None` or empty for an unused form slot.
    pub filename: Option<String>,
    pub content: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: Some(filename.into()),
            content,
        }
    }

    /// Whether this entry carries a usable filename. Empty slots are skipped
    /// rather than rejected.
    pub fn has_filename(&self) -> bool {
        self.filename
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload has no filename")]
    MissingFilename,
    #[error("failed to create folder {path}: {source}")]
    CreateFolder {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid stored path: {0}")]
    InvalidPath(#[from] TypeConstraintError),
}

/// Backend persisting image files.
pub trait ImageStorage {
    /// Write `upload` under the folder for `kind` using a fresh unique name.
    fn save(&self, upload: &ImageUpload, kind: ImageKind) -> Result<NewProductImage, StorageError>;
    /// Remove a stored file. Best effort: failures are logged, never returned.
    fn delete(&self, path: &StoredPath);
}

/// Stores images on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Build a collision-resistant filename keeping the original extension.
pub fn unique_file_name(original: &str) -> String {
    let extension = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let unique_code = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}{}",
        Utc::now().timestamp_millis(),
        &unique_code[..8],
        extension
    )
}

impl ImageStorage for LocalImageStorage {
    fn save(&self, upload: &ImageUpload, kind: ImageKind) -> Result<NewProductImage, StorageError> {
        let original = match upload.filename.as_deref() {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => return Err(StorageError::MissingFilename),
        };

        let folder = self.root.join(kind.folder());
        std::fs::create_dir_all(&folder).map_err(|source| StorageError::CreateFolder {
            path: folder.display().to_string(),
            source,
        })?;

        let target = folder.join(unique_file_name(original));
        let target_str = target.to_string_lossy().to_string();
        std::fs::write(&target, &upload.content).map_err(|source| StorageError::Write {
            path: target_str.clone(),
            source,
        })?;

        log::info!("Saved {kind} image {original} to {target_str}");

        Ok(NewProductImage {
            filename: FileName::new(original)?,
            stored_path: StoredPath::new(target_str)?,
        })
    }

    fn delete(&self, path: &StoredPath) {
        match std::fs::remove_file(path.as_str()) {
            Ok(()) => log::info!("Deleted image file {path}"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("Image file {path} was already missing")
            }
            Err(e) => log::error!("Failed to delete image file {path}: {e}"),
        }
    }
}
