use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::image::NewProductImage;
use crate::domain::types::{FileName, ImageKind, StoredPath};
use crate::storage::{ImageStorage, ImageUpload, StorageError};

/// In-memory storage recording every save and delete, used for unit tests.
#[derive(Default)]
pub struct TestImageStorage {
    counter: AtomicUsize,
    /// Fail once this many saves have succeeded.
    fail_after: Option<usize>,
    pub saved: Mutex<Vec<StoredPath>>,
    pub deleted: Mutex<Vec<StoredPath>>,
}

impl TestImageStorage {
    pub fn failing_after(saves: usize) -> Self {
        Self {
            fail_after: Some(saves),
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<StoredPath> {
        self.saved.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<StoredPath> {
        self.deleted.lock().unwrap().clone()
    }
}

impl ImageStorage for TestImageStorage {
    fn save(&self, upload: &ImageUpload, kind: ImageKind) -> Result<NewProductImage, StorageError> {
        let name = match upload.filename.as_deref() {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return Err(StorageError::MissingFilename),
        };
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| n >= limit) {
            return Err(StorageError::Write {
                path: name,
                source: std::io::Error::other("disk full"),
            });
        }
        let path = StoredPath::new(format!("app/asset/{}/{n}_{name}", kind.folder()))?;
        self.saved.lock().unwrap().push(path.clone());
        Ok(NewProductImage {
            filename: FileName::new(name)?,
            stored_path: path,
        })
    }

    fn delete(&self, path: &StoredPath) {
        self.deleted.lock().unwrap().push(path.clone());
    }
}
