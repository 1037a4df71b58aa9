use serde::{Deserialize, Serialize};

use crate::domain::types::{FileName, ImageId, ImageKind, ProductId, StoredPath};

/// A persisted image belonging to exactly one product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub kind: ImageKind,
    /// Original filename supplied by the client.
    pub filename: FileName,
    pub stored_path: StoredPath,
}

/// An image that has been written to storage but may not have a row yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NewProductImage {
    pub filename: FileName,
    pub stored_path: StoredPath,
}

impl From<ProductImage> for NewProductImage {
    fn from(image: ProductImage) -> Self {
        Self {
            filename: image.filename,
            stored_path: image.stored_path,
        }
    }
}

/// Both image collections of a product, kept segregated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    pub detail: Vec<NewProductImage>,
    pub display: Vec<NewProductImage>,
}

impl ImageSet {
    /// Every stored path across both collections.
    pub fn stored_paths(&self) -> Vec<StoredPath> {
        self.detail
            .iter()
            .chain(self.display.iter())
            .map(|image| image.stored_path.clone())
            .collect()
    }
}
