//! Image URL resolution and keep/delete/add reconciliation for product image
//! collections.
//!
//! Clients only ever see public URLs. On update they send back the URLs they
//! want to keep; everything else in the collection is scheduled for deletion
//! and new uploads are appended after the kept images.

use std::collections::{HashMap, HashSet};

use log::{error, warn};

use crate::domain::image::{NewProductImage, ProductImage};
use crate::domain::types::{ImageKind, StoredPath};
use crate::storage::{ImageStorage, ImageUpload, StorageError};

/// Converts between stored paths and the public URLs served under `/static/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlResolver {
    /// Storage root with forward slashes and a trailing `/`.
    storage_prefix: String,
    /// Public base URL with a trailing `/`.
    base_url: String,
}

impl ImageUrlResolver {
    pub fn new(storage_root: &str, base_url: &str) -> Self {
        Self {
            storage_prefix: with_trailing_slash(&storage_root.replace('\\', "/")),
            base_url: with_trailing_slash(base_url),
        }
    }

    /// Public URL for a stored path.
    ///
    /// Backslashes are normalised to forward slashes and the storage root is
    /// stripped, so `app/asset/detail_image/a.jpg` becomes
    /// `{base}static/detail_image/a.jpg`.
    pub fn to_public_url(&self, path: &StoredPath) -> String {
        let normalized = path.as_str().replace('\\', "/");
        let relative = normalized
            .strip_prefix(&self.storage_prefix)
            .unwrap_or(&normalized)
            .trim_start_matches('/');
        format!("{}static/{}", self.base_url, relative)
    }

    /// Inverse of [`Self::to_public_url`]. Returns `None` for URLs that do not
    /// point into this resolver's static tree.
    pub fn to_stored_path(&self, url: &str) -> Option<StoredPath> {
        let prefix = format!("{}static/", self.base_url);
        let relative = url.strip_prefix(&prefix)?;
        if relative.is_empty() {
            return None;
        }
        StoredPath::new(format!("{}{}", self.storage_prefix, relative)).ok()
    }
}

fn with_trailing_slash(value: &str) -> String {
    if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{value}/")
    }
}

/// An image annotated with its public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub image: ProductImage,
    pub public_url: String,
}

/// Resolve public URLs for a whole collection.
pub fn resolve_images(images: Vec<ProductImage>, resolver: &ImageUrlResolver) -> Vec<ResolvedImage> {
    images
        .into_iter()
        .map(|image| ResolvedImage {
            public_url: resolver.to_public_url(&image.stored_path),
            image,
        })
        .collect()
}

/// Parse the client's list of retained URLs.
///
/// The field carries a JSON array of strings. A missing or blank field means
/// nothing is retained. Malformed input is logged and treated the same way.
pub fn parse_retained_urls(raw: Option<&str>) -> HashSet<String> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return HashSet::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(urls) => urls.into_iter().collect(),
        Err(e) => {
            warn!("Ignoring malformed retained image list: {e}");
            HashSet::new()
        }
    }
}

/// Keep/delete/add decision for one image collection.
#[derive(Debug)]
pub struct CollectionPlan<'a> {
    pub kind: ImageKind,
    /// Existing images that stay, in their original order.
    pub keep: Vec<ProductImage>,
    /// Existing images that go once the update commits.
    pub delete: Vec<ProductImage>,
    /// Uploads with a usable filename, in submission order.
    pub uploads: Vec<&'a ImageUpload>,
}

impl<'a> CollectionPlan<'a> {
    /// Plan for a collection that has no existing images yet.
    pub fn uploads_only(kind: ImageKind, uploads: &'a [ImageUpload]) -> Self {
        Self {
            kind,
            keep: Vec::new(),
            delete: Vec::new(),
            uploads: uploads.iter().filter(|u| u.has_filename()).collect(),
        }
    }

    /// Size of the collection after the plan is applied.
    pub fn final_len(&self) -> usize {
        self.keep.len() + self.uploads.len()
    }
}

/// Decide which existing images stay and which uploads get added.
///
/// Only URLs that resolve to an existing image in this collection count;
/// unknown URLs are ignored. Upload entries without a filename are skipped.
pub fn plan_collection<'a>(
    kind: ImageKind,
    existing: Vec<ProductImage>,
    retained: &HashSet<String>,
    uploads: &'a [ImageUpload],
    resolver: &ImageUrlResolver,
) -> CollectionPlan<'a> {
    let by_url: HashMap<String, StoredPath> = existing
        .iter()
        .map(|image| {
            (
                resolver.to_public_url(&image.stored_path),
                image.stored_path.clone(),
            )
        })
        .collect();
    let retained_paths: HashSet<&StoredPath> = retained
        .iter()
        .filter_map(|url| by_url.get(url))
        .collect();

    let (keep, delete): (Vec<_>, Vec<_>) = existing
        .into_iter()
        .partition(|image| retained_paths.contains(&image.stored_path));

    CollectionPlan {
        kind,
        keep,
        delete,
        uploads: uploads.iter().filter(|u| u.has_filename()).collect(),
    }
}

/// Result of writing a plan's uploads to storage.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AppliedCollection {
    /// Final collection: kept images followed by new uploads.
    pub images: Vec<NewProductImage>,
    /// Paths written by this call, removed again if the transaction fails.
    pub written: Vec<StoredPath>,
    /// Paths to remove after the transaction commits.
    pub to_delete: Vec<StoredPath>,
}

/// Persist the plan's uploads and compute the final collection.
///
/// On a storage failure every file written by this call is removed before
/// the error is returned.
pub fn apply_plan<S>(plan: CollectionPlan<'_>, storage: &S) -> Result<AppliedCollection, StorageError>
where
    S: ImageStorage + ?Sized,
{
    let mut images: Vec<NewProductImage> = plan.keep.into_iter().map(Into::into).collect();
    let mut written = Vec::with_capacity(plan.uploads.len());

    for upload in plan.uploads {
        match storage.save(upload, plan.kind) {
            Ok(saved) => {
                written.push(saved.stored_path.clone());
                images.push(saved);
            }
            Err(e) => {
                error!("Failed to store {} image: {e}", plan.kind);
                discard(storage, &written);
                return Err(e);
            }
        }
    }

    Ok(AppliedCollection {
        images,
        written,
        to_delete: plan
            .delete
            .into_iter()
            .map(|image| image.stored_path)
            .collect(),
    })
}

/// Best-effort removal of files, used both for compensation and for
/// post-commit cleanup.
pub fn discard<S>(storage: &S, paths: &[StoredPath])
where
    S: ImageStorage + ?Sized,
{
    for path in paths {
        storage.delete(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{FileName, ImageId, ProductId};
    use crate::storage::test::TestImageStorage;

    fn resolver() -> ImageUrlResolver {
        ImageUrlResolver::new("app/asset", "http://h/")
    }

    fn image(id: i32, kind: ImageKind, name: &str) -> ProductImage {
        ProductImage {
            id: ImageId::new(id).unwrap(),
            product_id: ProductId::new("p1").unwrap(),
            kind,
            filename: FileName::new(name).unwrap(),
            stored_path: StoredPath::new(format!("app/asset/{}/{name}", kind.folder())).unwrap(),
        }
    }

    fn urls(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn public_url_strips_root_and_normalizes_separators() {
        let r = resolver();
        let path = StoredPath::new("app/asset\\detail_image\\a.jpg").unwrap();
        assert_eq!(r.to_public_url(&path), "http://h/static/detail_image/a.jpg");

        let r = ImageUrlResolver::new("app/asset/", "http://h");
        let path = StoredPath::new("app/asset/display_image/b.png").unwrap();
        assert_eq!(r.to_public_url(&path), "http://h/static/display_image/b.png");
    }

    #[test]
    fn stored_path_round_trips_through_url() {
        let r = resolver();
        let path = StoredPath::new("app/asset/detail_image/1700000000000_ab12cd34.jpg").unwrap();
        let url = r.to_public_url(&path);
        assert_eq!(r.to_stored_path(&url), Some(path));
        assert_eq!(r.to_stored_path("http://other/static/x.jpg"), None);
        assert_eq!(r.to_stored_path("http://h/static/"), None);
    }

    #[test]
    fn retained_list_parsing() {
        assert!(parse_retained_urls(None).is_empty());
        assert!(parse_retained_urls(Some("  ")).is_empty());
        assert!(parse_retained_urls(Some("not json")).is_empty());
        assert!(parse_retained_urls(Some("[1, 2]")).is_empty());
        assert_eq!(
            parse_retained_urls(Some(r#"["http://h/static/a.jpg","http://h/static/a.jpg"]"#)),
            urls(&["http://h/static/a.jpg"])
        );
    }

    #[test]
    fn retaining_every_url_without_uploads_keeps_the_collection() {
        let r = resolver();
        let old = vec![
            image(1, ImageKind::Detail, "a.jpg"),
            image(2, ImageKind::Detail, "b.jpg"),
        ];
        let retained: HashSet<String> = old
            .iter()
            .map(|i| r.to_public_url(&i.stored_path))
            .collect();

        let plan = plan_collection(ImageKind::Detail, old.clone(), &retained, &[], &r);
        assert_eq!(plan.keep, old);
        assert!(plan.delete.is_empty());

        let storage = TestImageStorage::default();
        let applied = apply_plan(plan, &storage).unwrap();
        assert_eq!(applied.images.len(), 2);
        assert!(applied.written.is_empty());
        assert!(applied.to_delete.is_empty());
        assert!(storage.saved().is_empty());
    }

    #[test]
    fn keeps_retained_and_appends_uploads() {
        let r = resolver();
        let old = vec![
            image(1, ImageKind::Detail, "a.jpg"),
            image(2, ImageKind::Detail, "b.jpg"),
        ];
        let retained = urls(&["http://h/static/detail_image/a.jpg"]);
        let uploads = vec![ImageUpload::new("c.jpg", b"c".to_vec())];

        let plan = plan_collection(ImageKind::Detail, old, &retained, &uploads, &r);
        assert_eq!(plan.final_len(), 2);

        let storage = TestImageStorage::default();
        let applied = apply_plan(plan, &storage).unwrap();
        let names: Vec<&str> = applied.images.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
        assert_eq!(
            applied.to_delete,
            vec![StoredPath::new("app/asset/detail_image/b.jpg").unwrap()]
        );
        assert_eq!(applied.written, storage.saved());
    }

    #[test]
    fn unknown_urls_and_blank_uploads_are_ignored() {
        let r = resolver();
        let old = vec![image(1, ImageKind::Display, "a.jpg")];
        let retained = urls(&[
            "http://h/static/display_image/zzz.jpg",
            "http://h/static/detail_image/a.jpg",
        ]);
        let uploads = vec![ImageUpload::default(), ImageUpload::new("  ", vec![])];

        let plan = plan_collection(ImageKind::Display, old, &retained, &uploads, &r);
        assert!(plan.keep.is_empty());
        assert_eq!(plan.delete.len(), 1);
        assert_eq!(plan.final_len(), 0);
    }

    #[test]
    fn storage_failure_discards_files_written_so_far() {
        let r = resolver();
        let uploads = vec![
            ImageUpload::new("x.jpg", vec![1]),
            ImageUpload::new("y.jpg", vec![2]),
        ];
        let plan = plan_collection(ImageKind::Detail, vec![], &HashSet::new(), &uploads, &r);

        let storage = TestImageStorage::failing_after(1);
        assert!(apply_plan(plan, &storage).is_err());
        assert_eq!(storage.saved().len(), 1);
        assert_eq!(storage.deleted(), storage.saved());
    }
}
