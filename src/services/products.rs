//! Product create/update/delete orchestration.
//!
//! Image files are written before the database transaction and removed again
//! if the transaction fails. Files that an update or delete drops are only
//! removed after the transaction commits.

use log::{error, info};

use crate::domain::image::ImageSet;
use crate::domain::product::NewProduct;
use crate::domain::types::{ImageKind, ProductId, StoredPath};
use crate::forms::products::{CreateProductPayload, UpdateProductPayload};
use crate::repository::{ImageReader, ProductReader, ProductWriter, RepositoryError};
use crate::services::images::{
    AppliedCollection, CollectionPlan, ImageUrlResolver, apply_plan, discard, plan_collection,
};
use crate::services::query::{ProductListing, QueryEngine};
use crate::storage::{ImageStorage, ImageUpload};

use super::{ServiceError, ServiceResult};

fn conflict(product: &NewProduct) -> ServiceError {
    ServiceError::Conflict(format!(
        "Product '{}' already exists in category '{}'",
        product.place_name, product.category
    ))
}

/// Map a failed write, discarding the files written for it.
fn write_failed<S>(e: RepositoryError, storage: &S, written: &[StoredPath]) -> ServiceError
where
    S: ImageStorage + ?Sized,
{
    discard(storage, written);
    match e {
        RepositoryError::Conflict(detail) => {
            error!("Product write rejected by uniqueness constraint: {detail}");
            ServiceError::Conflict("Product already exists".to_string())
        }
        other => {
            error!("Failed to write product: {other}");
            ServiceError::Internal
        }
    }
}

/// Save every upload with a filename. On failure the files written so far are
/// removed.
fn save_all<S>(
    uploads: &[ImageUpload],
    kind: ImageKind,
    storage: &S,
) -> ServiceResult<AppliedCollection>
where
    S: ImageStorage + ?Sized,
{
    apply_plan(CollectionPlan::uploads_only(kind, uploads), storage).map_err(ServiceError::from)
}

/// Create a product with its detail and display images.
///
/// Fails with [`ServiceError::Conflict`] when the category already holds a
/// place with the same name and with [`ServiceError::Validation`] unless both
/// collections receive at least one image.
pub fn create_product<R, S>(
    payload: CreateProductPayload,
    repo: &R,
    storage: &S,
) -> ServiceResult<ProductId>
where
    R: ProductReader + ProductWriter,
    S: ImageStorage + ?Sized,
{
    let CreateProductPayload {
        product,
        detail_images,
        display_images,
    } = payload;

    match repo.product_exists(&product.category, &product.place_name) {
        Ok(true) => return Err(conflict(&product)),
        Ok(false) => {}
        Err(e) => {
            error!("Failed to check product uniqueness: {e}");
            return Err(ServiceError::Internal);
        }
    }

    if !detail_images.iter().any(ImageUpload::has_filename) {
        return Err(ServiceError::Validation(
            "At least one detail image is required".to_string(),
        ));
    }
    if !display_images.iter().any(ImageUpload::has_filename) {
        return Err(ServiceError::Validation(
            "At least one display image is required".to_string(),
        ));
    }

    let detail = save_all(&detail_images, ImageKind::Detail, storage)?;
    let display = match save_all(&display_images, ImageKind::Display, storage) {
        Ok(display) => display,
        Err(e) => {
            discard(storage, &detail.written);
            return Err(e);
        }
    };

    let images = ImageSet {
        detail: detail.images,
        display: display.images,
    };

    match repo.create_product(&product, &images) {
        Ok(id) => {
            info!("Created product {id} ({})", product.place_name);
            Ok(id)
        }
        Err(e) => Err(write_failed(e, storage, &images.stored_paths())),
    }
}

/// Overwrite a product and reconcile both image collections.
///
/// Existing images whose public URL appears in the retained set are kept,
/// all others are removed once the update commits. New uploads are appended
/// after the kept images.
pub fn update_product<R, S>(
    payload: UpdateProductPayload,
    resolver: &ImageUrlResolver,
    repo: &R,
    storage: &S,
) -> ServiceResult<ProductId>
where
    R: ProductReader + ProductWriter + ImageReader,
    S: ImageStorage + ?Sized,
{
    let UpdateProductPayload {
        id,
        product,
        detail_images,
        display_images,
        retained_detail,
        retained_display,
    } = payload;

    match repo.get_product_by_id(&id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            error!("Failed to get product {id}: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let existing = |kind: ImageKind| {
        repo.list_images(&id, kind).map_err(|e| {
            error!("Failed to list {kind} images for product {id}: {e}");
            ServiceError::Internal
        })
    };

    let detail_plan = plan_collection(
        ImageKind::Detail,
        existing(ImageKind::Detail)?,
        &retained_detail,
        &detail_images,
        resolver,
    );
    let display_plan = plan_collection(
        ImageKind::Display,
        existing(ImageKind::Display)?,
        &retained_display,
        &display_images,
        resolver,
    );

    if detail_plan.final_len() == 0 {
        return Err(ServiceError::Validation(
            "Product must keep at least one detail image".to_string(),
        ));
    }
    if display_plan.final_len() == 0 {
        return Err(ServiceError::Validation(
            "Product must keep at least one display image".to_string(),
        ));
    }

    let detail = apply_plan(detail_plan, storage)?;
    let display = match apply_plan(display_plan, storage) {
        Ok(display) => display,
        Err(e) => {
            discard(storage, &detail.written);
            return Err(e.into());
        }
    };

    let written: Vec<StoredPath> = detail
        .written
        .iter()
        .chain(display.written.iter())
        .cloned()
        .collect();
    let images = ImageSet {
        detail: detail.images,
        display: display.images,
    };

    match repo.update_product(&id, &product, &images) {
        Ok(true) => {}
        Ok(false) => {
            discard(storage, &written);
            return Err(ServiceError::NotFound);
        }
        Err(e) => return Err(write_failed(e, storage, &written)),
    }

    discard(storage, &detail.to_delete);
    discard(storage, &display.to_delete);
    info!("Updated product {id}");
    Ok(id)
}

/// Delete a product, its image rows and its image files.
///
/// Files are only touched after the rows are gone.
pub fn delete_product<R, S>(id: &ProductId, repo: &R, storage: &S) -> ServiceResult<()>
where
    R: ProductWriter,
    S: ImageStorage + ?Sized,
{
    match repo.delete_product(id) {
        Ok(Some(paths)) => {
            discard(storage, &paths);
            info!("Deleted product {id} and {} image(s)", paths.len());
            Ok(())
        }
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            error!("Failed to delete product {id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a single product with its resolved images.
pub fn get_product<R>(id: &ProductId, engine: &QueryEngine<'_, R>) -> ServiceResult<ProductListing>
where
    R: ProductReader + ImageReader,
{
    engine.get(id)?.ok_or(ServiceError::NotFound)
}
