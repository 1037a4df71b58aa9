use diesel::prelude::*;

use crate::domain::image::ProductImage as DomainProductImage;
use crate::domain::types::{
    FileName, ImageId, ImageKind, ProductId, StoredPath, TypeConstraintError,
};

/// Diesel model representing the `detail_images` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::detail_images)]
pub struct DetailImage {
    pub id: i32,
    pub product_id: String,
    pub filename: String,
    pub filename_path: String,
}

/// Insertable form of [`DetailImage`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::detail_images)]
pub struct NewDetailImage {
    pub product_id: String,
    pub filename: String,
    pub filename_path: String,
}

/// Diesel model representing the `display_images` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::display_images)]
pub struct DisplayImage {
    pub id: i32,
    pub product_id: String,
    pub filename: String,
    pub filename_path: String,
}

/// Insertable form of [`DisplayImage`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::display_images)]
pub struct NewDisplayImage {
    pub product_id: String,
    pub filename: String,
    pub filename_path: String,
}

fn to_domain(
    kind: ImageKind,
    id: i32,
    product_id: String,
    filename: String,
    filename_path: String,
) -> Result<DomainProductImage, TypeConstraintError> {
    Ok(DomainProductImage {
        id: ImageId::new(id)?,
        product_id: ProductId::new(product_id)?,
        kind,
        filename: FileName::new(filename)?,
        stored_path: StoredPath::new(filename_path)?,
    })
}

impl TryFrom<DetailImage> for DomainProductImage {
    type Error = TypeConstraintError;

    fn try_from(image: DetailImage) -> Result<Self, Self::Error> {
        to_domain(
            ImageKind::Detail,
            image.id,
            image.product_id,
            image.filename,
            image.filename_path,
        )
    }
}

impl TryFrom<DisplayImage> for DomainProductImage {
    type Error = TypeConstraintError;

    fn try_from(image: DisplayImage) -> Result<Self, Self::Error> {
        to_domain(
            ImageKind::Display,
            image.id,
            image.product_id,
            image.filename,
            image.filename_path,
        )
    }
}
