use std::collections::HashSet;
use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::NaiveTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::NewProduct;
use crate::domain::types::{
    CategoryName, Coordinate, LocationLabel, PlaceName, ProductDescription, ProductId,
    ProductPrice, ProductRating, ProductStock, RegionName, TypeConstraintError, UserId,
};
use crate::services::images::parse_retained_urls;
use crate::storage::ImageUpload;

/// Multipart body shared by product create and update.
///
/// `retained_*` fields are only read on update; create ignores them.
#[derive(MultipartForm)]
pub struct ProductForm {
    pub user_id: Text<i32>,
    pub category: Text<String>,
    pub place_name: Text<String>,
    pub rating: Text<f64>,
    pub price: Text<f64>,
    pub stock: Text<i32>,
    pub description: Text<String>,
    pub open_time: Text<String>,
    pub close_time: Text<String>,
    pub location: Text<String>,
    pub latitude: Text<f64>,
    pub longitude: Text<f64>,
    pub kab_kota: Text<String>,
    #[multipart(limit = "10MiB")]
    pub detail_images: Vec<TempFile>,
    #[multipart(limit = "10MiB")]
    pub display_images: Vec<TempFile>,
    pub retained_detail_images: Option<Text<String>>,
    pub retained_display_images: Option<Text<String>>,
}

/// Scalar product attributes extracted from [`ProductForm`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductFields {
    #[validate(range(min = 1))]
    pub user_id: i32,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub place_name: String,
    pub rating: f64,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub stock: i32,
    #[validate(length(min = 1))]
    pub description: String,
    pub open_time: String,
    pub close_time: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(min = 1))]
    pub kab_kota: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductPayload {
    pub product: NewProduct,
    pub detail_images: Vec<ImageUpload>,
    pub display_images: Vec<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductPayload {
    pub id: ProductId,
    pub product: NewProduct,
    pub detail_images: Vec<ImageUpload>,
    pub display_images: Vec<ImageUpload>,
    /// Public URLs of existing detail images to keep.
    pub retained_detail: HashSet<String>,
    /// Public URLs of existing display images to keep.
    pub retained_display: HashSet<String>,
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Invalid time of day '{0}', expected HH:MM or HH:MM:SS")]
    InvalidTime(String),
    #[error("Error reading uploaded file")]
    FileRead,
    #[error("Uploaded file '{name}' exceeds the {limit} byte limit")]
    FileTooLarge { name: String, limit: usize },
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl From<std::io::Error> for ProductFormError {
    fn from(_: std::io::Error) -> Self {
        Self::FileRead
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, ProductFormError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ProductFormError::InvalidTime(value.to_string()))
}

impl TryFrom<ProductFields> for NewProduct {
    type Error = ProductFormError;

    fn try_from(value: ProductFields) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            user_id: UserId::new(value.user_id)?,
            category: CategoryName::new(value.category)?,
            place_name: PlaceName::new(value.place_name)?,
            rating: ProductRating::new(value.rating)?,
            price: ProductPrice::new(value.price)?,
            stock: ProductStock::new(value.stock)?,
            description: ProductDescription::new(value.description)?,
            open_time: parse_time(&value.open_time)?,
            close_time: parse_time(&value.close_time)?,
            location: LocationLabel::new(value.location)?,
            coordinate: Coordinate::from_degrees(value.latitude, value.longitude)?,
            region: RegionName::new(value.kab_kota)?,
        })
    }
}

fn read_uploads(
    files: Vec<TempFile>,
    max_bytes: usize,
) -> Result<Vec<ImageUpload>, ProductFormError> {
    files
        .into_iter()
        .map(|mut file| {
            if file.size > max_bytes {
                return Err(ProductFormError::FileTooLarge {
                    name: file.file_name.unwrap_or_default(),
                    limit: max_bytes,
                });
            }
            let mut content = Vec::new();
            file.file.read_to_end(&mut content)?;
            Ok(ImageUpload {
                filename: file.file_name,
                content,
            })
        })
        .collect()
}

struct FormParts {
    fields: ProductFields,
    detail_images: Vec<TempFile>,
    display_images: Vec<TempFile>,
    retained_detail: Option<String>,
    retained_display: Option<String>,
}

impl ProductForm {
    fn into_parts(self) -> FormParts {
        FormParts {
            fields: ProductFields {
                user_id: self.user_id.into_inner(),
                category: self.category.into_inner(),
                place_name: self.place_name.into_inner(),
                rating: self.rating.into_inner(),
                price: self.price.into_inner(),
                stock: self.stock.into_inner(),
                description: self.description.into_inner(),
                open_time: self.open_time.into_inner(),
                close_time: self.close_time.into_inner(),
                location: self.location.into_inner(),
                latitude: self.latitude.into_inner(),
                longitude: self.longitude.into_inner(),
                kab_kota: self.kab_kota.into_inner(),
            },
            detail_images: self.detail_images,
            display_images: self.display_images,
            retained_detail: self.retained_detail_images.map(Text::into_inner),
            retained_display: self.retained_display_images.map(Text::into_inner),
        }
    }

    /// Build the payload for a new product. Files larger than `max_bytes`
    /// are rejected.
    pub fn into_create_payload(
        self,
        max_bytes: usize,
    ) -> Result<CreateProductPayload, ProductFormError> {
        let parts = self.into_parts();
        Ok(CreateProductPayload {
            product: parts.fields.try_into()?,
            detail_images: read_uploads(parts.detail_images, max_bytes)?,
            display_images: read_uploads(parts.display_images, max_bytes)?,
        })
    }

    /// Build the payload for an update of product `id`.
    pub fn into_update_payload(
        self,
        id: &str,
        max_bytes: usize,
    ) -> Result<UpdateProductPayload, ProductFormError> {
        let parts = self.into_parts();
        Ok(UpdateProductPayload {
            id: ProductId::new(id)?,
            product: parts.fields.try_into()?,
            detail_images: read_uploads(parts.detail_images, max_bytes)?,
            display_images: read_uploads(parts.display_images, max_bytes)?,
            retained_detail: parse_retained_urls(parts.retained_detail.as_deref()),
            retained_display: parse_retained_urls(parts.retained_display.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ProductFields {
        ProductFields {
            user_id: 1,
            category: "pantai".into(),
            place_name: "Pantai Cermin".into(),
            rating: 4.5,
            price: 15000.0,
            stock: 10,
            description: "Pantai berpasir putih".into(),
            open_time: "08:00".into(),
            close_time: "17:30:00".into(),
            location: "Serdang Bedagai".into(),
            latitude: 3.67,
            longitude: 98.98,
            kab_kota: "Serdang Bedagai".into(),
        }
    }

    #[test]
    fn converts_valid_fields() {
        let product = NewProduct::try_from(fields()).unwrap();
        assert_eq!(product.place_name.as_str(), "Pantai Cermin");
        assert_eq!(product.open_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(product.close_time, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert_eq!(product.region.as_str(), "Serdang Bedagai");
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let mut value = fields();
        value.latitude = 91.0;
        assert!(matches!(
            NewProduct::try_from(value),
            Err(ProductFormError::Validation(_))
        ));

        let mut value = fields();
        value.longitude = -180.5;
        assert!(NewProduct::try_from(value).is_err());
    }

    #[test]
    fn rejects_blank_text_and_bad_times() {
        let mut value = fields();
        value.category = "   ".into();
        assert!(matches!(
            NewProduct::try_from(value),
            Err(ProductFormError::TypeConstraint(_))
        ));

        let mut value = fields();
        value.open_time = "8 pagi".into();
        assert!(matches!(
            NewProduct::try_from(value),
            Err(ProductFormError::InvalidTime(_))
        ));
    }

    #[test]
    fn rejects_negative_price_and_stock() {
        let mut value = fields();
        value.price = -1.0;
        assert!(NewProduct::try_from(value).is_err());

        let mut value = fields();
        value.stock = -3;
        assert!(NewProduct::try_from(value).is_err());
    }
}
