use serde::Serialize;

use crate::domain::types::ProductId;
use crate::services::images::ResolvedImage;
use crate::services::query::ProductListing;

/// Image entry as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageDto {
    pub id: i32,
    pub filename: String,
    pub filename_path: String,
    pub file_url: String,
}

impl From<ResolvedImage> for ImageDto {
    fn from(value: ResolvedImage) -> Self {
        Self {
            id: value.image.id.get(),
            filename: value.image.filename.into_inner(),
            filename_path: value.image.stored_path.into_inner(),
            file_url: value.public_url,
        }
    }
}

/// Product record returned by every listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDto {
    pub id: String,
    pub user_id: i32,
    pub category: String,
    pub place_name: String,
    pub rating: f64,
    pub price: f64,
    pub stock: i32,
    pub description: String,
    pub open_time: String,
    pub close_time: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kab_kota: String,
    pub detail_images: Vec<ImageDto>,
    pub display_images: Vec<ImageDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time_minutes: Option<u64>,
}

impl From<ProductListing> for ProductDto {
    fn from(value: ProductListing) -> Self {
        let product = value.product;
        Self {
            id: product.id.into_inner(),
            user_id: product.user_id.get(),
            category: product.category.into_inner(),
            place_name: product.place_name.into_inner(),
            rating: product.rating.get(),
            price: product.price.get(),
            stock: product.stock.get(),
            description: product.description.into_inner(),
            open_time: product.open_time.format("%H:%M:%S").to_string(),
            close_time: product.close_time.format("%H:%M:%S").to_string(),
            location: product.location.into_inner(),
            latitude: product.coordinate.latitude.get(),
            longitude: product.coordinate.longitude.get(),
            kab_kota: product.region.into_inner(),
            detail_images: value.detail_images.into_iter().map(Into::into).collect(),
            display_images: value.display_images.into_iter().map(Into::into).collect(),
            distance_km: value.travel.map(|t| (t.distance_km * 100.0).round() / 100.0),
            travel_time_minutes: value.travel.map(|t| t.eta_minutes()),
        }
    }
}

/// Body of create/update/delete responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductIdDto {
    pub product_id: String,
}

impl From<ProductId> for ProductIdDto {
    fn from(value: ProductId) -> Self {
        Self {
            product_id: value.into_inner(),
        }
    }
}
