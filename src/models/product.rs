use chrono::{NaiveDateTime, NaiveTime};
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{
    CategoryName, Coordinate, LocationLabel, PlaceName, ProductDescription, ProductId,
    ProductPrice, ProductRating, ProductStock, RegionName, TypeConstraintError, UserId,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: String,
    pub user_id: i32,
    pub category: String,
    pub place_name: String,
    pub rating: f64,
    pub price: f64,
    pub stock: i32,
    pub description: String,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kab_kota: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub id: String,
    pub user_id: i32,
    pub category: String,
    pub place_name: String,
    pub rating: f64,
    pub price: f64,
    pub stock: i32,
    pub description: String,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kab_kota: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patchable columns of [`Product`]; the identifier and creation time never change.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChangeset {
    pub user_id: i32,
    pub category: String,
    pub place_name: String,
    pub rating: f64,
    pub price: f64,
    pub stock: i32,
    pub description: String,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kab_kota: String,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(product.id)?,
            user_id: UserId::new(product.user_id)?,
            category: CategoryName::new(product.category)?,
            place_name: PlaceName::new(product.place_name)?,
            rating: ProductRating::new(product.rating)?,
            price: ProductPrice::new(product.price)?,
            stock: ProductStock::new(product.stock)?,
            description: ProductDescription::new(product.description)?,
            open_time: product.open_time,
            close_time: product.close_time,
            location: LocationLabel::new(product.location)?,
            coordinate: Coordinate::from_degrees(product.latitude, product.longitude)?,
            region: RegionName::new(product.kab_kota)?,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl NewProduct {
    pub fn from_domain(id: &ProductId, product: &DomainNewProduct, now: NaiveDateTime) -> Self {
        Self {
            id: id.as_str().to_string(),
            user_id: product.user_id.get(),
            category: product.category.as_str().to_string(),
            place_name: product.place_name.as_str().to_string(),
            rating: product.rating.get(),
            price: product.price.get(),
            stock: product.stock.get(),
            description: product.description.as_str().to_string(),
            open_time: product.open_time,
            close_time: product.close_time,
            location: product.location.as_str().to_string(),
            latitude: product.coordinate.latitude.get(),
            longitude: product.coordinate.longitude.get(),
            kab_kota: product.region.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl ProductChangeset {
    pub fn from_domain(product: &DomainNewProduct, now: NaiveDateTime) -> Self {
        Self {
            user_id: product.user_id.get(),
            category: product.category.as_str().to_string(),
            place_name: product.place_name.as_str().to_string(),
            rating: product.rating.get(),
            price: product.price.get(),
            stock: product.stock.get(),
            description: product.description.as_str().to_string(),
            open_time: product.open_time,
            close_time: product.close_time,
            location: product.location.as_str().to_string(),
            latitude: product.coordinate.latitude.get(),
            longitude: product.coordinate.longitude.get(),
            kab_kota: product.region.as_str().to_string(),
            updated_at: now,
        }
    }
}
