use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryName, Coordinate, LocationLabel, PlaceName, ProductDescription, ProductId,
    ProductPrice, ProductRating, ProductStock, RegionName, UserId,
};

/// A tourism listing with a fixed geocoordinate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    /// Owner that created the listing.
    pub user_id: UserId,
    pub category: CategoryName,
    pub place_name: PlaceName,
    pub rating: ProductRating,
    pub price: ProductPrice,
    pub stock: ProductStock,
    pub description: ProductDescription,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub location: LocationLabel,
    pub coordinate: Coordinate,
    /// Region label (kabupaten/kota) used as a coarse location filter.
    pub region: RegionName,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Client-editable attributes of a [`Product`], used for both insert and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub user_id: UserId,
    pub category: CategoryName,
    pub place_name: PlaceName,
    pub rating: ProductRating,
    pub price: ProductPrice,
    pub stock: ProductStock,
    pub description: ProductDescription,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub location: LocationLabel,
    pub coordinate: Coordinate,
    pub region: RegionName,
}
