//! Path and query-string parameters of the location-aware listings.

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{
    CategoryName, Coordinate, RegionName, ResultLimit, SearchRadiusKm, SortBy,
    TypeConstraintError,
};
use crate::services::query::{CategorySearch, TopRatedSearch};

#[derive(Debug, Error)]
pub enum QueryFormError {
    #[error("Query validation failed: {0}")]
    Validation(String),
    #[error("Query contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for QueryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for QueryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// `{lat},{lon}` path segment.
#[derive(Debug, Deserialize, Validate)]
pub struct LocationPath {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
}

impl TryFrom<LocationPath> for Coordinate {
    type Error = QueryFormError;

    fn try_from(value: LocationPath) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Coordinate::from_degrees(value.lat, value.lon)?)
    }
}

/// `/kab_kota/{kab_kota}/{lat},{lon}`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegionPath {
    #[validate(length(min = 1))]
    pub kab_kota: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
}

impl RegionPath {
    pub fn into_parts(self) -> Result<(RegionName, Coordinate), QueryFormError> {
        self.validate()?;
        Ok((
            RegionName::new(self.kab_kota)?,
            Coordinate::from_degrees(self.lat, self.lon)?,
        ))
    }
}

/// Query string of `/category/{category}`.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub sortby: Option<String>,
    /// Optional region filter.
    pub location: Option<String>,
}

impl CategoryQuery {
    pub fn into_search(self, category: String) -> Result<CategorySearch, QueryFormError> {
        self.validate()?;
        let region = self
            .location
            .filter(|value| !value.trim().is_empty())
            .map(RegionName::new)
            .transpose()?;
        Ok(CategorySearch {
            category: CategoryName::new(category)?,
            origin: Coordinate::from_degrees(self.latitude, self.longitude)?,
            sort_by: self.sortby.as_deref().and_then(SortBy::parse),
            region,
        })
    }
}

/// Query string of `/nearme/{lat},{lon}`.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub max_distance: Option<f64>,
}

impl TryFrom<NearbyQuery> for SearchRadiusKm {
    type Error = QueryFormError;

    fn try_from(value: NearbyQuery) -> Result<Self, Self::Error> {
        Ok(match value.max_distance {
            Some(radius) => SearchRadiusKm::new(radius)?,
            None => SearchRadiusKm::default(),
        })
    }
}

/// Query string of `/populer/{lat},{lon}`.
#[derive(Debug, Deserialize)]
pub struct TopRatedQuery {
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl TopRatedQuery {
    pub fn into_search(self, origin: Coordinate) -> Result<TopRatedSearch, QueryFormError> {
        let category = self
            .category
            .filter(|value| !value.trim().is_empty())
            .map(CategoryName::new)
            .transpose()?;
        let limit = match self.limit {
            Some(limit) => ResultLimit::new(limit)?,
            None => ResultLimit::default(),
        };
        Ok(TopRatedSearch {
            origin,
            category,
            limit,
        })
    }
}
