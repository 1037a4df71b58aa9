//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values, coordinates and numeric constraints are enforced
//! at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be positive was zero/negative or invalid.
    #[error("{0} must be greater than zero")]
    NonPositiveNumber(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A numeric value was NaN or infinite.
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A numeric value fell outside its closed range.
    #[error("{0} must be between {1}")]
    OutOfRange(&'static str, &'static str),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

macro_rules! non_negative_f64_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
        #[serde(transparent)]
        pub struct $name(f64);

        impl $name {
            /// Constructs a finite numeric value that is zero or greater.
            pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
                if value.is_finite() && value >= 0.0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Returns the raw `f64` value.
            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

macro_rules! bounded_f64_newtype {
    ($name:ident, $doc:expr, $field:expr, $min:expr, $max:expr, $range:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            pub const MIN: f64 = $min;
            pub const MAX: f64 = $max;

            /// Constructs a value inside the closed range `[MIN, MAX]`.
            pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
                if !value.is_finite() {
                    return Err(TypeConstraintError::NotFinite($field));
                }
                if (Self::MIN..=Self::MAX).contains(&value) {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::OutOfRange($field, $range))
                }
            }

            /// Returns the raw `f64` value in degrees.
            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(UserId, "Unique identifier for a registered user.", "user_id");
id_newtype!(ImageId, "Row identifier of a stored image record.", "image_id");

non_empty_string_newtype!(
    ProductId,
    "Opaque product identifier assigned by the service at creation.",
    "product id"
);
non_empty_string_newtype!(
    CategoryName,
    "Free-text category label enforcing non-empty values.",
    "category"
);
non_empty_string_newtype!(
    PlaceName,
    "Display name of a listed place enforcing non-empty values.",
    "place name"
);
non_empty_string_newtype!(
    RegionName,
    "Administrative area label (kabupaten/kota).",
    "kab_kota"
);
non_empty_string_newtype!(
    LocationLabel,
    "Free-text location description.",
    "location"
);
non_empty_string_newtype!(
    ProductDescription,
    "Product description enforcing non-empty values.",
    "description"
);
non_empty_string_newtype!(
    FileName,
    "Original client-side filename of an uploaded image.",
    "filename"
);
non_empty_string_newtype!(
    StoredPath,
    "Storage-backend location of an image file.",
    "filename path"
);
non_empty_string_newtype!(Username, "Login name of a user.", "username");
non_empty_string_newtype!(UserRoles, "Comma separated role list.", "roles");

non_negative_f64_newtype!(
    ProductPrice,
    "Non-negative price value in standard currency units.",
    "price"
);

bounded_f64_newtype!(
    Latitude,
    "Latitude in decimal degrees.",
    "latitude",
    -90.0,
    90.0,
    "-90 and 90"
);
bounded_f64_newtype!(
    Longitude,
    "Longitude in decimal degrees.",
    "longitude",
    -180.0,
    180.0,
    "-180 and 180"
);

impl ProductId {
    /// Generates a fresh, collision-resistant identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl Default for UserRoles {
    fn default() -> Self {
        Self("user".to_string())
    }
}

/// Product rating. The usual domain is 0-5 but only finiteness is enforced.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct ProductRating(f64);

impl ProductRating {
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NotFinite("rating"))
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

/// Units in stock.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductStock(i32);

impl ProductStock {
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("stock"))
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

/// A validated point on the globe.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub latitude: Latitude,
    pub longitude: Longitude,
}

impl Coordinate {
    pub const fn new(latitude: Latitude, longitude: Longitude) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validates raw degrees and builds a coordinate.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            latitude: Latitude::new(latitude)?,
            longitude: Longitude::new(longitude)?,
        })
    }
}

/// Radius used by the nearby search. Must be strictly positive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct SearchRadiusKm(f64);

impl SearchRadiusKm {
    pub const DEFAULT: f64 = 10.0;

    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveNumber("max distance"))
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for SearchRadiusKm {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Maximum number of rows returned by ranked queries. Must be positive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ResultLimit(usize);

impl ResultLimit {
    pub const DEFAULT: usize = 10;

    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            usize::try_from(value)
                .map(Self)
                .map_err(|_| TypeConstraintError::InvalidValue(format!("limit: {value}")))
        } else {
            Err(TypeConstraintError::NonPositiveNumber("limit"))
        }
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for ResultLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Ordering applied to category listings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Nearest first.
    Distance,
    /// Cheapest first.
    Price,
    /// Top rated first.
    Rating,
    /// Most stock first.
    Availability,
}

impl SortBy {
    /// Parses a client-supplied sort key.
    ///
    /// Matching is case-insensitive. Unknown keys yield `None`, which callers
    /// treat the same as an absent key.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "distance" => Some(Self::Distance),
            "price" => Some(Self::Price),
            "rating" => Some(Self::Rating),
            "availability" => Some(Self::Availability),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Price => "price",
            Self::Rating => "rating",
            Self::Availability => "availability",
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two independently managed image collections of a product.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Detail,
    Display,
}

impl ImageKind {
    /// Storage sub-folder holding files of this kind.
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Detail => "detail_image",
            Self::Display => "display_image",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Detail => "detail",
            Self::Display => "display",
        }
    }
}

impl Display for ImageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_non_empty_strings() {
        let value = PlaceName::new("  Danau Toba  ").unwrap();
        assert_eq!(value.as_str(), "Danau Toba");
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = UserId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("user_id"));
    }

    #[test]
    fn generated_product_ids_are_unique() {
        assert_ne!(ProductId::generate(), ProductId::generate());
    }

    #[test]
    fn latitude_accepts_bounds_and_rejects_outside() {
        assert!(Latitude::new(-90.0).is_ok());
        assert!(Latitude::new(90.0).is_ok());
        let err = Latitude::new(90.5).unwrap_err();
        assert!(err.to_string().contains("latitude must be between -90 and 90"));
        assert_eq!(
            Latitude::new(f64::NAN).unwrap_err(),
            TypeConstraintError::NotFinite("latitude")
        );
    }

    #[test]
    fn longitude_rejects_outside_range() {
        assert!(Longitude::new(180.0).is_ok());
        assert!(Longitude::new(-180.1).is_err());
    }

    #[test]
    fn radius_and_limit_must_be_positive() {
        assert!(SearchRadiusKm::new(0.0).is_err());
        assert!(SearchRadiusKm::new(-1.0).is_err());
        assert_eq!(SearchRadiusKm::default().get(), 10.0);
        assert!(ResultLimit::new(0).is_err());
        assert_eq!(ResultLimit::new(3).unwrap().get(), 3);
        assert_eq!(ResultLimit::default().get(), 10);
    }

    #[test]
    fn sort_by_is_case_insensitive_and_falls_back_silently() {
        assert_eq!(SortBy::parse("Rating"), Some(SortBy::Rating));
        assert_eq!(SortBy::parse("PRICE"), Some(SortBy::Price));
        assert_eq!(SortBy::parse("availability"), Some(SortBy::Availability));
        assert_eq!(SortBy::parse("bogus"), None);
    }

    #[test]
    fn product_price_allows_zero() {
        assert_eq!(ProductPrice::new(0.0).unwrap().get(), 0.0);
        assert_eq!(
            ProductPrice::new(-0.01).unwrap_err(),
            TypeConstraintError::NegativeNumber("price")
        );
    }

    #[test]
    fn stock_rejects_negative_numbers() {
        assert!(ProductStock::new(-1).is_err());
        assert_eq!(ProductStock::new(0).unwrap().get(), 0);
    }
}
