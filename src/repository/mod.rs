use crate::db::{DbConnection, DbPool};
use crate::domain::image::{ImageSet, ProductImage};
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{
    CategoryName, ImageKind, PlaceName, ProductId, RegionName, StoredPath, Username,
};
use crate::domain::user::{NewUser, User};

pub mod errors;
pub mod image;
pub mod product;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Filters applied when listing products.
///
/// Both filters are exact, case-sensitive matches. Results come back in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Filter by category label.
    pub category: Option<CategoryName>,
    /// Filter by region label (kab_kota).
    pub region: Option<RegionName>,
}

impl ProductListQuery {
    pub fn category(mut self, category: CategoryName) -> Self {
        self.category = Some(category);
        self
    }
    pub fn region(mut self, region: RegionName) -> Self {
        self.region = Some(region);
        self
    }
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// Whether a product with this category and place name already exists.
    fn product_exists(&self, category: &CategoryName, place_name: &PlaceName)
    -> RepositoryResult<bool>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: &ProductId) -> RepositoryResult<Option<Product>>;
    /// List products matching the supplied filters.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
}

/// Write operations for products and their image rows.
///
/// Every method runs in a single transaction covering the product row and
/// both image tables.
pub trait ProductWriter {
    /// Insert a product together with its images and return the assigned id.
    ///
    /// A duplicate (category, place_name) pair yields
    /// [`RepositoryError::Conflict`].
    fn create_product(&self, product: &NewProduct, images: &ImageSet)
    -> RepositoryResult<ProductId>;
    /// Overwrite product attributes and make each image collection equal to
    /// `images`. Rows whose stored path is kept are left untouched. Returns
    /// `false` when no product has this id.
    fn update_product(
        &self,
        id: &ProductId,
        product: &NewProduct,
        images: &ImageSet,
    ) -> RepositoryResult<bool>;
    /// Delete a product and its image rows. Returns the stored paths the rows
    /// referenced, or `None` when no product has this id.
    fn delete_product(&self, id: &ProductId) -> RepositoryResult<Option<Vec<StoredPath>>>;
}

/// Read-only access to image rows.
pub trait ImageReader {
    /// Images of one collection for a product, in insertion order.
    fn list_images(&self, product_id: &ProductId, kind: ImageKind)
    -> RepositoryResult<Vec<ProductImage>>;
}

/// Read-only operations for user accounts.
pub trait UserReader {
    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
}

/// Write operations for user accounts.
pub trait UserWriter {
    /// Persist a new user. A taken username yields [`RepositoryError::Conflict`].
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
}
