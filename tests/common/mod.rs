//! Helpers for integration tests.

#![allow(dead_code)]

use chrono::NaiveTime;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;
use wisata_catalog::db::{DbPool, establish_connection_pool};
use wisata_catalog::domain::image::NewProductImage;
use wisata_catalog::domain::product::NewProduct;
use wisata_catalog::domain::types::{
    CategoryName, Coordinate, FileName, ImageKind, LocationLabel, PlaceName, ProductDescription,
    ProductPrice, ProductRating, ProductStock, RegionName, StoredPath, UserId,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn new_product(category: &str, place: &str, region: &str, lat: f64, lon: f64) -> NewProduct {
    NewProduct {
        user_id: UserId::new(1).unwrap(),
        category: CategoryName::new(category).unwrap(),
        place_name: PlaceName::new(place).unwrap(),
        rating: ProductRating::new(4.5).unwrap(),
        price: ProductPrice::new(25000.0).unwrap(),
        stock: ProductStock::new(10).unwrap(),
        description: ProductDescription::new("Tempat wisata").unwrap(),
        open_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        close_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        location: LocationLabel::new("Sumatera Utara").unwrap(),
        coordinate: Coordinate::from_degrees(lat, lon).unwrap(),
        region: RegionName::new(region).unwrap(),
    }
}

pub fn image(kind: ImageKind, name: &str) -> NewProductImage {
    NewProductImage {
        filename: FileName::new(name).unwrap(),
        stored_path: StoredPath::new(format!("app/asset/{}/{name}", kind.folder())).unwrap(),
    }
}
