#[cfg(feature = "server")]
pub mod config;
pub mod product;
pub mod product_image;
pub mod user;
