pub mod image;
pub mod product;
pub mod types;
pub mod user;
