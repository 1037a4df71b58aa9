pub mod errors;
pub mod images;
pub mod products;
pub mod query;
pub mod users;

pub use errors::{ServiceError, ServiceResult};
