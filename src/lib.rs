//! Core library exports for the Wisata catalog service.
//!
//! The `data` feature exposes the domain, geo math, models and repositories.
//! The `server` feature adds forms, services, image storage and the HTTP
//! routes assembled by [`run`].

pub mod db;
pub mod domain;
pub mod geo;
pub mod models;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod storage;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_files::Files;
    use actix_multipart::form::MultipartFormConfig;
    use actix_web::{App, HttpServer, middleware, web};

    use crate::db::DbPool;
    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes::{auth, main, products};
    use crate::storage::LocalImageStorage;

    /// Start the HTTP server and block until it shuts down.
    pub async fn run(config: ServerConfig, pool: DbPool) -> std::io::Result<()> {
        let bind = (config.address.clone(), config.port);
        let repo = web::Data::new(DieselRepository::new(pool));
        let storage = web::Data::new(LocalImageStorage::new(&config.storage_root));
        let multipart = MultipartFormConfig::default()
            .total_limit(config.max_upload_bytes.saturating_mul(10))
            .memory_limit(config.max_upload_bytes);
        let static_root = config.storage_root.clone();
        let config = web::Data::new(config);

        log::info!("Starting server on {}:{}", bind.0, bind.1);

        HttpServer::new(move || {
            App::new()
                .wrap(middleware::Logger::default())
                .app_data(repo.clone())
                .app_data(storage.clone())
                .app_data(config.clone())
                .app_data(multipart.clone())
                .service(Files::new("/static", &static_root))
                .service(main::index)
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login),
                )
                .service(
                    web::scope("/products")
                        .service(products::create_product)
                        .service(products::list_products)
                        .service(products::products_by_region)
                        .service(products::products_by_category)
                        .service(products::products_nearby)
                        .service(products::products_top_rated)
                        .service(products::show_product)
                        .service(products::update_product)
                        .service(products::delete_product),
                )
        })
        .bind(bind)?
        .run()
        .await
    }
}
