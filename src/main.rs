use std::env;

use config::{Config, Environment, File};
use log::error;
use wisata_catalog::db::{establish_connection_pool, run_migrations};
use wisata_catalog::models::config::ServerConfig;

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => {
            if let Err(e) = run_migrations(&mut conn) {
                error!("Failed to run migrations: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to get database connection: {e}");
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::create_dir_all(&server_config.storage_root) {
        error!("Failed to create storage root {}: {e}", server_config.storage_root);
        std::process::exit(1);
    }

    wisata_catalog::run(server_config, pool).await
}
