use serde::Deserialize;

use crate::geo::DEFAULT_AVERAGE_SPEED_KMH;

/// Configuration options for the catalog service.
///
/// Loaded by `main` from `config/default.yaml`, an optional
/// `config/{APP_ENV}.yaml` and `APP_`-prefixed environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Directory holding uploaded images; also served under `/static`.
    #[serde(default = "default_storage_root")]
    pub storage_root: String,
    /// Public URL prefix for image links. Derived from the request when absent.
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Average speed used to estimate travel time.
    #[serde(default = "default_average_speed")]
    pub average_speed_kmh: f64,
    /// Per-file upload cap in bytes. The multipart extractor caps files at
    /// 10 MiB regardless.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage_root() -> String {
    "app/asset".to_string()
}

fn default_average_speed() -> f64 {
    DEFAULT_AVERAGE_SPEED_KMH
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
