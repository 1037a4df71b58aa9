use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use crate::geo::TravelPolicy;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;
use crate::services::images::ImageUrlResolver;

pub mod auth;
pub mod main;
pub mod products;

/// JSON envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn respond<T: Serialize>(status: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse {
        message: message.to_string(),
        data: Some(data),
    })
}

pub fn message(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::<()> {
        message: message.to_string(),
        data: None,
    })
}

/// Map a service failure onto a status code and envelope.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => message(StatusCode::UNAUTHORIZED, "Invalid username or password"),
        ServiceError::NotFound => message(StatusCode::NOT_FOUND, "Not found"),
        ServiceError::Conflict(text)
        | ServiceError::Form(text)
        | ServiceError::TypeConstraint(text)
        | ServiceError::Validation(text) => message(StatusCode::BAD_REQUEST, &text),
        ServiceError::Storage(text) => {
            log::error!("Storage failure: {text}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store image")
        }
        ServiceError::Internal => {
            message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Resolver for image URLs, using the configured public base URL or the
/// scheme and host of the current request.
pub fn url_resolver(req: &HttpRequest, config: &ServerConfig) -> ImageUrlResolver {
    let base_url = match &config.public_base_url {
        Some(base_url) => base_url.clone(),
        None => {
            let info = req.connection_info();
            format!("{}://{}/", info.scheme(), info.host())
        }
    };
    ImageUrlResolver::new(&config.storage_root, &base_url)
}

pub fn travel_policy(config: &ServerConfig) -> TravelPolicy {
    TravelPolicy::new(config.average_speed_kmh).unwrap_or_else(|e| {
        log::warn!("Invalid average speed in config, using default: {e}");
        TravelPolicy::default()
    })
}
