use actix_web::http::StatusCode;
use actix_web::{Responder, get};

use crate::routes::message;

#[get("/")]
pub async fn index() -> impl Responder {
    message(StatusCode::OK, "Welcome to the Wisata catalog API")
}
