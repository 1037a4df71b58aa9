use actix_web::http::StatusCode;
use actix_web::{Responder, post, web};

use crate::dto::users::UserDto;
use crate::forms::auth::{LoginForm, LoginPayload, RegisterForm, RegisterPayload};
use crate::repository::DieselRepository;
use crate::routes::{error_response, respond};
use crate::services::users::{login_user, register_user};

#[post("/register")]
pub async fn register(
    form: web::Json<RegisterForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload = match RegisterPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => return error_response(e.into()),
    };

    match register_user(payload, repo.get_ref()) {
        Ok(user) => respond(StatusCode::CREATED, "User registered", UserDto::from(user)),
        Err(err) => error_response(err),
    }
}

#[post("/login")]
pub async fn login(form: web::Json<LoginForm>, repo: web::Data<DieselRepository>) -> impl Responder {
    let payload = match LoginPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => return error_response(e.into()),
    };

    match login_user(payload, repo.get_ref()) {
        Ok(user) => respond(StatusCode::OK, "Login successful", UserDto::from(user)),
        Err(err) => error_response(err),
    }
}
