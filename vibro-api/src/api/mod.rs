//! HTTP endpoints, one module per resource plus the auth endpoints.
//!
//! Every module exposes a `routes()` function; they all get mounted
//! under `/api`.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::session_guards::AuthenticatedUser;

pub mod city;
pub mod company;
pub mod espectra;
pub mod image;
pub mod login;
pub mod logout;
pub mod machine;
pub mod measurement;
pub mod point;
pub mod profile;
pub mod register;
pub mod report;
pub mod tendency;
pub mod termo_image;
pub mod time_signal;
pub mod user;

/// Error response body for API failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) type ApiError = status::Custom<Json<ErrorResponse>>;

pub(crate) fn error_status(code: Status, message: impl Into<String>) -> ApiError {
    status::Custom(code, Json(ErrorResponse { error: message.into() }))
}

pub(crate) fn db_error(e: diesel::result::Error) -> ApiError {
    error!("Database error: {:?}", e);
    error_status(Status::InternalServerError, "Database error")
}

/// Whether the caller may write records owned by the given company.
pub(crate) fn can_write(auth: &AuthenticatedUser, owner_company: i32) -> bool {
    auth.is_privileged() || auth.user.company_id == owner_company
}

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(city::routes());
    routes.extend(company::routes());
    routes.extend(espectra::routes());
    routes.extend(image::routes());
    routes.extend(login::routes());
    routes.extend(logout::routes());
    routes.extend(machine::routes());
    routes.extend(measurement::routes());
    routes.extend(point::routes());
    routes.extend(profile::routes());
    routes.extend(register::routes());
    routes.extend(report::routes());
    routes.extend(tendency::routes());
    routes.extend(termo_image::routes());
    routes.extend(time_signal::routes());
    routes.extend(user::routes());
    routes
}
