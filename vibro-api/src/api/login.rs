//! Login endpoint.

use rocket::Route;
use rocket::http::{CookieJar, Status};
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::models::UserResponse;
use crate::orm::DbConn;
use crate::orm::login::process_login;

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by login and register: the user record plus a fresh opaque
/// session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Login endpoint.
///
/// - **URL:** `/api/1/login`
/// - **Method:** `POST`
/// - **Purpose:** Verifies credentials, creates a session, sets the
///   `session` cookie, and returns `{user, token}`.
///
/// Empty fields yield 400; unknown user or wrong password yield a
/// generic 401.
#[post("/1/login", data = "<login>")]
pub async fn login(
    db: DbConn,
    cookies: &CookieJar<'_>,
    login: Json<LoginRequest>,
) -> Result<Json<AuthResponse>, Status> {
    let (user, token) = process_login(&db, cookies, &login).await?;
    Ok(Json(AuthResponse { user: user.into(), token }))
}

pub fn routes() -> Vec<Route> {
    routes![login]
}
