//! Logout endpoint.

use rocket::Route;
use rocket::http::{CookieJar, Status};
use rocket::serde::json::Json;
use serde::Serialize;

use crate::orm::DbConn;
use crate::orm::logout::{clear_session_cookie, revoke_session};
use crate::session_guards::AuthenticatedUser;

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Logout endpoint.
///
/// - **URL:** `/api/1/logout`
/// - **Method:** `POST`
/// - **Purpose:** Revokes the presented session token and clears the
///   cookie. The token stops validating immediately.
#[post("/1/logout")]
pub async fn logout(
    db: DbConn,
    cookies: &CookieJar<'_>,
    auth_user: AuthenticatedUser,
) -> Result<Json<LogoutResponse>, Status> {
    revoke_session(&db, &auth_user.token).await?;
    clear_session_cookie(cookies);
    Ok(Json(LogoutResponse { message: "Logged out".into() }))
}

pub fn routes() -> Vec<Route> {
    routes![logout]
}
