//! Current-user endpoint.

use rocket::Route;
use rocket::serde::json::Json;

use crate::models::UserResponse;
use crate::session_guards::AuthenticatedUser;

/// Current user endpoint.
///
/// - **URL:** `/api/1/user`
/// - **Method:** `GET`
/// - **Purpose:** Returns the caller's own user record, without the
///   password hash.
#[get("/1/user")]
pub async fn current_user(auth_user: AuthenticatedUser) -> Json<UserResponse> {
    Json(auth_user.user.into())
}

pub fn routes() -> Vec<Route> {
    routes![current_user]
}
