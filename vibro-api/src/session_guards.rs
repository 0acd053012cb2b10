//! Session-based authentication guard for Rocket routes.
//!
//! Validates the opaque session token presented either as an
//! `Authorization: Bearer` header or a `session` cookie, and resolves
//! the owning user. Routes take an `AuthenticatedUser` parameter to
//! require authentication.

use chrono::Utc;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use crate::DbConn;
use crate::models::{Session, User};
use crate::orm::scope::TenantScope;
use crate::schema::{sessions, users};

/// A request guard for routes that require an authenticated user.
///
/// Checks, in order:
/// 1. A session token from the `Authorization: Bearer` header, falling
///    back to the `session` cookie
/// 2. That the session exists, is not revoked, and has not expired
/// 3. That the owning user still exists
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user: User,
    /// The token the request authenticated with, for logout.
    pub token: String,
}

impl AuthenticatedUser {
    /// Staff and superusers may read and write across tenants.
    pub fn is_privileged(&self) -> bool {
        self.user.is_staff || self.user.is_superuser
    }

    pub fn scope(&self) -> TenantScope {
        TenantScope::for_user(&self.user)
    }
}

fn bearer_token(request: &Request<'_>) -> Option<String> {
    request
        .headers()
        .get_one("Authorization")
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = match request.guard::<DbConn>().await {
            Outcome::Success(db) => db,
            _ => return Outcome::Error((Status::InternalServerError, ())),
        };

        let token = match bearer_token(request)
            .or_else(|| request.cookies().get("session").map(|c| c.value().to_string()))
        {
            Some(token) => token,
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        let session_token = token.clone();
        let session_result = db
            .run(move |conn| {
                sessions::table
                    .filter(sessions::id.eq(&token))
                    .filter(sessions::revoked.eq(false))
                    .filter(
                        sessions::expires_at
                            .is_null()
                            .or(sessions::expires_at.gt(Utc::now().naive_utc())),
                    )
                    .first::<Session>(conn)
                    .optional()
            })
            .await;

        let session = match session_result {
            Ok(Some(sess)) => sess,
            Ok(None) => return Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                error!("Database error finding session: {:?}", e);
                return Outcome::Error((Status::Unauthorized, ()));
            }
        };

        let user_result = db
            .run(move |conn| {
                users::table
                    .filter(users::id.eq(session.user_id))
                    .first::<User>(conn)
                    .optional()
            })
            .await;

        match user_result {
            Ok(Some(user)) => Outcome::Success(AuthenticatedUser { user, token: session_token }),
            Ok(None) => Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                error!("Database error finding user: {:?}", e);
                Outcome::Error((Status::Unauthorized, ()))
            }
        }
    }
}
