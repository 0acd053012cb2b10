//! Registration endpoint with field-level validation.

use rocket::Route;
use rocket::http::{CookieJar, Status};
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::api::login::AuthResponse;
use crate::models::NewUser;
use crate::orm::DbConn;
use crate::orm::company::get_company_by_id;
use crate::orm::login::{create_and_store_session, hash_password, set_session_cookie};
use crate::orm::user::{get_user_by_email, insert_user};

#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub company_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 422 body: one entry per failed field, nothing persisted.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn field_error(field: &str, message: &str) -> FieldError {
    FieldError { field: field.into(), message: message.into() }
}

/// Register endpoint.
///
/// - **URL:** `/api/1/register`
/// - **Method:** `POST`
/// - **Purpose:** Validates and persists a new user, then issues a
///   session like login does.
///
/// Validation: well-formed non-empty email, password of at least 8
/// characters, an existing company, and an email nobody has taken.
/// Any failure returns 422 with the complete list of field errors.
#[post("/1/register", data = "<request>")]
pub async fn register(
    db: DbConn,
    cookies: &CookieJar<'_>,
    request: Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, status::Custom<Json<ValidationErrors>>> {
    let mut errors = Vec::new();

    let email = request.email.trim().to_string();
    if email.is_empty() {
        errors.push(field_error("email", "Email must not be empty"));
    } else if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        errors.push(field_error("email", "Email is not a valid address"));
    }
    if request.password.len() < 8 {
        errors.push(field_error("password", "Password must be at least 8 characters"));
    }

    let company_id = request.company_id;
    match db.run(move |conn| get_company_by_id(conn, company_id)).await {
        Ok(Some(_)) => {}
        Ok(None) => errors.push(field_error("company_id", "Company does not exist")),
        Err(e) => {
            error!("Database error checking company: {:?}", e);
            return Err(internal_error());
        }
    }

    if !email.is_empty() {
        let lookup = email.clone();
        match db.run(move |conn| get_user_by_email(conn, &lookup)).await {
            Ok(Some(_)) => errors.push(field_error("email", "Email is already registered")),
            Ok(None) => {}
            Err(e) => {
                error!("Database error checking email: {:?}", e);
                return Err(internal_error());
            }
        }
    }

    if !errors.is_empty() {
        return Err(status::Custom(
            Status::UnprocessableEntity,
            Json(ValidationErrors { errors }),
        ));
    }

    let new_user = NewUser {
        email,
        password_hash: hash_password(&request.password),
        company_id: request.company_id,
        is_staff: false,
        is_superuser: false,
    };
    let user = db
        .run(move |conn| insert_user(conn, new_user))
        .await
        .map_err(|e| {
            error!("Database error inserting user: {:?}", e);
            internal_error()
        })?;

    let token = create_and_store_session(&db, user.id)
        .await
        .map_err(|_| internal_error())?;
    set_session_cookie(cookies, &token);

    Ok(Json(AuthResponse { user: user.into(), token }))
}

fn internal_error() -> status::Custom<Json<ValidationErrors>> {
    status::Custom(Status::InternalServerError, Json(ValidationErrors { errors: Vec::new() }))
}

pub fn routes() -> Vec<Route> {
    routes![register]
}
