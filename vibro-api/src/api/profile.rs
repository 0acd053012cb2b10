//! API endpoints for user profiles.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, can_write, db_error, error_status};
use crate::models::{NewProfile, Profile};
use crate::orm::DbConn;
use crate::orm::profile::{
    ProfileFilter, company_of_profile, delete_profile, get_profile_by_id, insert_profile,
    list_profiles, update_profile,
};
use crate::orm::user::get_user_by_id;
use crate::session_guards::AuthenticatedUser;

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[get("/1/Profiles?<id>&<name>")]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: Option<i32>,
    name: Option<String>,
) -> Result<Json<Vec<Profile>>, Status> {
    let scope = auth_user.scope();
    let filter = ProfileFilter { id, name };
    db.run(move |conn| list_profiles(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing profiles: {:?}", e);
            Status::InternalServerError
        })
}

#[get("/1/Profiles/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<Profile>, Status> {
    let (profile, owner) = db
        .run(move |conn| {
            let profile = get_profile_by_id(conn, id)?;
            let owner = company_of_profile(conn, id)?;
            Ok::<_, diesel::result::Error>((profile, owner))
        })
        .await
        .map_err(|e| {
            error!("Database error retrieving profile: {:?}", e);
            Status::InternalServerError
        })?;

    let profile = profile.ok_or(Status::NotFound)?;
    if !auth_user.is_privileged() && owner != Some(auth_user.user.company_id) {
        return Err(Status::NotFound);
    }
    Ok(Json(profile))
}

#[post("/1/Profiles", data = "<new_profile>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_profile: Json<NewProfile>,
) -> Result<status::Created<Json<Profile>>, ApiError> {
    let target_user_id = new_profile.user_id;
    let target_user = db
        .run(move |conn| get_user_by_id(conn, target_user_id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::UnprocessableEntity, "User does not exist"))?;

    if !can_write(&auth_user, target_user.company_id) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to create a profile for this user",
        ));
    }
    db.run(move |conn| insert_profile(conn, new_profile.into_inner()))
        .await
        .map(|profile| status::Created::new("/").body(Json(profile)))
        .map_err(db_error)
}

#[put("/1/Profiles/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let owner = db
        .run(move |conn| company_of_profile(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Profile not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to update this profile",
        ));
    }
    let UpdateProfileRequest { name, phone } = input.into_inner();
    db.run(move |conn| update_profile(conn, id, name, phone))
        .await
        .map(Json)
        .map_err(db_error)
}

#[delete("/1/Profiles/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    let owner = db
        .run(move |conn| company_of_profile(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Profile not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to delete this profile",
        ));
    }
    db.run(move |conn| delete_profile(conn, id)).await.map_err(db_error)?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
