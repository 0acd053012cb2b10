//! API endpoints for cities.
//!
//! Cities are shared reference data; non-privileged callers only see
//! the ones their company points at, and only privileged callers
//! create new ones.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, db_error, error_status};
use crate::models::{City, NewCity};
use crate::orm::DbConn;
use crate::orm::city::{
    CityFilter, city_referenced_by_company, delete_city, get_city_by_id, insert_city, list_cities,
    update_city,
};
use crate::session_guards::AuthenticatedUser;

#[get("/1/Cities?<name>")]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    name: Option<String>,
) -> Result<Json<Vec<City>>, Status> {
    let scope = auth_user.scope();
    let filter = CityFilter { name };
    db.run(move |conn| list_cities(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing cities: {:?}", e);
            Status::InternalServerError
        })
}

#[get("/1/Cities/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<City>, Status> {
    let company = auth_user.user.company_id;
    let privileged = auth_user.is_privileged();
    let city = db
        .run(move |conn| {
            let city = get_city_by_id(conn, id)?;
            if city.is_some() && !privileged && !city_referenced_by_company(conn, id, company)? {
                return Ok(None);
            }
            Ok::<_, diesel::result::Error>(city)
        })
        .await
        .map_err(|e| {
            error!("Database error retrieving city: {:?}", e);
            Status::InternalServerError
        })?
        .ok_or(Status::NotFound)?;
    Ok(Json(city))
}

#[post("/1/Cities", data = "<new_city>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_city: Json<NewCity>,
) -> Result<status::Created<Json<City>>, ApiError> {
    if !auth_user.is_privileged() {
        return Err(error_status(Status::Forbidden, "Only staff may create cities"));
    }
    db.run(move |conn| insert_city(conn, new_city.into_inner()))
        .await
        .map(|city| status::Created::new("/").body(Json(city)))
        .map_err(db_error)
}

#[put("/1/Cities/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<NewCity>,
) -> Result<Json<City>, ApiError> {
    if !auth_user.is_privileged() {
        return Err(error_status(Status::Forbidden, "Only staff may update cities"));
    }
    db.run(move |conn| {
        get_city_by_id(conn, id)?
            .ok_or(diesel::result::Error::NotFound)?;
        update_city(conn, id, Some(input.name.clone()))
    })
    .await
    .map(Json)
    .map_err(|e| match e {
        diesel::result::Error::NotFound => error_status(Status::NotFound, "City not found"),
        other => db_error(other),
    })
}

#[delete("/1/Cities/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    if !auth_user.is_privileged() {
        return Err(error_status(Status::Forbidden, "Only staff may delete cities"));
    }
    let deleted = db.run(move |conn| delete_city(conn, id)).await.map_err(db_error)?;
    if deleted == 0 {
        return Err(error_status(Status::NotFound, "City not found"));
    }
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
