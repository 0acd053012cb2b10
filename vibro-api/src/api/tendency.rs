//! API endpoints for tendency (trend) records.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, can_write, db_error, error_status};
use crate::models::{NewTendency, Tendency};
use crate::orm::DbConn;
use crate::orm::scope::company_of_point;
use crate::orm::tendency::{
    TendencyFilter, company_of_tendency, delete_tendency, get_tendency_by_id, insert_tendency,
    list_tendencies, update_tendency,
};
use crate::session_guards::AuthenticatedUser;

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTendencyRequest {
    pub name: Option<String>,
    pub date: Option<String>,
    pub value: Option<f64>,
}

#[get("/1/Tendencies?<id>&<point>&<value>")]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: Option<i32>,
    point: Option<i32>,
    value: Option<f64>,
) -> Result<Json<Vec<Tendency>>, Status> {
    let scope = auth_user.scope();
    let filter = TendencyFilter { id, point, value };
    db.run(move |conn| list_tendencies(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing tendencies: {:?}", e);
            Status::InternalServerError
        })
}

#[get("/1/Tendencies/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<Tendency>, Status> {
    let (tendency, owner) = db
        .run(move |conn| {
            let tendency = get_tendency_by_id(conn, id)?;
            let owner = company_of_tendency(conn, id)?;
            Ok::<_, diesel::result::Error>((tendency, owner))
        })
        .await
        .map_err(|e| {
            error!("Database error retrieving tendency: {:?}", e);
            Status::InternalServerError
        })?;

    let tendency = tendency.ok_or(Status::NotFound)?;
    if !auth_user.is_privileged() && owner != Some(auth_user.user.company_id) {
        return Err(Status::NotFound);
    }
    Ok(Json(tendency))
}

#[post("/1/Tendencies", data = "<new_tendency>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_tendency: Json<NewTendency>,
) -> Result<status::Created<Json<Tendency>>, ApiError> {
    let point_id = new_tendency.point_id;
    let owner = db
        .run(move |conn| company_of_point(conn, point_id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::UnprocessableEntity, "Point does not exist"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to record tendencies for this point",
        ));
    }
    db.run(move |conn| insert_tendency(conn, new_tendency.into_inner()))
        .await
        .map(|tendency| status::Created::new("/").body(Json(tendency)))
        .map_err(db_error)
}

#[put("/1/Tendencies/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<UpdateTendencyRequest>,
) -> Result<Json<Tendency>, ApiError> {
    let owner = db
        .run(move |conn| company_of_tendency(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Tendency not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to update this tendency",
        ));
    }
    let UpdateTendencyRequest { name, date, value } = input.into_inner();
    db.run(move |conn| update_tendency(conn, id, name, date, value))
        .await
        .map(Json)
        .map_err(db_error)
}

#[delete("/1/Tendencies/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    let owner = db
        .run(move |conn| company_of_tendency(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Tendency not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to delete this tendency",
        ));
    }
    db.run(move |conn| delete_tendency(conn, id)).await.map_err(db_error)?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
