//! API endpoints for measurement points.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, can_write, db_error, error_status};
use crate::models::{NewPoint, Point};
use crate::orm::DbConn;
use crate::orm::point::{
    PointFilter, delete_point, get_point_by_id, insert_point, list_points, update_point,
};
use crate::orm::scope::{company_of_measurement, company_of_point};
use crate::session_guards::AuthenticatedUser;

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdatePointRequest {
    pub number: Option<i32>,
    pub position: Option<String>,
    pub point_type: Option<String>,
}

#[get("/1/Points?<id>&<number>&<position>&<point_type>&<measurement>")]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: Option<i32>,
    number: Option<i32>,
    position: Option<String>,
    point_type: Option<String>,
    measurement: Option<i32>,
) -> Result<Json<Vec<Point>>, Status> {
    let scope = auth_user.scope();
    let filter = PointFilter { id, number, position, point_type, measurement };
    db.run(move |conn| list_points(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing points: {:?}", e);
            Status::InternalServerError
        })
}

#[get("/1/Points/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<Point>, Status> {
    let (point, owner) = db
        .run(move |conn| {
            let point = get_point_by_id(conn, id)?;
            let owner = company_of_point(conn, id)?;
            Ok::<_, diesel::result::Error>((point, owner))
        })
        .await
        .map_err(|e| {
            error!("Database error retrieving point: {:?}", e);
            Status::InternalServerError
        })?;

    let point = point.ok_or(Status::NotFound)?;
    if !auth_user.is_privileged() && owner != Some(auth_user.user.company_id) {
        return Err(Status::NotFound);
    }
    Ok(Json(point))
}

#[post("/1/Points", data = "<new_point>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_point: Json<NewPoint>,
) -> Result<status::Created<Json<Point>>, ApiError> {
    let measurement_id = new_point.measurement_id;
    let owner = db
        .run(move |conn| company_of_measurement(conn, measurement_id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::UnprocessableEntity, "Measurement does not exist"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to add points to this measurement",
        ));
    }
    db.run(move |conn| insert_point(conn, new_point.into_inner()))
        .await
        .map(|point| status::Created::new("/").body(Json(point)))
        .map_err(db_error)
}

#[put("/1/Points/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<UpdatePointRequest>,
) -> Result<Json<Point>, ApiError> {
    let owner = db
        .run(move |conn| company_of_point(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Point not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to update this point",
        ));
    }
    let UpdatePointRequest { number, position, point_type } = input.into_inner();
    db.run(move |conn| update_point(conn, id, number, position, point_type))
        .await
        .map(Json)
        .map_err(db_error)
}

#[delete("/1/Points/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    let owner = db
        .run(move |conn| company_of_point(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Point not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to delete this point",
        ));
    }
    db.run(move |conn| delete_point(conn, id)).await.map_err(db_error)?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
