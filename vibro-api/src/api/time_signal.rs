//! API endpoints for time-signal records.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, can_write, db_error, error_status};
use crate::models::{NewTimeSignal, TimeSignal};
use crate::orm::DbConn;
use crate::orm::scope::company_of_point;
use crate::orm::time_signal::{
    TimeSignalFilter, company_of_time_signal, delete_time_signal, get_time_signal_by_id,
    insert_time_signal, list_time_signals, update_time_signal,
};
use crate::session_guards::AuthenticatedUser;

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTimeSignalRequest {
    pub identifier: Option<String>,
    pub value: Option<f64>,
}

#[get("/1/TimeSignals?<id>&<identifier>&<point>&<value>")]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: Option<i32>,
    identifier: Option<String>,
    point: Option<i32>,
    value: Option<f64>,
) -> Result<Json<Vec<TimeSignal>>, Status> {
    let scope = auth_user.scope();
    let filter = TimeSignalFilter { id, identifier, point, value };
    db.run(move |conn| list_time_signals(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing time signals: {:?}", e);
            Status::InternalServerError
        })
}

#[get("/1/TimeSignals/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<TimeSignal>, Status> {
    let (time_signal, owner) = db
        .run(move |conn| {
            let time_signal = get_time_signal_by_id(conn, id)?;
            let owner = company_of_time_signal(conn, id)?;
            Ok::<_, diesel::result::Error>((time_signal, owner))
        })
        .await
        .map_err(|e| {
            error!("Database error retrieving time signal: {:?}", e);
            Status::InternalServerError
        })?;

    let time_signal = time_signal.ok_or(Status::NotFound)?;
    if !auth_user.is_privileged() && owner != Some(auth_user.user.company_id) {
        return Err(Status::NotFound);
    }
    Ok(Json(time_signal))
}

#[post("/1/TimeSignals", data = "<new_time_signal>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_time_signal: Json<NewTimeSignal>,
) -> Result<status::Created<Json<TimeSignal>>, ApiError> {
    let point_id = new_time_signal.point_id;
    let owner = db
        .run(move |conn| company_of_point(conn, point_id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::UnprocessableEntity, "Point does not exist"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to record signals for this point",
        ));
    }
    db.run(move |conn| insert_time_signal(conn, new_time_signal.into_inner()))
        .await
        .map(|time_signal| status::Created::new("/").body(Json(time_signal)))
        .map_err(db_error)
}

#[put("/1/TimeSignals/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<UpdateTimeSignalRequest>,
) -> Result<Json<TimeSignal>, ApiError> {
    let owner = db
        .run(move |conn| company_of_time_signal(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Time signal not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to update this time signal",
        ));
    }
    let UpdateTimeSignalRequest { identifier, value } = input.into_inner();
    db.run(move |conn| update_time_signal(conn, id, identifier, value))
        .await
        .map(Json)
        .map_err(db_error)
}

#[delete("/1/TimeSignals/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    let owner = db
        .run(move |conn| company_of_time_signal(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Time signal not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to delete this time signal",
        ));
    }
    db.run(move |conn| delete_time_signal(conn, id)).await.map_err(db_error)?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
