//! API endpoints for vibration measurements.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, can_write, db_error, error_status};
use crate::models::{Measurement, MeasurementInput, NewMeasurement};
use crate::orm::DbConn;
use crate::orm::measurement::{
    MeasurementFilter, delete_measurement, get_measurement_by_id, insert_measurement,
    list_measurements, update_measurement,
};
use crate::orm::scope::{company_of_machine, company_of_measurement};
use crate::session_guards::AuthenticatedUser;

/// List Measurements endpoint.
///
/// - **URL:** `/api/1/Measurements`
/// - **Method:** `GET`
/// - **Query params:** `id`, `severity`, `date` (`YYYY-MM-DD`),
///   `analysis`, `recommendation`, `revised`, `resolved`,
///   `measurement_type`, `machine`, `engineer_one`, `engineer_two`.
///   A malformed `date` matches nothing.
#[get("/1/Measurements?<id>&<severity>&<date>&<analysis>&<recommendation>&<revised>&<resolved>&<measurement_type>&<machine>&<engineer_one>&<engineer_two>")]
#[allow(clippy::too_many_arguments)]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: Option<i32>,
    severity: Option<String>,
    date: Option<String>,
    analysis: Option<String>,
    recommendation: Option<String>,
    revised: Option<bool>,
    resolved: Option<bool>,
    measurement_type: Option<String>,
    machine: Option<i32>,
    engineer_one: Option<i32>,
    engineer_two: Option<i32>,
) -> Result<Json<Vec<Measurement>>, Status> {
    let scope = auth_user.scope();
    let filter = MeasurementFilter {
        id,
        severity,
        date,
        analysis,
        recommendation,
        revised,
        resolved,
        measurement_type,
        machine,
        engineer_one,
        engineer_two,
    };
    db.run(move |conn| list_measurements(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing measurements: {:?}", e);
            Status::InternalServerError
        })
}

#[get("/1/Measurements/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<Measurement>, Status> {
    let (measurement, owner) = db
        .run(move |conn| {
            let measurement = get_measurement_by_id(conn, id)?;
            let owner = company_of_measurement(conn, id)?;
            Ok::<_, diesel::result::Error>((measurement, owner))
        })
        .await
        .map_err(|e| {
            error!("Database error retrieving measurement: {:?}", e);
            Status::InternalServerError
        })?;

    let measurement = measurement.ok_or(Status::NotFound)?;
    if !auth_user.is_privileged() && owner != Some(auth_user.user.company_id) {
        return Err(Status::NotFound);
    }
    Ok(Json(measurement))
}

#[post("/1/Measurements", data = "<new_measurement>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_measurement: Json<NewMeasurement>,
) -> Result<status::Created<Json<Measurement>>, ApiError> {
    let machine_id = new_measurement.machine_id;
    let owner = db
        .run(move |conn| company_of_machine(conn, machine_id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::UnprocessableEntity, "Machine does not exist"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to record measurements for this machine",
        ));
    }
    db.run(move |conn| insert_measurement(conn, new_measurement.into_inner()))
        .await
        .map(|measurement| status::Created::new("/").body(Json(measurement)))
        .map_err(db_error)
}

#[put("/1/Measurements/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<MeasurementInput>,
) -> Result<Json<Measurement>, ApiError> {
    let owner = db
        .run(move |conn| company_of_measurement(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Measurement not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to update this measurement",
        ));
    }

    // Moving a measurement to another machine has to respect that
    // machine's tenant too.
    if let Some(new_machine) = input.machine_id {
        let new_owner = db
            .run(move |conn| company_of_machine(conn, new_machine))
            .await
            .map_err(db_error)?
            .ok_or_else(|| error_status(Status::UnprocessableEntity, "Machine does not exist"))?;
        if !can_write(&auth_user, new_owner) {
            return Err(error_status(
                Status::Forbidden,
                "Insufficient permissions to move this measurement",
            ));
        }
    }

    db.run(move |conn| update_measurement(conn, id, &input))
        .await
        .map(Json)
        .map_err(db_error)
}

#[delete("/1/Measurements/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    let owner = db
        .run(move |conn| company_of_measurement(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Measurement not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to delete this measurement",
        ));
    }
    db.run(move |conn| delete_measurement(conn, id)).await.map_err(db_error)?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
