//! API endpoints for machine management.
//!
//! Machines belong to companies; non-privileged callers only observe
//! and modify machines of their own company.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, can_write, db_error, error_status};
use crate::models::{Machine, MachineInput, NewMachine};
use crate::orm::DbConn;
use crate::orm::machine::{
    MachineFilter, delete_machine, get_machine_by_id, insert_machine, list_machines,
    update_machine,
};
use crate::session_guards::AuthenticatedUser;

/// List Machines endpoint.
///
/// - **URL:** `/api/1/Machines`
/// - **Method:** `GET`
/// - **Query params:** `id`, `identifier`, `name`, `machine_type`,
///   `company`: each an exact match, combined with AND.
#[get("/1/Machines?<id>&<identifier>&<name>&<machine_type>&<company>")]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: Option<i32>,
    identifier: Option<String>,
    name: Option<String>,
    machine_type: Option<String>,
    company: Option<i32>,
) -> Result<Json<Vec<Machine>>, Status> {
    let scope = auth_user.scope();
    let filter = MachineFilter { id, identifier, name, machine_type, company };
    db.run(move |conn| list_machines(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing machines: {:?}", e);
            Status::InternalServerError
        })
}

/// Retrieve one machine. Cross-tenant ids look like misses.
#[get("/1/Machines/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<Machine>, Status> {
    let machine = db
        .run(move |conn| get_machine_by_id(conn, id))
        .await
        .map_err(|e| {
            error!("Database error retrieving machine: {:?}", e);
            Status::InternalServerError
        })?
        .ok_or(Status::NotFound)?;

    if !auth_user.is_privileged() && machine.company_id != auth_user.user.company_id {
        return Err(Status::NotFound);
    }
    Ok(Json(machine))
}

#[post("/1/Machines", data = "<new_machine>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_machine: Json<NewMachine>,
) -> Result<status::Created<Json<Machine>>, ApiError> {
    if !can_write(&auth_user, new_machine.company_id) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to create machines for this company",
        ));
    }
    db.run(move |conn| insert_machine(conn, new_machine.into_inner()))
        .await
        .map(|machine| status::Created::new("/").body(Json(machine)))
        .map_err(db_error)
}

#[put("/1/Machines/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<MachineInput>,
) -> Result<Json<Machine>, ApiError> {
    let current = db
        .run(move |conn| get_machine_by_id(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Machine not found"))?;

    let target_company = input.company_id.unwrap_or(current.company_id);
    if !can_write(&auth_user, current.company_id) || !can_write(&auth_user, target_company) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to update this machine",
        ));
    }
    db.run(move |conn| update_machine(conn, id, &input))
        .await
        .map(Json)
        .map_err(db_error)
}

#[delete("/1/Machines/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    let machine = db
        .run(move |conn| get_machine_by_id(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Machine not found"))?;

    if !can_write(&auth_user, machine.company_id) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to delete this machine",
        ));
    }
    db.run(move |conn| delete_machine(conn, id)).await.map_err(db_error)?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
