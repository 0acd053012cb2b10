//! API endpoints for companies.
//!
//! Non-privileged callers see exactly their own company and may update
//! it; creating and deleting companies is staff work.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, can_write, db_error, error_status};
use crate::models::{Company, CompanyInput, NewCompany};
use crate::orm::DbConn;
use crate::orm::company::{
    CompanyFilter, delete_company, get_company_by_id, insert_company, list_companies,
    update_company,
};
use crate::session_guards::AuthenticatedUser;

#[get("/1/Companies?<name>&<nit>&<address>&<rut_address>&<pbx>&<city>&<rut_city>")]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    name: Option<String>,
    nit: Option<String>,
    address: Option<String>,
    rut_address: Option<String>,
    pbx: Option<String>,
    city: Option<i32>,
    rut_city: Option<i32>,
) -> Result<Json<Vec<Company>>, Status> {
    let scope = auth_user.scope();
    let filter = CompanyFilter { name, nit, address, rut_address, pbx, city, rut_city };
    db.run(move |conn| list_companies(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing companies: {:?}", e);
            Status::InternalServerError
        })
}

#[get("/1/Companies/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<Company>, Status> {
    if !auth_user.is_privileged() && auth_user.user.company_id != id {
        return Err(Status::NotFound);
    }
    db.run(move |conn| get_company_by_id(conn, id))
        .await
        .map_err(|e| {
            error!("Database error retrieving company: {:?}", e);
            Status::InternalServerError
        })?
        .map(Json)
        .ok_or(Status::NotFound)
}

#[post("/1/Companies", data = "<new_company>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_company: Json<NewCompany>,
) -> Result<status::Created<Json<Company>>, ApiError> {
    if !auth_user.is_privileged() {
        return Err(error_status(Status::Forbidden, "Only staff may create companies"));
    }
    db.run(move |conn| insert_company(conn, new_company.into_inner()))
        .await
        .map(|company| status::Created::new("/").body(Json(company)))
        .map_err(db_error)
}

#[put("/1/Companies/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<CompanyInput>,
) -> Result<Json<Company>, ApiError> {
    // Ownership first: a foreign company id must look like a miss, the
    // same as on retrieve.
    if !can_write(&auth_user, id) {
        return Err(error_status(Status::NotFound, "Company not found"));
    }
    db.run(move |conn| get_company_by_id(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Company not found"))?;

    db.run(move |conn| update_company(conn, id, &input))
        .await
        .map(Json)
        .map_err(db_error)
}

#[delete("/1/Companies/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    if !auth_user.is_privileged() {
        return Err(error_status(Status::Forbidden, "Only staff may delete companies"));
    }
    let deleted = db.run(move |conn| delete_company(conn, id)).await.map_err(db_error)?;
    if deleted == 0 {
        return Err(error_status(Status::NotFound, "Company not found"));
    }
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
