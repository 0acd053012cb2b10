//! API endpoints for spectrum records.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, can_write, db_error, error_status};
use crate::models::{Espectra, NewEspectra};
use crate::orm::DbConn;
use crate::orm::espectra::{
    EspectraFilter, company_of_espectra, delete_espectra, get_espectra_by_id, insert_espectra,
    list_espectras, update_espectra,
};
use crate::orm::scope::company_of_point;
use crate::session_guards::AuthenticatedUser;

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateEspectraRequest {
    pub identifier: Option<String>,
    pub value: Option<f64>,
}

#[get("/1/Espectras?<id>&<identifier>&<point>&<value>")]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: Option<i32>,
    identifier: Option<String>,
    point: Option<i32>,
    value: Option<f64>,
) -> Result<Json<Vec<Espectra>>, Status> {
    let scope = auth_user.scope();
    let filter = EspectraFilter { id, identifier, point, value };
    db.run(move |conn| list_espectras(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing espectras: {:?}", e);
            Status::InternalServerError
        })
}

#[get("/1/Espectras/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<Espectra>, Status> {
    let (espectra, owner) = db
        .run(move |conn| {
            let espectra = get_espectra_by_id(conn, id)?;
            let owner = company_of_espectra(conn, id)?;
            Ok::<_, diesel::result::Error>((espectra, owner))
        })
        .await
        .map_err(|e| {
            error!("Database error retrieving espectra: {:?}", e);
            Status::InternalServerError
        })?;

    let espectra = espectra.ok_or(Status::NotFound)?;
    if !auth_user.is_privileged() && owner != Some(auth_user.user.company_id) {
        return Err(Status::NotFound);
    }
    Ok(Json(espectra))
}

#[post("/1/Espectras", data = "<new_espectra>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_espectra: Json<NewEspectra>,
) -> Result<status::Created<Json<Espectra>>, ApiError> {
    let point_id = new_espectra.point_id;
    let owner = db
        .run(move |conn| company_of_point(conn, point_id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::UnprocessableEntity, "Point does not exist"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to record spectra for this point",
        ));
    }
    db.run(move |conn| insert_espectra(conn, new_espectra.into_inner()))
        .await
        .map(|espectra| status::Created::new("/").body(Json(espectra)))
        .map_err(db_error)
}

#[put("/1/Espectras/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<UpdateEspectraRequest>,
) -> Result<Json<Espectra>, ApiError> {
    let owner = db
        .run(move |conn| company_of_espectra(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Espectra not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to update this espectra",
        ));
    }
    let UpdateEspectraRequest { identifier, value } = input.into_inner();
    db.run(move |conn| update_espectra(conn, id, identifier, value))
        .await
        .map(Json)
        .map_err(db_error)
}

#[delete("/1/Espectras/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    let owner = db
        .run(move |conn| company_of_espectra(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Espectra not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to delete this espectra",
        ));
    }
    db.run(move |conn| delete_espectra(conn, id)).await.map_err(db_error)?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
