//! API endpoints for thermographic images.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, can_write, db_error, error_status};
use crate::models::{NewTermoImage, TermoImage};
use crate::orm::DbConn;
use crate::orm::scope::company_of_measurement;
use crate::orm::termo_image::{
    TermoImageFilter, company_of_termo_image, delete_termo_image, get_termo_image_by_id,
    insert_termo_image, list_termo_images, update_termo_image,
};
use crate::session_guards::AuthenticatedUser;

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTermoImageRequest {
    pub image_type: Option<String>,
    pub file_path: Option<String>,
}

#[get("/1/TermoImages?<id>&<image_type>&<measurement>")]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: Option<i32>,
    image_type: Option<String>,
    measurement: Option<i32>,
) -> Result<Json<Vec<TermoImage>>, Status> {
    let scope = auth_user.scope();
    let filter = TermoImageFilter { id, image_type, measurement };
    db.run(move |conn| list_termo_images(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing termo images: {:?}", e);
            Status::InternalServerError
        })
}

#[get("/1/TermoImages/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<TermoImage>, Status> {
    let (termo_image, owner) = db
        .run(move |conn| {
            let termo_image = get_termo_image_by_id(conn, id)?;
            let owner = company_of_termo_image(conn, id)?;
            Ok::<_, diesel::result::Error>((termo_image, owner))
        })
        .await
        .map_err(|e| {
            error!("Database error retrieving termo image: {:?}", e);
            Status::InternalServerError
        })?;

    let termo_image = termo_image.ok_or(Status::NotFound)?;
    if !auth_user.is_privileged() && owner != Some(auth_user.user.company_id) {
        return Err(Status::NotFound);
    }
    Ok(Json(termo_image))
}

#[post("/1/TermoImages", data = "<new_termo_image>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_termo_image: Json<NewTermoImage>,
) -> Result<status::Created<Json<TermoImage>>, ApiError> {
    let measurement_id = new_termo_image.measurement_id;
    let owner = db
        .run(move |conn| company_of_measurement(conn, measurement_id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::UnprocessableEntity, "Measurement does not exist"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to attach images to this measurement",
        ));
    }
    db.run(move |conn| insert_termo_image(conn, new_termo_image.into_inner()))
        .await
        .map(|termo_image| status::Created::new("/").body(Json(termo_image)))
        .map_err(db_error)
}

#[put("/1/TermoImages/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<UpdateTermoImageRequest>,
) -> Result<Json<TermoImage>, ApiError> {
    let owner = db
        .run(move |conn| company_of_termo_image(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Termo image not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to update this image",
        ));
    }
    let UpdateTermoImageRequest { image_type, file_path } = input.into_inner();
    db.run(move |conn| update_termo_image(conn, id, image_type, file_path))
        .await
        .map(Json)
        .map_err(db_error)
}

#[delete("/1/TermoImages/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    let owner = db
        .run(move |conn| company_of_termo_image(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Termo image not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to delete this image",
        ));
    }
    db.run(move |conn| delete_termo_image(conn, id)).await.map_err(db_error)?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
