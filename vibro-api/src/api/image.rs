//! API endpoints for machine images (diagrams and photographs).

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, can_write, db_error, error_status};
use crate::models::{Image, NewImage};
use crate::orm::DbConn;
use crate::orm::image::{
    ImageFilter, company_of_image, delete_image, get_image_by_id, insert_image, list_images,
    update_image,
};
use crate::orm::scope::company_of_machine;
use crate::session_guards::AuthenticatedUser;

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateImageRequest {
    pub title: Option<String>,
    pub file_path: Option<String>,
}

#[get("/1/Images?<id>&<machine>")]
pub async fn list(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: Option<i32>,
    machine: Option<i32>,
) -> Result<Json<Vec<Image>>, Status> {
    let scope = auth_user.scope();
    let filter = ImageFilter { id, machine };
    db.run(move |conn| list_images(conn, scope, &filter))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Database error listing images: {:?}", e);
            Status::InternalServerError
        })
}

#[get("/1/Images/<id>")]
pub async fn retrieve(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Json<Image>, Status> {
    let (image, owner) = db
        .run(move |conn| {
            let image = get_image_by_id(conn, id)?;
            let owner = company_of_image(conn, id)?;
            Ok::<_, diesel::result::Error>((image, owner))
        })
        .await
        .map_err(|e| {
            error!("Database error retrieving image: {:?}", e);
            Status::InternalServerError
        })?;

    let image = image.ok_or(Status::NotFound)?;
    if !auth_user.is_privileged() && owner != Some(auth_user.user.company_id) {
        return Err(Status::NotFound);
    }
    Ok(Json(image))
}

#[post("/1/Images", data = "<new_image>")]
pub async fn create(
    db: DbConn,
    auth_user: AuthenticatedUser,
    new_image: Json<NewImage>,
) -> Result<status::Created<Json<Image>>, ApiError> {
    let machine_id = new_image.machine_id;
    let owner = db
        .run(move |conn| company_of_machine(conn, machine_id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::UnprocessableEntity, "Machine does not exist"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to attach images to this machine",
        ));
    }
    db.run(move |conn| insert_image(conn, new_image.into_inner()))
        .await
        .map(|image| status::Created::new("/").body(Json(image)))
        .map_err(db_error)
}

#[put("/1/Images/<id>", data = "<input>")]
pub async fn update(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
    input: Json<UpdateImageRequest>,
) -> Result<Json<Image>, ApiError> {
    let owner = db
        .run(move |conn| company_of_image(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Image not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to update this image",
        ));
    }
    let UpdateImageRequest { title, file_path } = input.into_inner();
    db.run(move |conn| update_image(conn, id, title, file_path))
        .await
        .map(Json)
        .map_err(db_error)
}

#[delete("/1/Images/<id>")]
pub async fn remove(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<Status, ApiError> {
    let owner = db
        .run(move |conn| company_of_image(conn, id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_status(Status::NotFound, "Image not found"))?;

    if !can_write(&auth_user, owner) {
        return Err(error_status(
            Status::Forbidden,
            "Insufficient permissions to delete this image",
        ));
    }
    db.run(move |conn| delete_image(conn, id)).await.map_err(db_error)?;
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![list, retrieve, create, update, remove]
}
