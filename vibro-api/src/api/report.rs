//! Machine report endpoint: renders the vibration-analysis PDF.

use std::path::PathBuf;

use chrono::Utc;
use rocket::Route;
use rocket::http::{ContentType, Status};
use vibro_report::report::ReportBuilder;
use vibro_report::style::ReportStyle;

use crate::orm::DbConn;
use crate::orm::machine::get_machine_by_id;
use crate::orm::report_data::report_data_for_machine;
use crate::session_guards::AuthenticatedUser;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Machine report endpoint.
///
/// - **URL:** `/api/1/Machines/<id>/report`
/// - **Method:** `GET`
/// - **Purpose:** Builds the full PDF report for one machine (trend
///   charts, summary tables, analysis text) and returns it as
///   `application/pdf`.
///
/// Authorized like any machine read. Chart or layout failures are
/// logged and surface as 500.
#[get("/1/Machines/<id>/report")]
pub async fn machine_report(
    db: DbConn,
    auth_user: AuthenticatedUser,
    id: i32,
) -> Result<(ContentType, Vec<u8>), Status> {
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

    let report_date = Utc::now().format("%d/%m/%Y").to_string();
    let data = db
        .run(move |conn| report_data_for_machine(conn, &machine, &report_date))
        .await
        .map_err(|e| {
            error!("Database error collecting report data: {:?}", e);
            Status::InternalServerError
        })?;

    let mut style = ReportStyle::default();
    style.logo_path = std::env::var("REPORT_LOGO").ok();
    let fonts_dir = PathBuf::from(env_or("REPORT_FONTS_DIR", "assets/fonts"));
    let family = env_or("REPORT_FONT_FAMILY", "LiberationSans");

    let builder = ReportBuilder::new(style, data);
    let pdf = builder.render_pdf(&fonts_dir, &family).map_err(|e| {
        error!("Report rendering failed: {}", e);
        Status::InternalServerError
    })?;

    Ok((ContentType::PDF, pdf))
}

pub fn routes() -> Vec<Route> {
    routes![machine_report]
}
