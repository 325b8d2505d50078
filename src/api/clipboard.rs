use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::db::Database;
use crate::model::slot::Slot;

#[derive(Serialize, ToSchema)]
pub struct CopyResponse {
    /// Number of slots now held by the clipboard.
    #[schema(example = 3)]
    pub copied: usize,
}

#[derive(Serialize, ToSchema)]
pub struct PasteResponse {
    /// Newly created slots; empty when nothing of the right shape was copied.
    pub pasted: Vec<Slot>,
}

#[utoipa::path(
    get,
    path = "/api/orgs/{organization}/clipboard",
    params(("organization" = String, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Current clipboard entry, null when empty", body = Object, example = json!({
            "kind": "day",
            "date": "2021-08-11",
            "slots": {}
        }))
    ),
    tag = "Clipboard"
)]
pub async fn show_clipboard(path: web::Path<String>, db: web::Data<Database>) -> HttpResponse {
    let organization = path.into_inner();
    db.read(&organization, |org| {
        HttpResponse::Ok().json(org.clipboard().entry())
    })
}

#[utoipa::path(
    delete,
    path = "/api/orgs/{organization}/clipboard",
    params(("organization" = String, Path, description = "Organization id")),
    responses((status = 204, description = "Clipboard cleared")),
    tag = "Clipboard"
)]
pub async fn clear_clipboard(path: web::Path<String>, db: web::Data<Database>) -> HttpResponse {
    let organization = path.into_inner();
    db.write(&organization, |org, _| org.clear_clipboard());
    info!(organization = %organization, "Clipboard cleared");
    HttpResponse::NoContent().finish()
}

/// Copy a stored day; replaces any copied week.
#[utoipa::path(
    post,
    path = "/api/orgs/{organization}/clipboard/day/{date}",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("date" = String, Path, description = "Day to copy, yyyy-mm-dd")
    ),
    responses((status = 200, description = "Day copied", body = CopyResponse)),
    tag = "Clipboard"
)]
pub async fn copy_day(
    path: web::Path<(String, NaiveDate)>,
    db: web::Data<Database>,
) -> HttpResponse {
    let (organization, date) = path.into_inner();
    let copied = db.write(&organization, |org, _| org.copy_day(date));
    info!(organization = %organization, %date, copied, "Day copied");
    HttpResponse::Ok().json(CopyResponse { copied })
}

/// Copy the seven days starting at `start`; replaces any copied day.
#[utoipa::path(
    post,
    path = "/api/orgs/{organization}/clipboard/week/{start}",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("start" = String, Path, description = "First day of the week, yyyy-mm-dd")
    ),
    responses((status = 200, description = "Week copied", body = CopyResponse)),
    tag = "Clipboard"
)]
pub async fn copy_week(
    path: web::Path<(String, NaiveDate)>,
    db: web::Data<Database>,
) -> HttpResponse {
    let (organization, start) = path.into_inner();
    let copied = db.write(&organization, |org, _| org.copy_week(start));
    info!(organization = %organization, %start, copied, "Week copied");
    HttpResponse::Ok().json(CopyResponse { copied })
}

#[utoipa::path(
    post,
    path = "/api/orgs/{organization}/clipboard/day/{date}/paste",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("date" = String, Path, description = "Target day, yyyy-mm-dd")
    ),
    responses((status = 200, description = "Slots created on the target day", body = PasteResponse)),
    tag = "Clipboard"
)]
pub async fn paste_day(
    path: web::Path<(String, NaiveDate)>,
    db: web::Data<Database>,
) -> HttpResponse {
    let (organization, target) = path.into_inner();
    let pasted = db.write(&organization, |org, ids| org.paste_day(target, ids));
    info!(organization = %organization, %target, pasted = pasted.len(), "Day pasted");
    HttpResponse::Ok().json(PasteResponse { pasted })
}

#[utoipa::path(
    post,
    path = "/api/orgs/{organization}/clipboard/week/{start}/paste",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("start" = String, Path, description = "First day of the target week, yyyy-mm-dd")
    ),
    responses((status = 200, description = "Slots created in the target week", body = PasteResponse)),
    tag = "Clipboard"
)]
pub async fn paste_week(
    path: web::Path<(String, NaiveDate)>,
    db: web::Data<Database>,
) -> HttpResponse {
    let (organization, start) = path.into_inner();
    let pasted = db.write(&organization, |org, ids| org.paste_week(start, ids));
    info!(organization = %organization, %start, pasted = pasted.len(), "Week pasted");
    HttpResponse::Ok().json(PasteResponse { pasted })
}
