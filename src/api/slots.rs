use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::db::Database;
use crate::error::ApiError;
use crate::model::slot::{Slot, SlotId, SlotParams};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaySlots {
    #[schema(example = "2021-08-11", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekSlots {
    #[schema(example = "2021-08-09", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    /// Seven days, first day first.
    pub days: Vec<DaySlots>,
}

#[derive(Serialize, ToSchema)]
pub struct DeletedSlots {
    #[schema(value_type = Vec<String>)]
    pub deleted: Vec<SlotId>,
}

/* =========================
Create slot
========================= */
#[utoipa::path(
    post,
    path = "/api/orgs/{organization}/slots",
    params(("organization" = String, Path, description = "Organization id")),
    request_body(content = SlotParams, content_type = "application/json"),
    responses(
        (status = 201, description = "Slot created", body = Slot),
        (status = 400, description = "Invalid slot", body = Object, example = json!({
            "message": "slot must have at least one interval"
        }))
    ),
    tag = "Slots"
)]
pub async fn create_slot(
    path: web::Path<String>,
    params: web::Json<SlotParams>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let organization = path.into_inner();
    let slot = db.write(&organization, |org, ids| {
        org.create_slot(params.into_inner(), ids)
    })?;
    info!(organization = %organization, slot = %slot.id, date = %slot.date(), "Slot created");
    Ok(HttpResponse::Created().json(slot))
}

/// Edit a slot in place; the id is kept.
#[utoipa::path(
    put,
    path = "/api/orgs/{organization}/slots/{id}",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("id" = String, Path, description = "Slot id")
    ),
    request_body(content = SlotParams, content_type = "application/json"),
    responses(
        (status = 200, description = "Slot updated", body = Slot),
        (status = 400, description = "Invalid slot"),
        (status = 404, description = "Slot not found")
    ),
    tag = "Slots"
)]
pub async fn update_slot(
    path: web::Path<(String, SlotId)>,
    params: web::Json<SlotParams>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let (organization, id) = path.into_inner();
    let slot = db.write(&organization, |org, _| {
        org.update_slot(&id, params.into_inner())
    })?;
    info!(organization = %organization, slot = %slot.id, "Slot updated");
    Ok(HttpResponse::Ok().json(slot))
}

#[utoipa::path(
    delete,
    path = "/api/orgs/{organization}/slots/{id}",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("id" = String, Path, description = "Slot id")
    ),
    responses(
        (status = 200, description = "Deleted slot", body = Slot),
        (status = 404, description = "Slot not found")
    ),
    tag = "Slots"
)]
pub async fn delete_slot(
    path: web::Path<(String, SlotId)>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let (organization, id) = path.into_inner();
    let slot = db.write(&organization, |org, _| org.delete_slot(&id))?;
    info!(organization = %organization, slot = %slot.id, "Slot deleted");
    Ok(HttpResponse::Ok().json(slot))
}

#[utoipa::path(
    get,
    path = "/api/orgs/{organization}/slots/day/{date}",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("date" = String, Path, description = "Day, yyyy-mm-dd")
    ),
    responses((status = 200, description = "Slots of the day", body = DaySlots)),
    tag = "Slots"
)]
pub async fn day_slots(
    path: web::Path<(String, NaiveDate)>,
    db: web::Data<Database>,
) -> HttpResponse {
    let (organization, date) = path.into_inner();
    let slots = db.read(&organization, |org| org.slots_for_day(date));
    HttpResponse::Ok().json(DaySlots { date, slots })
}

#[utoipa::path(
    get,
    path = "/api/orgs/{organization}/slots/week/{start}",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("start" = String, Path, description = "First day of the week, yyyy-mm-dd")
    ),
    responses((status = 200, description = "Slots of the week", body = WeekSlots)),
    tag = "Slots"
)]
pub async fn week_slots(
    path: web::Path<(String, NaiveDate)>,
    db: web::Data<Database>,
) -> HttpResponse {
    let (organization, start_date) = path.into_inner();
    let week = db.read(&organization, |org| org.slots_for_week(start_date));
    let days = week
        .into_iter()
        .map(|(offset, slots)| DaySlots {
            date: offset.date_from(start_date),
            slots,
        })
        .collect();
    HttpResponse::Ok().json(WeekSlots { start_date, days })
}

#[utoipa::path(
    delete,
    path = "/api/orgs/{organization}/slots/day/{date}",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("date" = String, Path, description = "Day, yyyy-mm-dd")
    ),
    responses((status = 200, description = "Ids of deleted slots", body = DeletedSlots)),
    tag = "Slots"
)]
pub async fn delete_day(
    path: web::Path<(String, NaiveDate)>,
    db: web::Data<Database>,
) -> HttpResponse {
    let (organization, date) = path.into_inner();
    let deleted = db.write(&organization, |org, _| org.delete_slots_for_day(date));
    info!(organization = %organization, %date, count = deleted.len(), "Day cleared");
    HttpResponse::Ok().json(DeletedSlots { deleted })
}

#[utoipa::path(
    delete,
    path = "/api/orgs/{organization}/slots/week/{start}",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("start" = String, Path, description = "First day of the week, yyyy-mm-dd")
    ),
    responses((status = 200, description = "Ids of deleted slots", body = DeletedSlots)),
    tag = "Slots"
)]
pub async fn delete_week(
    path: web::Path<(String, NaiveDate)>,
    db: web::Data<Database>,
) -> HttpResponse {
    let (organization, start) = path.into_inner();
    let deleted = db.write(&organization, |org, _| org.delete_slots_for_week(start));
    info!(organization = %organization, %start, count = deleted.len(), "Week cleared");
    HttpResponse::Ok().json(DeletedSlots { deleted })
}
