use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::config::Config;
use crate::db::Database;
use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, CustomerId};
use crate::model::interval::Interval;
use crate::model::slot::SlotId;
use crate::variance::{Variance, record_variance, variance_from_keys};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[schema(value_type = String, example = "customer-42")]
    pub customer_id: CustomerId,
    /// Interval key the customer books, must be offered by the slot.
    #[schema(example = "09:00-10:00")]
    pub interval: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    /// Interval actually attended; `null` resets to pending.
    #[schema(example = "09:00-10:30", nullable = true)]
    pub attended_interval: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VarianceRequest {
    #[schema(example = "09:00-10:00")]
    pub booked_interval: String,
    #[schema(example = "09:00-10:30", nullable = true)]
    pub attended_interval: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    #[schema(value_type = String, example = "customer-42")]
    pub customer_id: CustomerId,
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub variance: Variance,
}

fn respond(config: &Config, customer_id: CustomerId, record: AttendanceRecord) -> AttendanceResponse {
    AttendanceResponse {
        customer_id,
        variance: record_variance(&record, &config.variance_thresholds()),
        record,
    }
}

/* =========================
Book a slot
========================= */
#[utoipa::path(
    post,
    path = "/api/orgs/{organization}/slots/{id}/bookings",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("id" = String, Path, description = "Slot id")
    ),
    request_body(content = BookingRequest, content_type = "application/json"),
    responses(
        (status = 201, description = "Booking stored", body = AttendanceResponse),
        (status = 400, description = "Malformed or unavailable interval", body = Object, example = json!({
            "message": "invalid interval: '9:00' is not a HH:MM time"
        })),
        (status = 404, description = "Slot not found")
    ),
    tag = "Attendance"
)]
pub async fn book(
    path: web::Path<(String, SlotId)>,
    body: web::Json<BookingRequest>,
    db: web::Data<Database>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let (organization, slot_id) = path.into_inner();
    let BookingRequest {
        customer_id,
        interval,
    } = body.into_inner();
    let record = db.write(&organization, |org, _| {
        org.book(&slot_id, customer_id.clone(), &interval)
    })?;
    info!(organization = %organization, slot = %slot_id, customer = %customer_id, "Slot booked");
    Ok(HttpResponse::Created().json(respond(&config, customer_id, record)))
}

#[utoipa::path(
    delete,
    path = "/api/orgs/{organization}/slots/{id}/bookings/{customer}",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("id" = String, Path, description = "Slot id"),
        ("customer" = String, Path, description = "Customer id")
    ),
    responses(
        (status = 204, description = "Booking cancelled"),
        (status = 404, description = "Slot or booking not found")
    ),
    tag = "Attendance"
)]
pub async fn cancel_booking(
    path: web::Path<(String, SlotId, CustomerId)>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let (organization, slot_id, customer_id) = path.into_inner();
    db.write(&organization, |org, _| org.cancel_booking(&slot_id, &customer_id))?;
    info!(organization = %organization, slot = %slot_id, customer = %customer_id, "Booking cancelled");
    Ok(HttpResponse::NoContent().finish())
}

/// Record the interval a booked customer actually attended.
#[utoipa::path(
    put,
    path = "/api/orgs/{organization}/slots/{id}/attendance/{customer}",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("id" = String, Path, description = "Slot id"),
        ("customer" = String, Path, description = "Customer id")
    ),
    request_body(content = AttendanceRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Attendance recorded", body = AttendanceResponse),
        (status = 400, description = "Malformed interval"),
        (status = 404, description = "Slot or booking not found")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    path: web::Path<(String, SlotId, CustomerId)>,
    body: web::Json<AttendanceRequest>,
    db: web::Data<Database>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let (organization, slot_id, customer_id) = path.into_inner();
    let attended = body
        .into_inner()
        .attended_interval
        .as_deref()
        .map(str::parse::<Interval>)
        .transpose()?;
    let record = db.write(&organization, |org, _| {
        org.mark_attendance(&slot_id, &customer_id, attended)
    })?;
    info!(
        organization = %organization,
        slot = %slot_id,
        customer = %customer_id,
        attended = ?attended.map(|interval| interval.key()),
        "Attendance marked"
    );
    Ok(HttpResponse::Ok().json(respond(&config, customer_id, record)))
}

#[utoipa::path(
    get,
    path = "/api/orgs/{organization}/slots/{id}/attendance",
    params(
        ("organization" = String, Path, description = "Organization id"),
        ("id" = String, Path, description = "Slot id")
    ),
    responses(
        (status = 200, description = "Bookings of the slot with their variance", body = Vec<AttendanceResponse>),
        (status = 404, description = "Slot not found")
    ),
    tag = "Attendance"
)]
pub async fn slot_attendance(
    path: web::Path<(String, SlotId)>,
    db: web::Data<Database>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let (organization, slot_id) = path.into_inner();
    let records = db.read(&organization, |org| org.attendance_for_slot(&slot_id))?;
    let body: Vec<AttendanceResponse> = records
        .into_iter()
        .map(|(customer_id, record)| respond(&config, customer_id, record))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Variance between two raw interval keys, without touching any slot.
#[utoipa::path(
    post,
    path = "/api/attendance/variance",
    request_body(content = VarianceRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Computed variance", body = Variance, example = json!({
            "deltaMinutes": 30,
            "deltaHours": 0.5,
            "tier": "minor-over"
        })),
        (status = 400, description = "Malformed interval", body = Object, example = json!({
            "message": "invalid interval: '10:3' is not a HH:MM time"
        }))
    ),
    tag = "Attendance"
)]
pub async fn compute_variance(
    body: web::Json<VarianceRequest>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let variance = variance_from_keys(
        &body.booked_interval,
        body.attended_interval.as_deref(),
        &config.variance_thresholds(),
    )?;
    Ok(HttpResponse::Ok().json(variance))
}
