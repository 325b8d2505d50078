use crate::api::attendance::{
    AttendanceRequest, AttendanceResponse, BookingRequest, VarianceRequest,
};
use crate::api::clipboard::{CopyResponse, PasteResponse};
use crate::api::slots::{DaySlots, DeletedSlots, WeekSlots};
use crate::model::attendance::AttendanceRecord;
use crate::model::interval::Interval;
use crate::model::slot::{Category, Slot, SlotParams, SlotType};
use crate::variance::{Variance, VarianceTier};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Eisbuk API",
        version = "1.0.0",
        description = r#"
## Eisbuk: ice-skating club bookings

Slot scheduling, copy/paste of whole days and weeks, and attendance tracking
for an ice-skating club. Every document lives under an **organization**.

### Key Features
- **Slots**
  - Create, edit and delete bookable slots, list them by day or week
- **Clipboard**
  - Copy a day or a week of slots and paste it onto other dates with fresh ids
- **Attendance**
  - Book customers onto slot intervals, record what they attended, and read
    the variance badge (`exact`, `minor-over`, `major-under`, ...)

### Response Format
- JSON, camelCase fields, kebab-case enum values
- Errors are `{ "message": "..." }`
"#,
    ),
    paths(
        crate::api::slots::create_slot,
        crate::api::slots::update_slot,
        crate::api::slots::delete_slot,
        crate::api::slots::day_slots,
        crate::api::slots::week_slots,
        crate::api::slots::delete_day,
        crate::api::slots::delete_week,

        crate::api::clipboard::show_clipboard,
        crate::api::clipboard::clear_clipboard,
        crate::api::clipboard::copy_day,
        crate::api::clipboard::copy_week,
        crate::api::clipboard::paste_day,
        crate::api::clipboard::paste_week,

        crate::api::attendance::book,
        crate::api::attendance::cancel_booking,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::slot_attendance,
        crate::api::attendance::compute_variance
    ),
    components(
        schemas(
            Interval,
            SlotType,
            Category,
            SlotParams,
            Slot,
            DaySlots,
            WeekSlots,
            DeletedSlots,
            CopyResponse,
            PasteResponse,
            AttendanceRecord,
            BookingRequest,
            AttendanceRequest,
            AttendanceResponse,
            VarianceRequest,
            Variance,
            VarianceTier
        )
    ),
    tags(
        (name = "Slots", description = "Slot management APIs"),
        (name = "Clipboard", description = "Copy/paste of days and weeks"),
        (name = "Attendance", description = "Bookings and attendance variance"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/orgs/{organization}/clipboard/week/{start}/paste"));
        assert!(paths.contains_key("/api/attendance/variance"));
        assert_eq!(paths.len(), 14);
    }
}
