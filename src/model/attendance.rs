use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::interval::Interval;

#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, example = "customer-42")]
pub struct CustomerId(String);

impl From<&str> for CustomerId {
    fn from(id: &str) -> Self {
        CustomerId(id.to_string())
    }
}

/// A customer's booking on one slot and what they actually attended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub booked_interval: Interval,
    /// `None` until an admin records attendance.
    pub attended_interval: Option<Interval>,
}

impl AttendanceRecord {
    pub fn booked(interval: Interval) -> Self {
        Self {
            booked_interval: interval,
            attended_interval: None,
        }
    }
}
