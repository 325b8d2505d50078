use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::interval::Interval;

#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, example = "5d1c0a52-6c9f-4b0e-9f0e-2f1b0a8f3c11")]
pub struct SlotId(String);

impl From<&str> for SlotId {
    fn from(id: &str) -> Self {
        SlotId(id.to_string())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, strum_macros::Display, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SlotType {
    Ice,
    OffIceDancing,
    OffIceGym,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
    ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Category {
    Course,
    PreCompetitive,
    Competitive,
    Adults,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SlotError {
    #[display(fmt = "slot must have at least one interval")]
    NoIntervals,
    #[display(fmt = "interval key '{}' does not match interval {}", key, interval)]
    KeyMismatch { key: String, interval: Interval },
}

/// Everything a slot carries except its identity.
///
/// Used as the create/edit payload; a [`Slot`] is these params plus the id
/// assigned when it is filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotParams {
    #[schema(example = "2021-08-11", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub slot_type: SlotType,
    #[serde(default)]
    pub categories: BTreeSet<Category>,
    /// Intervals keyed by their `"HH:MM-HH:MM"` form.
    #[schema(value_type = Object, example = json!({
        "09:00-10:00": { "startTime": "09:00", "endTime": "10:00" }
    }))]
    pub intervals: BTreeMap<String, Interval>,
    #[serde(default)]
    pub notes: String,
}

impl SlotParams {
    pub fn validate(&self) -> Result<(), SlotError> {
        if self.intervals.is_empty() {
            return Err(SlotError::NoIntervals);
        }
        for (key, interval) in &self.intervals {
            if *key != interval.key() {
                return Err(SlotError::KeyMismatch {
                    key: key.clone(),
                    interval: *interval,
                });
            }
        }
        Ok(())
    }

    /// Copy of these params moved onto another day.
    pub fn on_date(&self, date: NaiveDate) -> SlotParams {
        SlotParams {
            date,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: SlotId,
    #[serde(flatten)]
    pub params: SlotParams,
}

impl Slot {
    pub fn new(id: SlotId, params: SlotParams) -> Self {
        Self { id, params }
    }

    pub fn date(&self) -> NaiveDate {
        self.params.date
    }

    pub fn interval(&self, key: &str) -> Option<&Interval> {
        self.params.intervals.get(key)
    }

    /// Earliest start across the slot's intervals.
    pub fn start_time(&self) -> Option<NaiveTime> {
        self.params
            .intervals
            .values()
            .map(Interval::start_time)
            .min()
    }
}

/// One day's slots, keyed by id.
pub type SlotMap = BTreeMap<SlotId, Slot>;

/// Source of identifiers for newly filed slots.
pub trait SlotIdGenerator {
    fn next_id(&mut self) -> SlotId;
}

/// Random v4 UUIDs, unique without coordination.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSlotIds;

impl SlotIdGenerator for UuidSlotIds {
    fn next_id(&mut self) -> SlotId {
        SlotId(Uuid::new_v4().to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::str::FromStr;

    #[test]
    fn validate_requires_an_interval() {
        let mut params = params("2021-08-11", &["09:00-10:00"]);
        assert!(params.validate().is_ok());

        params.intervals.clear();
        assert_eq!(params.validate(), Err(SlotError::NoIntervals));
    }

    #[test]
    fn validate_rejects_mismatched_key() {
        let mut params = params("2021-08-11", &[]);
        params
            .intervals
            .insert("09:00-11:00".into(), "09:00-10:00".parse().unwrap());
        assert!(matches!(
            params.validate(),
            Err(SlotError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn slot_json_is_flat_camel_case() {
        let slot = slot("s1", "2021-08-11", &["09:00-10:00"]);
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["id"], "s1");
        assert_eq!(json["date"], "2021-08-11");
        assert_eq!(json["type"], "ice");
        assert_eq!(
            json["categories"],
            serde_json::json!(["pre-competitive", "competitive"])
        );
        assert_eq!(json["intervals"]["09:00-10:00"]["endTime"], "10:00");

        let back: Slot = serde_json::from_value(json).unwrap();
        assert_eq!(back, slot);
    }

    #[test]
    fn start_time_is_earliest_interval() {
        let slot = slot("s1", "2021-08-11", &["10:00-11:00", "08:30-09:00"]);
        assert_eq!(
            slot.start_time(),
            Some(NaiveTime::from_hms_opt(8, 30, 0).unwrap())
        );
    }

    #[test]
    fn enum_string_forms_match_serde() {
        assert_eq!(SlotType::OffIceGym.to_string(), "off-ice-gym");
        assert_eq!(Category::from_str("pre-competitive"), Ok(Category::PreCompetitive));
    }

    #[test]
    fn uuid_ids_are_unique() {
        let mut ids = UuidSlotIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
