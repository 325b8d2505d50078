use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum IntervalError {
    #[display(fmt = "invalid interval: '{}' is not a HH:MM time", value)]
    InvalidTime { value: String },
    #[display(fmt = "invalid interval: start {} is not before end {}", start, end)]
    InvertedRange { start: String, end: String },
    #[display(fmt = "invalid interval: '{}' is not a HH:MM-HH:MM key", key)]
    MalformedKey { key: String },
}

/// A bookable time range within a single day.
///
/// Both ends are zero-padded 24h times and `start < end` always holds, so
/// string and time ordering agree. Values are only built through
/// [`Interval::new`], [`FromStr`] or deserialization, which all validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(
    rename_all = "camelCase",
    try_from = "RawInterval",
    into = "RawInterval"
)]
#[schema(example = json!({ "startTime": "09:00", "endTime": "10:00" }))]
pub struct Interval {
    #[schema(value_type = String, example = "09:00")]
    start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00")]
    end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInterval {
    start_time: String,
    end_time: String,
}

fn parse_time(value: &str) -> Result<NaiveTime, IntervalError> {
    // chrono accepts single-digit hours; keys rely on fixed-width times
    let fixed_width = value.len() == 5 && value.as_bytes()[2] == b':';
    fixed_width
        .then(|| NaiveTime::parse_from_str(value, TIME_FORMAT).ok())
        .flatten()
        .ok_or_else(|| IntervalError::InvalidTime {
            value: value.to_string(),
        })
}

impl Interval {
    pub fn new(start_time: &str, end_time: &str) -> Result<Self, IntervalError> {
        let start = parse_time(start_time)?;
        let end = parse_time(end_time)?;
        if start >= end {
            return Err(IntervalError::InvertedRange {
                start: start_time.to_string(),
                end: end_time.to_string(),
            });
        }
        Ok(Self {
            start_time: start,
            end_time: end,
        })
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    /// The `"HH:MM-HH:MM"` key slots use to index their intervals.
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start_time.format(TIME_FORMAT),
            self.end_time.format(TIME_FORMAT)
        )
    }
}

impl FromStr for Interval {
    type Err = IntervalError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let (start, end) = key
            .split_once('-')
            .ok_or_else(|| IntervalError::MalformedKey {
                key: key.to_string(),
            })?;
        Interval::new(start.trim(), end.trim())
    }
}

impl TryFrom<RawInterval> for Interval {
    type Error = IntervalError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(&raw.start_time, &raw.end_time)
    }
}

impl From<Interval> for RawInterval {
    fn from(interval: Interval) -> Self {
        RawInterval {
            start_time: interval.start_time.format(TIME_FORMAT).to_string(),
            end_time: interval.end_time.format(TIME_FORMAT).to_string(),
        }
    }
}
