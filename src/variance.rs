use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::attendance::AttendanceRecord;
use crate::model::interval::{Interval, IntervalError};

/// Badge shown next to an attendance entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum VarianceTier {
    /// Attendance not recorded yet.
    Pending,
    Exact,
    MinorOver,
    MajorOver,
    MinorUnder,
    MajorUnder,
}

/// Cutoff between minor and major variance, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarianceThresholds {
    pub major_minutes: u32,
}

impl Default for VarianceThresholds {
    fn default() -> Self {
        Self { major_minutes: 60 }
    }
}

impl VarianceThresholds {
    pub fn tier(&self, delta_minutes: i64) -> VarianceTier {
        let major = delta_minutes.unsigned_abs() >= u64::from(self.major_minutes);
        match (delta_minutes.signum(), major) {
            (0, _) => VarianceTier::Exact,
            (1, false) => VarianceTier::MinorOver,
            (1, true) => VarianceTier::MajorOver,
            (_, false) => VarianceTier::MinorUnder,
            (_, true) => VarianceTier::MajorUnder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variance {
    /// Attended minus booked duration; positive means the customer stayed longer.
    #[schema(example = 30)]
    pub delta_minutes: i64,
    #[schema(example = 0.5)]
    pub delta_hours: f64,
    pub tier: VarianceTier,
}

impl Variance {
    fn pending() -> Self {
        Self {
            delta_minutes: 0,
            delta_hours: 0.0,
            tier: VarianceTier::Pending,
        }
    }
}

pub fn variance(
    booked: &Interval,
    attended: Option<&Interval>,
    thresholds: &VarianceThresholds,
) -> Variance {
    let Some(attended) = attended else {
        return Variance::pending();
    };
    let delta_minutes = attended.duration_minutes() - booked.duration_minutes();
    Variance {
        delta_minutes,
        delta_hours: delta_minutes as f64 / 60.0,
        tier: thresholds.tier(delta_minutes),
    }
}

pub fn record_variance(record: &AttendanceRecord, thresholds: &VarianceThresholds) -> Variance {
    variance(
        &record.booked_interval,
        record.attended_interval.as_ref(),
        thresholds,
    )
}

/// Variance over raw `"HH:MM-HH:MM"` keys, failing on the first malformed one.
pub fn variance_from_keys(
    booked: &str,
    attended: Option<&str>,
    thresholds: &VarianceThresholds,
) -> Result<Variance, IntervalError> {
    let booked: Interval = booked.parse()?;
    let attended = attended.map(str::parse::<Interval>).transpose()?;
    Ok(variance(&booked, attended.as_ref(), thresholds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(key: &str) -> Interval {
        key.parse().unwrap()
    }

    #[test]
    fn half_hour_over_is_minor_over() {
        let v = variance(
            &interval("09:00-10:00"),
            Some(&interval("09:00-10:30")),
            &VarianceThresholds::default(),
        );
        assert_eq!(v.delta_minutes, 30);
        assert_eq!(v.delta_hours, 0.5);
        assert_eq!(v.tier, VarianceTier::MinorOver);
    }

    #[test]
    fn missing_attendance_is_pending_with_zero_delta() {
        let v = variance(&interval("09:00-10:00"), None, &VarianceThresholds::default());
        assert_eq!(v.delta_minutes, 0);
        assert_eq!(v.tier, VarianceTier::Pending);
    }

    #[test]
    fn same_duration_at_different_time_is_exact() {
        let v = variance(
            &interval("09:00-10:00"),
            Some(&interval("10:00-11:00")),
            &VarianceThresholds::default(),
        );
        assert_eq!(v.tier, VarianceTier::Exact);
    }

    #[test]
    fn swapping_intervals_negates_delta() {
        let thresholds = VarianceThresholds::default();
        let pairs = [
            ("09:00-10:00", "09:00-10:30"),
            ("08:00-12:00", "08:15-08:45"),
            ("17:00-18:00", "17:00-18:00"),
        ];
        for (a, b) in pairs {
            let forward = variance(&interval(a), Some(&interval(b)), &thresholds);
            let backward = variance(&interval(b), Some(&interval(a)), &thresholds);
            assert_eq!(forward.delta_minutes, -backward.delta_minutes);
            assert_eq!(forward.delta_hours, -backward.delta_hours);
        }
    }

    #[test]
    fn tiers_follow_configured_threshold() {
        let thresholds = VarianceThresholds { major_minutes: 30 };
        assert_eq!(thresholds.tier(29), VarianceTier::MinorOver);
        assert_eq!(thresholds.tier(30), VarianceTier::MajorOver);
        assert_eq!(thresholds.tier(-29), VarianceTier::MinorUnder);
        assert_eq!(thresholds.tier(-90), VarianceTier::MajorUnder);
        assert_eq!(thresholds.tier(0), VarianceTier::Exact);
    }

    #[test]
    fn malformed_keys_fail_fast() {
        let thresholds = VarianceThresholds::default();
        assert!(variance_from_keys("09:00-10:00", Some("9-10:30"), &thresholds).is_err());
        assert!(variance_from_keys("noon", None, &thresholds).is_err());
        assert_eq!(
            variance_from_keys("09:00-10:00", None, &thresholds)
                .unwrap()
                .tier,
            VarianceTier::Pending
        );
    }

    #[test]
    fn record_variance_reads_both_intervals() {
        let mut record = AttendanceRecord::booked(interval("09:00-11:00"));
        assert_eq!(
            record_variance(&record, &VarianceThresholds::default()).tier,
            VarianceTier::Pending
        );
        record.attended_interval = Some(interval("09:00-09:45"));
        let v = record_variance(&record, &VarianceThresholds::default());
        assert_eq!(v.delta_minutes, -75);
        assert_eq!(v.tier, VarianceTier::MajorUnder);
    }

    #[test]
    fn tier_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(VarianceTier::MinorOver).unwrap(),
            "minor-over"
        );
        assert_eq!(VarianceTier::MajorUnder.to_string(), "major-under");
    }
}
