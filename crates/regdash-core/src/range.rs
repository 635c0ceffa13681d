//! Symbolic date-range keys and their resolution into concrete windows.
//!
//! Windows are computed in the caller's wall-clock offset: `now` carries a
//! fixed UTC offset and every boundary (week start, month start) is taken at
//! local midnight in that offset.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{RegdashError, Result};

/// Wall-clock time with an explicit UTC offset.
pub type Timestamp = DateTime<FixedOffset>;

/// Symbolic identifier for a date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeKey {
    Last7Days,
    Last30Days,
    ThisWeek,
    ThisMonth,
    LastMonth,
}

impl RangeKey {
    /// Every supported key, in display order.
    pub const ALL: [RangeKey; 5] = [
        RangeKey::Last7Days,
        RangeKey::Last30Days,
        RangeKey::ThisWeek,
        RangeKey::ThisMonth,
        RangeKey::LastMonth,
    ];

    /// Wire name (e.g. `"thisMonth"`).
    pub fn as_str(self) -> &'static str {
        match self {
            RangeKey::Last7Days => "last7Days",
            RangeKey::Last30Days => "last30Days",
            RangeKey::ThisWeek => "thisWeek",
            RangeKey::ThisMonth => "thisMonth",
            RangeKey::LastMonth => "lastMonth",
        }
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeKey {
    type Err = RegdashError;

    fn from_str(s: &str) -> Result<Self> {
        RangeKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| RegdashError::BadRequest(format!("unknown date range: {s}")))
    }
}

/// First day of the week, per locale convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

/// What to do with a range key outside the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRangePolicy {
    /// Silently use `last7Days`.
    #[default]
    Fallback,
    /// Surface a `BadRequest`.
    Reject,
}

impl UnknownRangePolicy {
    /// Parse a raw key under this policy.
    pub fn parse(self, raw: &str) -> Result<RangeKey> {
        match raw.parse::<RangeKey>() {
            Ok(key) => Ok(key),
            Err(e) => match self {
                UnknownRangePolicy::Fallback => {
                    tracing::debug!(range = raw, "unknown date range, using last7Days");
                    Ok(RangeKey::Last7Days)
                }
                UnknownRangePolicy::Reject => Err(e),
            },
        }
    }
}

/// Concrete, inclusive time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DateRange {
    /// Whether `t` falls inside the window (both ends inclusive).
    pub fn contains(&self, t: &DateTime<Utc>) -> bool {
        let t = t.fixed_offset();
        t >= self.start && t <= self.end
    }
}

/// Resolve `key` against the reference time `now`.
///
/// Rolling windows (`last7Days`, `last30Days`) keep the time of day of `now`;
/// calendar windows start at local midnight. Every window ends at or before
/// `now`.
pub fn resolve_range(key: RangeKey, now: Timestamp, week_start: WeekStart) -> DateRange {
    let offset = *now.offset();
    let today = now.date_naive();

    match key {
        RangeKey::Last7Days => DateRange {
            start: now - TimeDelta::days(7),
            end: now,
        },
        RangeKey::Last30Days => DateRange {
            start: now - TimeDelta::days(30),
            end: now,
        },
        RangeKey::ThisWeek => {
            let back = days_since_week_start(today.weekday(), week_start.weekday());
            DateRange {
                start: local_midnight(today - TimeDelta::days(back), offset),
                end: now,
            }
        }
        RangeKey::ThisMonth => DateRange {
            start: local_midnight(first_of_month(today), offset),
            end: now,
        },
        RangeKey::LastMonth => {
            let this_month = first_of_month(today);
            let prev_month = first_of_month(this_month - TimeDelta::days(1));
            DateRange {
                start: local_midnight(prev_month, offset),
                end: local_midnight(this_month, offset) - TimeDelta::milliseconds(1),
            }
        }
    }
}

fn days_since_week_start(day: Weekday, start: Weekday) -> i64 {
    let d = i64::from(day.num_days_from_monday());
    let s = i64::from(start.num_days_from_monday());
    (d - s).rem_euclid(7)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.day0()))
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Timestamp {
    let local = date.and_time(NaiveTime::MIN);
    let utc = local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}
