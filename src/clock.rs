//! Wall-clock time for the face.
//!
//! Instants are `i64` unix seconds; the calendar breakdown and zone offsets
//! come from chrono. Any `chrono::TimeZone` can be injected, so a rule-based
//! zone (for example one from chrono-tz) brings daylight saving with it.
//! `FixedOffset` applies one offset all year.
//!
//! Seconds outside chrono's supported years are clamped to the nearest
//! representable day, so the wall fields saturate instead of wrapping.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

pub use chrono::{FixedOffset, TimeZone, Utc};

const SECS_PER_DAY: i64 = 86_400;

/// Calendar fields of one local moment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WallTime {
    pub year: i32,   // full year, e.g., 2024
    pub month: u8,   // 1-12, 0 only in the zeroed default
    pub day: u8,     // 1-31, 0 only in the zeroed default
    pub hour: u8,    // 0-23
    pub minute: u8,  // 0-59
    pub second: u8,  // 0-59
    pub weekday: u8, // 0 = Sunday
    pub yearday: u16, // 0-365
}

impl WallTime {
    /// Copies the calendar fields out of any chrono date-time.
    pub fn from_datetime<T: Datelike + Timelike>(dt: &T) -> Self {
        Self {
            year: dt.year(),
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
            weekday: dt.weekday().num_days_from_sunday() as u8,
            yearday: dt.ordinal0() as u16,
        }
    }

    /// The civil fields as a chrono value, `None` if they name no real date.
    /// Weekday and yearday are ignored.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month.into(), self.day.into())?.and_hms_opt(
            self.hour.into(),
            self.minute.into(),
            self.second.into(),
        )
    }

    /// Unix seconds, reading the fields as UTC.
    pub fn utc_timestamp(&self) -> Option<i64> {
        self.to_naive().map(|dt| dt.and_utc().timestamp())
    }
}

/// `unix_time` as a UTC instant, clamped into chrono's range with a day of
/// margin so any zone offset still lands on a valid local date.
pub fn utc_instant(unix_time: i64) -> DateTime<Utc> {
    let min = DateTime::<Utc>::MIN_UTC.timestamp() + SECS_PER_DAY;
    let max = DateTime::<Utc>::MAX_UTC.timestamp() - SECS_PER_DAY;
    DateTime::from_timestamp(unix_time.clamp(min, max), 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Local wall time of `unix_time` in `zone`.
pub fn localtime<Z: TimeZone>(unix_time: i64, zone: &Z) -> WallTime {
    WallTime::from_datetime(&utc_instant(unix_time).with_timezone(zone))
}
