//! Date values

use crate::error::ValueError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::cell::Cell;
use std::ops::RangeInclusive;

/// A mutable instant in time, millisecond precision, always UTC
#[derive(Debug)]
pub struct JsDate {
    time: Cell<DateTime<Utc>>,
}

impl JsDate {
    /// Create a date holding the given instant
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time: Cell::new(time),
        }
    }

    /// Millisecond timestamps a date can hold.
    ///
    /// This is chrono's range, roughly years -262143 to 262142. It is narrower
    /// than the ±8.64e15 ms a script `Date` allows, so instants past either end
    /// are rejected with [`ValueError::InvalidTime`].
    pub fn timestamp_range() -> RangeInclusive<i64> {
        DateTime::<Utc>::MIN_UTC.timestamp_millis()..=DateTime::<Utc>::MAX_UTC.timestamp_millis()
    }

    /// Create a date from milliseconds since the Unix epoch.
    ///
    /// Fails outside [`JsDate::timestamp_range`].
    pub fn from_timestamp_millis(millis: i64) -> Result<Self, ValueError> {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(Self::new)
            .ok_or(ValueError::InvalidTime(millis))
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// The held instant
    pub fn time(&self) -> DateTime<Utc> {
        self.time.get()
    }

    /// Milliseconds since the Unix epoch (`getTime`)
    pub fn timestamp_millis(&self) -> i64 {
        self.time.get().timestamp_millis()
    }

    /// Replace the held instant (`setTime`). Same range as construction.
    pub fn set_timestamp_millis(&self, millis: i64) -> Result<(), ValueError> {
        let time = DateTime::<Utc>::from_timestamp_millis(millis).ok_or(ValueError::InvalidTime(millis))?;
        self.time.set(time);
        Ok(())
    }

    /// ISO-8601 text with millisecond precision (`toISOString`)
    pub fn to_iso_string(&self) -> String {
        self.time.get().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
