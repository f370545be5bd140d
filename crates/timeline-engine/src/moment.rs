//! Immutable points in time.
//!
//! A [`Moment`] wraps a single UTC instant. It is ordered by instant and exposes
//! epoch milliseconds for arithmetic and the native `chrono` value for formatting.

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An absolute instant on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Moment(DateTime<Utc>);

impl Moment {
    /// Wrap a date value in any timezone. The instant is kept, the zone is not.
    pub fn new<Tz: TimeZone>(date: &DateTime<Tz>) -> Self {
        Moment(date.with_timezone(&Utc))
    }

    /// Build a moment from milliseconds since the Unix epoch.
    ///
    /// Values outside chrono's representable range saturate at its bounds.
    pub fn from_millis(millis: i64) -> Self {
        let date = DateTime::from_timestamp_millis(millis).unwrap_or(if millis < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });
        Moment(date)
    }

    pub fn time_in_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The wrapped `chrono` value, for downstream formatting.
    pub fn native_date(&self) -> DateTime<Utc> {
        self.0
    }

    /// Signed milliseconds from `self` to `later`.
    pub fn millis_until(&self, later: &Moment) -> i64 {
        later
            .time_in_millis()
            .saturating_sub(self.time_in_millis())
    }

    /// This moment shifted by `millis`, saturating at the calendar bounds.
    pub fn plus_millis(&self, millis: i64) -> Self {
        match Duration::try_milliseconds(millis).and_then(|delta| self.0.checked_add_signed(delta)) {
            Some(date) => Moment(date),
            None if millis < 0 => Moment(DateTime::<Utc>::MIN_UTC),
            None => Moment(DateTime::<Utc>::MAX_UTC),
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Moment {
    fn from(date: DateTime<Tz>) -> Self {
        Moment::new(&date)
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}
