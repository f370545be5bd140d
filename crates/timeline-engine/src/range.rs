//! Validated time intervals.
//!
//! A [`MomentRange`] is a non-empty, start-inclusive/end-exclusive interval.
//! Reversed or empty ranges are rejected at construction; they are never clamped
//! or swapped.

use std::fmt;

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::error::{Result, TimelineError};
use crate::moment::Moment;

pub(crate) const RANGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A `[start, end)` interval with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MomentRange {
    start: Moment,
    end: Moment,
}

impl MomentRange {
    /// Create a range.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidRange` unless `start` is strictly before `end`.
    pub fn new(start: Moment, end: Moment) -> Result<Self> {
        if !Self::is_valid_range(&start, &end) {
            return Err(TimelineError::InvalidRange { start, end });
        }
        Ok(MomentRange { start, end })
    }

    /// Non-failing check of the rule enforced by [`MomentRange::new`].
    pub fn is_valid_range(start: &Moment, end: &Moment) -> bool {
        start < end
    }

    pub fn start(&self) -> Moment {
        self.start
    }

    pub fn end(&self) -> Moment {
        self.end
    }

    /// Length of the range in milliseconds. Always at least 1.
    pub fn duration(&self) -> i64 {
        self.end.time_in_millis() - self.start.time_in_millis()
    }

    /// Half-open membership: `start <= moment < end`.
    pub fn contains(&self, moment: &Moment) -> bool {
        self.start <= *moment && *moment < self.end
    }

    /// Render both endpoints as local wall-clock time in `tz`.
    pub fn format_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        format!(
            "{} - {}",
            self.start.native_date().with_timezone(tz).format(RANGE_FORMAT),
            self.end.native_date().with_timezone(tz).format(RANGE_FORMAT)
        )
    }
}

/// Renders in the process-local timezone, so output depends on the environment.
impl fmt::Display for MomentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_in(&Local))
    }
}
