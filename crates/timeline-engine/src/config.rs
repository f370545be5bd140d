//! Factory configuration.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

/// Number of historical builds returned by `last_events` unless configured.
pub const DEFAULT_LAST_EVENTS_LIMIT: usize = 5;

/// Settings shared by every event a factory builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// IANA timezone used when rendering events (e.g. "Europe/Berlin").
    pub display_timezone: String,
    /// Upper bound on the history list returned by `last_events`.
    pub last_events_limit: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        TimelineConfig {
            display_timezone: "UTC".to_string(),
            last_events_limit: DEFAULT_LAST_EVENTS_LIMIT,
        }
    }
}

impl TimelineConfig {
    /// Parse a JSON config document. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `TimelineError::Config` for malformed JSON and
    /// `TimelineError::InvalidTimezone` for an unknown zone name.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TimelineConfig = serde_json::from_str(json)?;
        config.timezone()?;
        Ok(config)
    }

    /// The parsed display timezone.
    pub fn timezone(&self) -> Result<Tz> {
        self.display_timezone
            .parse()
            .map_err(|_| TimelineError::InvalidTimezone(self.display_timezone.clone()))
    }
}
