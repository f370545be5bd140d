//! Error types for timeline-engine operations.

use thiserror::Error;

use crate::moment::Moment;

/// Boxed error produced by an [`EventLookup`](crate::lookup::EventLookup) backend.
pub type LookupFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum TimelineError {
    /// A range was constructed with `start >= end`.
    #[error("Invalid range: start {start} must be before end {end}")]
    InvalidRange { start: Moment, end: Moment },

    /// The lookup capability failed. The backend's error is passed through as-is.
    #[error(transparent)]
    Lookup(LookupFailure),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

impl TimelineError {
    /// Wrap a backend error raised while resolving neighbors or history.
    pub fn lookup<E>(err: E) -> Self
    where
        E: Into<LookupFailure>,
    {
        TimelineError::Lookup(err.into())
    }
}

pub type Result<T> = std::result::Result<T, TimelineError>;
