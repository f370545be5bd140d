//! Event construction.
//!
//! A [`CalendarEventFactory`] captures one `now` instant, the lookup capability and
//! the display configuration. Every event it builds shares that snapshot, so a
//! batch of events built for one view agrees on what "now" is.

use std::fmt;
use std::sync::Arc;

use chrono_tz::Tz;
use tracing::debug;

use crate::config::TimelineConfig;
use crate::error::Result;
use crate::event::{
    CalendarEvent, CalendarEventState, EventCore, ScheduledCalendarEvent, StartedCalendarEvent,
};
use crate::lookup::EventLookup;
use crate::moment::Moment;
use crate::source::{BuildSnapshot, BuildSource, JobSnapshot, JobSource};

/// Builds scheduled and started events against a fixed `now`.
#[derive(Clone)]
pub struct CalendarEventFactory {
    now: Moment,
    lookup: Arc<dyn EventLookup>,
    config: Arc<TimelineConfig>,
    timezone: Tz,
}

impl CalendarEventFactory {
    /// Factory with the default configuration (UTC rendering, 5 last events).
    pub fn new(now: Moment, lookup: Arc<dyn EventLookup>) -> Self {
        CalendarEventFactory {
            now,
            lookup,
            config: Arc::new(TimelineConfig::default()),
            timezone: Tz::UTC,
        }
    }

    /// # Errors
    /// Returns `TimelineError::InvalidTimezone` if the configured zone is unknown.
    pub fn with_config(
        now: Moment,
        lookup: Arc<dyn EventLookup>,
        config: TimelineConfig,
    ) -> Result<Self> {
        let timezone = config.timezone()?;
        Ok(CalendarEventFactory {
            now,
            lookup,
            config: Arc::new(config),
            timezone,
        })
    }

    pub fn now(&self) -> Moment {
        self.now
    }

    pub fn lookup(&self) -> &dyn EventLookup {
        self.lookup.as_ref()
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// A future run of `job` starting at `start` and expected to last
    /// `duration` milliseconds. Durations under a second still produce a
    /// one-second event.
    pub fn create_scheduled_event(
        &self,
        job: &dyn JobSource,
        start: Moment,
        duration: i64,
    ) -> ScheduledCalendarEvent {
        let job = JobSnapshot::capture(job);
        let core = EventCore::new(
            job.clone(),
            start,
            job.full_display_name,
            job.url,
            duration,
            self.clone(),
        );
        let event = ScheduledCalendarEvent::new(core);
        debug!(id = %event.id(), duration, "created scheduled event");
        event
    }

    /// An event for `build` of `job`.
    ///
    /// A build still executing is `RUNNING` and lasts the larger of the time
    /// elapsed until `now` and its estimate, so it never shrinks before it
    /// completes. A completed build is `FINISHED` with its recorded duration.
    pub fn create_started_event(
        &self,
        job: &dyn JobSource,
        build: &dyn BuildSource,
    ) -> StartedCalendarEvent {
        let job = JobSnapshot::capture(job);
        let build = BuildSnapshot::capture(build);
        let start = Moment::from_millis(build.start_time_in_millis);

        let (duration, state) = if build.building {
            let elapsed = start.millis_until(&self.now);
            (
                elapsed.max(build.estimated_duration),
                CalendarEventState::Running,
            )
        } else {
            (build.duration, CalendarEventState::Finished)
        };

        let core = EventCore::new(
            job,
            start,
            build.full_display_name.clone(),
            build.url.clone(),
            duration,
            self.clone(),
        );
        let event = StartedCalendarEvent::new(core, build, state);
        debug!(
            id = %event.id(),
            %state,
            duration,
            "created started event"
        );
        event
    }
}

impl fmt::Debug for CalendarEventFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarEventFactory")
            .field("now", &self.now)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
