//! Job snapshot files and the history lookup backed by them.
//!
//! A snapshot is a JSON document holding the instant it was taken, every job with
//! its builds, and the job's upcoming scheduled runs:
//!
//! ```json
//! {
//!   "now": "2018-01-01T12:00:00Z",
//!   "jobs": [{
//!     "full_display_name": "foo",
//!     "url": "job/foo/",
//!     "health_icon": "icon-health-80plus",
//!     "builds": [{ "full_display_name": "foo #1", "start_time_in_millis": 1514800800000,
//!                  "duration": 600000, "icon": "icon-blue" }],
//!     "scheduled": [{ "start": "2018-01-02T00:00:00Z", "estimated_duration": 600000 }]
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use timeline_engine::error::Result;
use timeline_engine::{
    AnyCalendarEvent, BuildSnapshot, CalendarEvent, CalendarEventFactory, EventLookup, EventsType,
    JobSnapshot, Moment, ScheduledCalendarEvent, StartedCalendarEvent,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub now: Moment,
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(flatten)]
    pub job: JobSnapshot,
    #[serde(default)]
    pub builds: Vec<BuildSnapshot>,
    #[serde(default)]
    pub scheduled: Vec<ScheduledRun>,
}

/// A future run of a job, as computed by whatever owns the job's triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledRun {
    pub start: Moment,
    #[serde(default)]
    pub estimated_duration: i64,
}

impl Snapshot {
    /// Every event of the snapshot the view type asks for, ordered by start.
    pub fn events(
        &self,
        factory: &CalendarEventFactory,
        events_type: EventsType,
    ) -> Vec<AnyCalendarEvent> {
        let mut events: Vec<AnyCalendarEvent> = Vec::new();
        for record in &self.jobs {
            if events_type.includes_builds() {
                events.extend(record.builds.iter().map(|build| {
                    AnyCalendarEvent::Started(factory.create_started_event(&record.job, build))
                }));
            }
            if events_type.includes_scheduled() {
                events.extend(record.scheduled.iter().map(|run| {
                    AnyCalendarEvent::Scheduled(factory.create_scheduled_event(
                        &record.job,
                        run.start,
                        run.estimated_duration,
                    ))
                }));
            }
        }
        events.sort_by_key(|event| event.start());
        events
    }
}

/// [`EventLookup`] over the builds and scheduled runs of a snapshot.
///
/// Events are matched to the job record whose snapshot equals the event's job,
/// so jobs without a URL stay apart. Neighbors are the job's builds ordered by
/// start time. Builds of one job sharing a start millisecond are never each
/// other's neighbors and share an event id.
#[derive(Debug, Clone)]
pub struct HistoryLookup {
    jobs: Vec<JobRecord>,
}

impl HistoryLookup {
    pub fn new(mut jobs: Vec<JobRecord>) -> Self {
        for record in &mut jobs {
            record.builds.sort_by_key(|b| b.start_time_in_millis);
            record.scheduled.sort_by_key(|run| run.start);
        }
        HistoryLookup { jobs }
    }

    fn record_for(&self, event: &dyn CalendarEvent) -> Option<&JobRecord> {
        self.jobs.iter().find(|record| record.job == *event.job())
    }
}

impl EventLookup for HistoryLookup {
    fn previous_started_event(
        &self,
        event: &StartedCalendarEvent,
        factory: &CalendarEventFactory,
    ) -> Result<Option<StartedCalendarEvent>> {
        let start = event.start().time_in_millis();
        Ok(self.record_for(event).and_then(|record| {
            record
                .builds
                .iter()
                .rev()
                .find(|build| build.start_time_in_millis < start)
                .map(|build| factory.create_started_event(&record.job, build))
        }))
    }

    fn next_started_event(
        &self,
        event: &StartedCalendarEvent,
        factory: &CalendarEventFactory,
    ) -> Result<Option<StartedCalendarEvent>> {
        let start = event.start().time_in_millis();
        Ok(self.record_for(event).and_then(|record| {
            record
                .builds
                .iter()
                .find(|build| build.start_time_in_millis > start)
                .map(|build| factory.create_started_event(&record.job, build))
        }))
    }

    fn next_scheduled_event(
        &self,
        event: &StartedCalendarEvent,
        events_type: EventsType,
        factory: &CalendarEventFactory,
    ) -> Result<Option<ScheduledCalendarEvent>> {
        if !events_type.includes_scheduled() {
            return Ok(None);
        }
        let start = event.start();
        Ok(self.record_for(event).and_then(|record| {
            record
                .scheduled
                .iter()
                .find(|run| run.start > start)
                .map(|run| {
                    factory.create_scheduled_event(&record.job, run.start, run.estimated_duration)
                })
        }))
    }

    fn last_events(
        &self,
        event: &dyn CalendarEvent,
        limit: usize,
        factory: &CalendarEventFactory,
    ) -> Result<Vec<StartedCalendarEvent>> {
        let start = event.start().time_in_millis();
        Ok(self
            .record_for(event)
            .map(|record| {
                record
                    .builds
                    .iter()
                    .rev()
                    .filter(|build| build.start_time_in_millis < start)
                    .take(limit)
                    .map(|build| factory.create_started_event(&record.job, build))
                    .collect()
            })
            .unwrap_or_default())
    }
}
