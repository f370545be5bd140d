//! Timeline events: scheduled future runs and started (running or finished) builds.
//!
//! Both variants share an [`EventCore`] and the default methods of the
//! [`CalendarEvent`] trait. State is fixed at construction; a build that moves
//! from running to finished is represented by a new event instance.
//!
//! Neighbor links and history lists are resolved lazily through the factory's
//! [`EventLookup`](crate::lookup::EventLookup) and memoized in single-initialization
//! cells, so each lookup runs at most once per instance even with concurrent
//! readers. A failed lookup is not memoized.

use std::fmt;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::display;
use crate::error::Result;
use crate::factory::CalendarEventFactory;
use crate::lookup::EventsType;
use crate::moment::Moment;
use crate::range::{MomentRange, RANGE_FORMAT};
use crate::source::{BuildSnapshot, JobSnapshot};

/// Shortest span an event occupies on the timeline, in milliseconds.
pub const MIN_EVENT_DURATION: i64 = 1_000;

/// Lifecycle state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalendarEventState {
    Scheduled,
    Running,
    Finished,
}

impl fmt::Display for CalendarEventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CalendarEventState::Scheduled => "SCHEDULED",
            CalendarEventState::Running => "RUNNING",
            CalendarEventState::Finished => "FINISHED",
        })
    }
}

/// Derive an event id from a URL path and a start instant.
///
/// Slashes become dashes, the result is lower-cased, and the start millis are
/// appended with no separator: `("/job/foo/", 1000)` gives `-job-foo-1000`.
pub fn event_id(url: Option<&str>, start_time_in_millis: i64) -> String {
    format!(
        "{}{}",
        url.unwrap_or("").replace('/', "-").to_lowercase(),
        start_time_in_millis
    )
}

/// End of an event starting at `start` and lasting `duration` milliseconds.
///
/// Durations below [`MIN_EVENT_DURATION`] are raised to it.
pub fn event_end(start: &Moment, duration: i64) -> Moment {
    start.plus_millis(duration.max(MIN_EVENT_DURATION))
}

/// Range overlap with deliberately mixed boundaries:
///
/// 1. `start` in `[range.start, range.end)`, or
/// 2. `end` in `(range.start, range.end)`, or
/// 3. `[start, end]` covers the whole range.
///
/// An event touching the range only at one of its endpoints does not overlap.
pub fn overlaps(start: &Moment, end: &Moment, range: &MomentRange) -> bool {
    let (range_start, range_end) = (range.start(), range.end());
    (*start >= range_start && *start < range_end)
        || (*end > range_start && *end < range_end)
        || (*start <= range_start && *end >= range_end)
}

/// Fields shared by both event variants.
#[derive(Debug, Clone)]
pub struct EventCore {
    id: String,
    job: JobSnapshot,
    start: Moment,
    end: Moment,
    title: String,
    url: Option<String>,
    duration: i64,
    factory: CalendarEventFactory,
    last_events: OnceCell<Vec<StartedCalendarEvent>>,
}

impl EventCore {
    pub(crate) fn new(
        job: JobSnapshot,
        start: Moment,
        title: String,
        url: Option<String>,
        duration: i64,
        factory: CalendarEventFactory,
    ) -> Self {
        EventCore {
            id: event_id(job.url.as_deref(), start.time_in_millis()),
            end: event_end(&start, duration),
            job,
            start,
            title,
            url,
            duration,
            factory,
            last_events: OnceCell::new(),
        }
    }

    fn resolve_last_events(&self, event: &dyn CalendarEvent) -> Result<&[StartedCalendarEvent]> {
        if let Some(events) = self.last_events.get() {
            trace!(id = %self.id, "last events already resolved");
            return Ok(events.as_slice());
        }
        let events = self.last_events.get_or_try_init(|| {
            let limit = self.factory.config().last_events_limit;
            debug!(id = %self.id, limit, "looking up last events");
            self.factory
                .lookup()
                .last_events(event, limit, &self.factory)
                .inspect_err(|e| warn!(id = %self.id, error = %e, "last events lookup failed"))
        })?;
        Ok(events.as_slice())
    }
}

/// Behavior shared by scheduled and started events.
pub trait CalendarEvent: fmt::Debug + Send + Sync {
    fn core(&self) -> &EventCore;

    fn state(&self) -> CalendarEventState;

    /// Status icon token: job health for scheduled runs, outcome for builds.
    fn icon_class_name(&self) -> &str;

    /// Up to the configured number of recent started events related to this one,
    /// most recent first. Resolved once, then served from the cache.
    fn last_events(&self) -> Result<&[StartedCalendarEvent]>;

    fn id(&self) -> &str {
        &self.core().id
    }

    fn job(&self) -> &JobSnapshot {
        &self.core().job
    }

    fn start(&self) -> Moment {
        self.core().start
    }

    fn end(&self) -> Moment {
        self.core().end
    }

    fn title(&self) -> &str {
        &self.core().title
    }

    fn url(&self) -> Option<&str> {
        self.core().url.as_deref()
    }

    /// Duration in milliseconds. Unlike `end - start`, this is not floored.
    fn duration(&self) -> i64 {
        self.core().duration
    }

    /// Distance between the factory's `now` and the start, e.g. "3 hr 5 min ago".
    fn timestamp_string(&self) -> String {
        let core = self.core();
        let difference = core.start.millis_until(&core.factory.now()).saturating_abs();
        display::past_time_string(difference)
    }

    fn duration_string(&self) -> String {
        display::time_span_string(self.core().duration)
    }

    fn is_in_range(&self, range: &MomentRange) -> bool {
        let core = self.core();
        overlaps(&core.start, &core.end, range)
    }

    /// `start - end: title`, in the factory's display timezone.
    fn describe(&self) -> String {
        let core = self.core();
        let tz = core.factory.timezone();
        format!(
            "{} - {}: {}",
            core.start.native_date().with_timezone(&tz).format(RANGE_FORMAT),
            core.end.native_date().with_timezone(&tz).format(RANGE_FORMAT),
            core.title
        )
    }
}

/// A future, not yet started run of a job.
#[derive(Debug, Clone)]
pub struct ScheduledCalendarEvent {
    core: EventCore,
}

impl ScheduledCalendarEvent {
    pub(crate) fn new(core: EventCore) -> Self {
        ScheduledCalendarEvent { core }
    }
}

impl CalendarEvent for ScheduledCalendarEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn state(&self) -> CalendarEventState {
        CalendarEventState::Scheduled
    }

    fn icon_class_name(&self) -> &str {
        &self.core.job.health_icon
    }

    fn last_events(&self) -> Result<&[StartedCalendarEvent]> {
        self.core.resolve_last_events(self)
    }
}

impl fmt::Display for ScheduledCalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A running or finished build.
#[derive(Debug, Clone)]
pub struct StartedCalendarEvent {
    core: EventCore,
    build: BuildSnapshot,
    state: CalendarEventState,
    previous_event: OnceCell<Option<Box<StartedCalendarEvent>>>,
    next_event: OnceCell<Option<Box<StartedCalendarEvent>>>,
    next_scheduled_event: OnceCell<Option<ScheduledCalendarEvent>>,
}

impl StartedCalendarEvent {
    pub(crate) fn new(core: EventCore, build: BuildSnapshot, state: CalendarEventState) -> Self {
        StartedCalendarEvent {
            core,
            build,
            state,
            previous_event: OnceCell::new(),
            next_event: OnceCell::new(),
            next_scheduled_event: OnceCell::new(),
        }
    }

    pub fn build(&self) -> &BuildSnapshot {
        &self.build
    }

    /// The same job's started event that began just before this one.
    pub fn previous_started_event(&self) -> Result<Option<&StartedCalendarEvent>> {
        let cached = self.resolve_neighbor(&self.previous_event, "previous", |factory| {
            factory
                .lookup()
                .previous_started_event(self, factory)
                .map(|found| found.map(Box::new))
        })?;
        Ok(cached.as_deref())
    }

    /// The same job's started event that began just after this one.
    pub fn next_started_event(&self) -> Result<Option<&StartedCalendarEvent>> {
        let cached = self.resolve_neighbor(&self.next_event, "next", |factory| {
            factory
                .lookup()
                .next_started_event(self, factory)
                .map(|found| found.map(Box::new))
        })?;
        Ok(cached.as_deref())
    }

    /// The job's next scheduled run after this build.
    ///
    /// The first call's `events_type` decides the cached answer; later calls
    /// return it regardless of the type they pass.
    pub fn next_scheduled_event(
        &self,
        events_type: EventsType,
    ) -> Result<Option<&ScheduledCalendarEvent>> {
        let cached = self.resolve_neighbor(&self.next_scheduled_event, "next scheduled", |factory| {
            factory.lookup().next_scheduled_event(self, events_type, factory)
        })?;
        Ok(cached.as_ref())
    }

    fn resolve_neighbor<'a, T, F>(
        &'a self,
        cell: &'a OnceCell<Option<T>>,
        relation: &'static str,
        lookup: F,
    ) -> Result<&'a Option<T>>
    where
        F: FnOnce(&CalendarEventFactory) -> Result<Option<T>>,
    {
        if let Some(cached) = cell.get() {
            trace!(id = %self.core.id, relation, "neighbor already resolved");
            return Ok(cached);
        }
        cell.get_or_try_init(|| {
            debug!(id = %self.core.id, relation, "looking up neighbor event");
            lookup(&self.core.factory).inspect_err(
                |e| warn!(id = %self.core.id, relation, error = %e, "neighbor lookup failed"),
            )
        })
    }
}

impl CalendarEvent for StartedCalendarEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn state(&self) -> CalendarEventState {
        self.state
    }

    fn icon_class_name(&self) -> &str {
        &self.build.icon
    }

    fn last_events(&self) -> Result<&[StartedCalendarEvent]> {
        self.core.resolve_last_events(self)
    }
}

impl fmt::Display for StartedCalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Either variant, for mixed event lists.
#[derive(Debug, Clone)]
pub enum AnyCalendarEvent {
    Scheduled(ScheduledCalendarEvent),
    Started(StartedCalendarEvent),
}

impl CalendarEvent for AnyCalendarEvent {
    fn core(&self) -> &EventCore {
        match self {
            AnyCalendarEvent::Scheduled(event) => event.core(),
            AnyCalendarEvent::Started(event) => event.core(),
        }
    }

    fn state(&self) -> CalendarEventState {
        match self {
            AnyCalendarEvent::Scheduled(event) => event.state(),
            AnyCalendarEvent::Started(event) => event.state(),
        }
    }

    fn icon_class_name(&self) -> &str {
        match self {
            AnyCalendarEvent::Scheduled(event) => event.icon_class_name(),
            AnyCalendarEvent::Started(event) => event.icon_class_name(),
        }
    }

    fn last_events(&self) -> Result<&[StartedCalendarEvent]> {
        match self {
            AnyCalendarEvent::Scheduled(event) => event.last_events(),
            AnyCalendarEvent::Started(event) => event.last_events(),
        }
    }
}

impl fmt::Display for AnyCalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
