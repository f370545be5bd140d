//! The neighbor and history lookup capability.
//!
//! The engine never decides which build came before or after another; it asks an
//! [`EventLookup`] backend. Each call receives the factory that built the event so
//! the backend can construct neighbor events against the same `now` snapshot.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::{CalendarEvent, ScheduledCalendarEvent, StartedCalendarEvent};
use crate::factory::CalendarEventFactory;

/// Which events the surrounding view is displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventsType {
    /// Past builds and future scheduled runs.
    #[default]
    All,
    /// Past and running builds only.
    Builds,
    /// Future scheduled runs only.
    Jobs,
}

impl EventsType {
    pub fn includes_scheduled(&self) -> bool {
        matches!(self, EventsType::All | EventsType::Jobs)
    }

    pub fn includes_builds(&self) -> bool {
        matches!(self, EventsType::All | EventsType::Builds)
    }
}

/// Chronological neighbor and history queries.
///
/// Absence is `Ok(None)` / an empty list. `Err` means the backing data source
/// failed; the engine propagates it without retrying.
pub trait EventLookup: Send + Sync {
    /// The started event of the same job that began just before `event`.
    fn previous_started_event(
        &self,
        event: &StartedCalendarEvent,
        factory: &CalendarEventFactory,
    ) -> Result<Option<StartedCalendarEvent>>;

    /// The started event of the same job that began just after `event`.
    fn next_started_event(
        &self,
        event: &StartedCalendarEvent,
        factory: &CalendarEventFactory,
    ) -> Result<Option<StartedCalendarEvent>>;

    /// The first scheduled run of the same job after `event`, as seen by a view
    /// showing `events_type`.
    fn next_scheduled_event(
        &self,
        event: &StartedCalendarEvent,
        events_type: EventsType,
        factory: &CalendarEventFactory,
    ) -> Result<Option<ScheduledCalendarEvent>>;

    /// Up to `limit` started events related to `event`, most recent first.
    fn last_events(
        &self,
        event: &dyn CalendarEvent,
        limit: usize,
        factory: &CalendarEventFactory,
    ) -> Result<Vec<StartedCalendarEvent>>;
}

/// A lookup with no history: every neighbor is absent and every list is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl EventLookup for NoHistory {
    fn previous_started_event(
        &self,
        _event: &StartedCalendarEvent,
        _factory: &CalendarEventFactory,
    ) -> Result<Option<StartedCalendarEvent>> {
        Ok(None)
    }

    fn next_started_event(
        &self,
        _event: &StartedCalendarEvent,
        _factory: &CalendarEventFactory,
    ) -> Result<Option<StartedCalendarEvent>> {
        Ok(None)
    }

    fn next_scheduled_event(
        &self,
        _event: &StartedCalendarEvent,
        _events_type: EventsType,
        _factory: &CalendarEventFactory,
    ) -> Result<Option<ScheduledCalendarEvent>> {
        Ok(None)
    }

    fn last_events(
        &self,
        _event: &dyn CalendarEvent,
        _limit: usize,
        _factory: &CalendarEventFactory,
    ) -> Result<Vec<StartedCalendarEvent>> {
        Ok(Vec::new())
    }
}
