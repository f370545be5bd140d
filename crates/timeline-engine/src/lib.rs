//! # timeline-engine
//!
//! Scheduled and historical build events on a timeline.
//!
//! The engine models immutable instants ([`Moment`]), validated intervals
//! ([`MomentRange`]) and the two kinds of calendar events: future runs of a job
//! ([`ScheduledCalendarEvent`]) and builds that have started
//! ([`StartedCalendarEvent`]). It answers range-overlap queries and resolves a
//! build's neighbors through an injected [`EventLookup`].
//!
//! ## Modules
//!
//! - [`moment`] — Immutable instants
//! - [`range`] — Validated `[start, end)` intervals
//! - [`event`] — Event variants, id derivation, overlap test, neighbor memoization
//! - [`factory`] — Builds events against a fixed `now`
//! - [`lookup`] — Neighbor/history capability and view filters
//! - [`source`] — Job and build metadata capabilities and snapshots
//! - [`display`] — Human-readable time spans
//! - [`config`] — Factory configuration
//! - [`error`] — Error types

pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod factory;
pub mod lookup;
pub mod moment;
pub mod range;
pub mod source;

pub use config::TimelineConfig;
pub use error::TimelineError;
pub use event::{
    AnyCalendarEvent, CalendarEvent, CalendarEventState, ScheduledCalendarEvent,
    StartedCalendarEvent,
};
pub use factory::CalendarEventFactory;
pub use lookup::{EventLookup, EventsType, NoHistory};
pub use moment::Moment;
pub use range::MomentRange;
pub use source::{BuildSnapshot, BuildSource, JobSnapshot, JobSource};
