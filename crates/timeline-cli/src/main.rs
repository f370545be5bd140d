//! `timeline` CLI — query build timeline events from a job snapshot file.
//!
//! ## Usage
//!
//! ```sh
//! # Events overlapping a day, as text
//! timeline events -i snapshot.json --from 2018-01-01T00:00:00Z --to 2018-01-02T00:00:00Z
//!
//! # Only builds, as JSON, rendered in Berlin time
//! timeline events -i snapshot.json --from ... --to ... --type builds --json --tz Europe/Berlin
//!
//! # Neighbors and recent history of one build
//! timeline neighbors -i snapshot.json --id job-foo-1514800800000
//!
//! # Verbose logging
//! RUST_LOG=timeline_engine=debug timeline events ...
//! ```

mod snapshot;

use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use timeline_engine::{
    AnyCalendarEvent, CalendarEvent, CalendarEventFactory, CalendarEventState, EventsType, Moment,
    MomentRange, TimelineConfig,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::snapshot::{HistoryLookup, Snapshot};

#[derive(Parser)]
#[command(
    name = "timeline",
    version,
    about = "Query scheduled and historical build events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (display_timezone, last_events_limit)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Display timezone, overrides the config file (e.g. "Europe/Berlin")
    #[arg(long, global = true)]
    tz: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List events overlapping a time range
    Events {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Range start (RFC 3339)
        #[arg(long)]
        from: String,
        /// Range end, exclusive (RFC 3339)
        #[arg(long)]
        to: String,
        /// Which events to include
        #[arg(long = "type", value_enum, default_value = "all")]
        events_type: ViewType,
        /// Print a JSON array instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the neighbors and recent history of one started event
    Neighbors {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Event id, e.g. job-foo-1514800800000
        #[arg(long)]
        id: String,
        /// View type used for the next scheduled run
        #[arg(long = "type", value_enum, default_value = "all")]
        events_type: ViewType,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewType {
    All,
    Builds,
    Jobs,
}

impl From<ViewType> for EventsType {
    fn from(view: ViewType) -> Self {
        match view {
            ViewType::All => EventsType::All,
            ViewType::Builds => EventsType::Builds,
            ViewType::Jobs => EventsType::Jobs,
        }
    }
}

/// One event in `--json` output.
#[derive(Serialize)]
struct EventView<'a> {
    id: &'a str,
    title: &'a str,
    url: Option<&'a str>,
    state: CalendarEventState,
    start: Moment,
    end: Moment,
    duration: i64,
    duration_string: String,
    icon: &'a str,
}

impl<'a> EventView<'a> {
    fn new(event: &'a dyn CalendarEvent) -> Self {
        EventView {
            id: event.id(),
            title: event.title(),
            url: event.url(),
            state: event.state(),
            start: event.start(),
            end: event.end(),
            duration: event.duration(),
            duration_string: event.duration_string(),
            icon: event.icon_class_name(),
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.tz.as_deref())?;

    match cli.command {
        Commands::Events {
            input,
            from,
            to,
            events_type,
            json,
        } => {
            let snapshot = read_snapshot(input.as_deref())?;
            let range = MomentRange::new(parse_moment(&from)?, parse_moment(&to)?)
                .context("Invalid --from/--to range")?;
            let factory = build_factory(&snapshot, config)?;

            let events: Vec<AnyCalendarEvent> = snapshot
                .events(&factory, events_type.into())
                .into_iter()
                .filter(|event| event.is_in_range(&range))
                .collect();
            debug!(count = events.len(), %range, "events in range");

            if json {
                let views: Vec<EventView<'_>> =
                    events.iter().map(|event| EventView::new(event)).collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&views).context("Failed to serialize events")?
                );
            } else {
                for event in &events {
                    println!("{}", summary_line(event));
                }
            }
        }
        Commands::Neighbors {
            input,
            id,
            events_type,
        } => {
            let snapshot = read_snapshot(input.as_deref())?;
            let factory = build_factory(&snapshot, config)?;

            let event = snapshot
                .events(&factory, EventsType::Builds)
                .into_iter()
                .find_map(|event| match event {
                    AnyCalendarEvent::Started(started) if started.id() == id => Some(started),
                    _ => None,
                })
                .with_context(|| format!("No started event with id '{}'", id))?;

            println!("event:     {}", summary_line(&event));
            println!(
                "previous:  {}",
                optional_line(event.previous_started_event()?)
            );
            println!("next:      {}", optional_line(event.next_started_event()?));
            println!(
                "scheduled: {}",
                optional_line(event.next_scheduled_event(events_type.into())?)
            );
            println!("last events:");
            for past in event.last_events()? {
                println!("  {}", summary_line(past));
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read the optional config file, then apply the `--tz` override.
fn load_config(path: Option<&str>, tz: Option<&str>) -> Result<TimelineConfig> {
    let mut config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            TimelineConfig::from_json(&json)
                .with_context(|| format!("Invalid config file: {}", path))?
        }
        None => TimelineConfig::default(),
    };
    if let Some(tz) = tz {
        config.display_timezone = tz.to_string();
    }
    Ok(config)
}

fn build_factory(snapshot: &Snapshot, config: TimelineConfig) -> Result<CalendarEventFactory> {
    let lookup = Arc::new(HistoryLookup::new(snapshot.jobs.clone()));
    CalendarEventFactory::with_config(snapshot.now, lookup, config)
        .context("Invalid timeline configuration")
}

fn parse_moment(value: &str) -> Result<Moment> {
    let date = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid RFC 3339 timestamp: {}", value))?;
    Ok(Moment::from(date))
}

fn summary_line(event: &dyn CalendarEvent) -> String {
    format!(
        "{:<9} {}  {} ({})",
        event.state().to_string(),
        event.id(),
        event.describe(),
        event.duration_string()
    )
}

fn optional_line<E: CalendarEvent>(event: Option<&E>) -> String {
    event
        .map(|event| summary_line(event))
        .unwrap_or_else(|| "-".to_string())
}

fn read_snapshot(path: Option<&str>) -> Result<Snapshot> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&json).context("Failed to parse snapshot JSON")
}
