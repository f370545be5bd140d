//! Job and build metadata capabilities.
//!
//! Events never hold live references to a job or build. The factory reads the
//! fields it needs through [`JobSource`] / [`BuildSource`] and stores a
//! [`JobSnapshot`] / [`BuildSnapshot`] by value, so displayed data cannot change
//! after construction.

use serde::{Deserialize, Serialize};

/// Metadata a job must expose to appear on the timeline.
pub trait JobSource {
    fn full_display_name(&self) -> String;
    /// URL path relative to the server root, e.g. `job/foo/`.
    fn url(&self) -> Option<String>;
    /// Icon token for the job's aggregate health.
    fn health_icon(&self) -> String;
}

/// Metadata a single build must expose to appear on the timeline.
pub trait BuildSource {
    fn full_display_name(&self) -> String;
    fn url(&self) -> Option<String>;
    fn start_time_in_millis(&self) -> i64;
    fn is_building(&self) -> bool;
    fn estimated_duration(&self) -> i64;
    /// Recorded duration. Only meaningful once the build has finished.
    fn duration(&self) -> i64;
    /// Icon token for this build's outcome.
    fn icon(&self) -> String;
}

/// Copied job fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub full_display_name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub health_icon: String,
}

impl JobSnapshot {
    pub fn capture(job: &dyn JobSource) -> Self {
        JobSnapshot {
            full_display_name: job.full_display_name(),
            url: job.url(),
            health_icon: job.health_icon(),
        }
    }
}

impl JobSource for JobSnapshot {
    fn full_display_name(&self) -> String {
        self.full_display_name.clone()
    }

    fn url(&self) -> Option<String> {
        self.url.clone()
    }

    fn health_icon(&self) -> String {
        self.health_icon.clone()
    }
}

/// Copied build fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSnapshot {
    pub full_display_name: String,
    #[serde(default)]
    pub url: Option<String>,
    pub start_time_in_millis: i64,
    #[serde(default)]
    pub building: bool,
    #[serde(default)]
    pub estimated_duration: i64,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub icon: String,
}

impl BuildSnapshot {
    pub fn capture(build: &dyn BuildSource) -> Self {
        BuildSnapshot {
            full_display_name: build.full_display_name(),
            url: build.url(),
            start_time_in_millis: build.start_time_in_millis(),
            building: build.is_building(),
            estimated_duration: build.estimated_duration(),
            duration: build.duration(),
            icon: build.icon(),
        }
    }
}

impl BuildSource for BuildSnapshot {
    fn full_display_name(&self) -> String {
        self.full_display_name.clone()
    }

    fn url(&self) -> Option<String> {
        self.url.clone()
    }

    fn start_time_in_millis(&self) -> i64 {
        self.start_time_in_millis
    }

    fn is_building(&self) -> bool {
        self.building
    }

    fn estimated_duration(&self) -> i64 {
        self.estimated_duration
    }

    fn duration(&self) -> i64 {
        self.duration
    }

    fn icon(&self) -> String {
        self.icon.clone()
    }
}
