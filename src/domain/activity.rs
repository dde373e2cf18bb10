use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of entries kept by the activity feed.
pub const DEFAULT_FEED_CAPACITY: usize = 10;

/// Source of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// `debug-response` push.
    Debug,
    /// Correlated `analysis-complete` push.
    Analysis,
    /// `project-update` push.
    Project,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Analysis => write!(f, "analysis"),
            Self::Project => write!(f, "project"),
        }
    }
}

/// A push as it arrives, before the feed assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub message: String,
    /// Timestamp carried by the payload, kept verbatim. Never used for ordering.
    pub reported_at: Option<String>,
}

impl ActivityEvent {
    pub fn new(kind: ActivityKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            reported_at: None,
        }
    }

    pub fn reported_at(mut self, timestamp: impl Into<String>) -> Self {
        self.reported_at = Some(timestamp.into());
        self
    }
}

/// One line in the activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Monotonic, derived from the arrival time in milliseconds.
    pub id: i64,
    pub message: String,
    /// Client arrival time.
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    pub reported_at: Option<String>,
}
