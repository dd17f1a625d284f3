//! Ephemeral networking-mode session.

use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The visibility toggle and the session it is timing. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NetworkingSession {
    pub is_active: bool,
    pub started_at: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub elapsed_seconds: u64,
}

impl NetworkingSession {
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            is_active: true,
            started_at: Some(now),
            elapsed_seconds: 0,
        }
    }

    /// Seconds since the session started; zero if inactive or the clock
    /// went backwards.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> u64 {
        match (self.is_active, self.started_at) {
            (true, Some(started)) => u64::try_from((now - started).num_seconds()).unwrap_or(0),
            _ => 0,
        }
    }

    /// Refresh `elapsed_seconds` for display.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.elapsed_seconds = self.elapsed_at(now);
    }
}
