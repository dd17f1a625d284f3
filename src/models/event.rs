// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event model and expiry rules.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// How long an event without a date stays open.
pub const DEFAULT_EVENT_LIFETIME_DAYS: i64 = 7;

/// A gathering with its attendee list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// Free-form date as entered (e.g. "2026-10-24")
    #[serde(default)]
    pub date: String,
    /// Free-form time as entered (e.g. "18:30")
    #[serde(default)]
    pub time: String,
    pub creator_id: String,
    #[serde(default)]
    pub creator_name: String,
    /// Participant ids, creator first, no duplicates
    pub attendees: Vec<String>,
    #[serde(default)]
    pub ripple_level: u32,
    pub expires_at: DateTime<Utc>,
    /// Older blobs lack this; they fall back to the Unix epoch
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn has_attendee(&self, id: &str) -> bool {
        self.attendees.iter().any(|a| a == id)
    }
}

/// Input for creating an event.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    /// Generated when absent
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[validate(length(min = 1))]
    pub creator_id: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    /// Derived from `date`/`time` when absent
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, creator_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            creator_id: creator_id.into(),
            ..Self::default()
        }
    }

    pub fn normalized(mut self) -> Self {
        self.id = self
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.location = self.location.trim().to_string();
        self.date = self.date.trim().to_string();
        self.time = self.time.trim().to_string();
        self.creator_id = self.creator_id.trim().to_string();
        self
    }

    /// Turn validated input into an event created at `now`.
    ///
    /// The creator is placed first in `attendees` and duplicates are
    /// dropped, keeping first-seen order. `ripple_level` starts at zero and
    /// is recomputed by the caller.
    pub fn into_event(self, now: DateTime<Utc>) -> Event {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| compute_expiry(&self.date, &self.time, now));

        let mut attendees: Vec<String> = Vec::with_capacity(self.attendees.len() + 1);
        for id in std::iter::once(self.creator_id.clone()).chain(self.attendees) {
            let id = id.trim().to_string();
            if !id.is_empty() && !attendees.contains(&id) {
                attendees.push(id);
            }
        }

        Event {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title: self.title,
            description: self.description,
            location: self.location,
            date: self.date,
            time: self.time,
            creator_id: self.creator_id,
            creator_name: self.creator_name,
            attendees,
            ripple_level: 0,
            expires_at,
            created_at: now,
        }
    }
}

/// Work out when an event stops being listed.
///
/// - blank or unparseable date: `now` + 7 days
/// - `YYYY-MM-DD` with `HH:MM` time: that moment (UTC)
/// - date without a usable time: 23:59:59 that day
pub fn compute_expiry(date: &str, time: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let fallback = now + Duration::days(DEFAULT_EVENT_LIFETIME_DAYS);

    let date = date.trim();
    if date.is_empty() {
        return fallback;
    }
    let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return fallback;
    };

    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default();
    let at = match time.trim() {
        "" => end_of_day,
        t => NaiveTime::parse_from_str(t, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
            .unwrap_or(end_of_day),
    };

    day.and_time(at).and_utc()
}
