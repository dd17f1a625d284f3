//! Networking statistics embedded in the profile.
//!
//! The headline numbers (`totalTimeThisWeek`, `topLocations`, ...) are
//! derived from the session history and location tally, and are recomputed
//! whenever the underlying facts change rather than patched in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::{same_iso_week, same_month};

/// One completed networking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionRecord {
    pub started_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration_seconds: u64,
}

impl SessionRecord {
    /// Whole minutes credited for this session.
    pub fn minutes(&self) -> u64 {
        self.duration_seconds / 60
    }
}

/// Visit tally for one named place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LocationStats {
    pub name: String,
    pub visits: u32,
    pub connections_count: u32,
}

/// Networking statistics for the profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NetworkingStats {
    // ─── Derived ─────────────────────────────────────────────────
    #[serde(default)]
    pub average_friends_per_day: f64,
    /// Minutes networked during the current ISO week
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_time_this_week: u64,
    /// Minutes networked during the current calendar month
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_time_this_month: u64,
    #[serde(default)]
    pub top_locations: Vec<LocationStats>,
    #[serde(default)]
    pub sessions_completed: u32,

    // ─── History ─────────────────────────────────────────────────
    #[serde(default)]
    pub session_history: Vec<SessionRecord>,
    /// Every place ever visited, unranked
    #[serde(default)]
    pub location_visits: Vec<LocationStats>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NetworkingStats {
    /// Append a finished session to the history.
    pub fn record_session(&mut self, started_at: DateTime<Utc>, duration_seconds: u64) {
        self.session_history.push(SessionRecord {
            started_at,
            duration_seconds,
        });
        self.sessions_completed = self.sessions_completed.saturating_add(1);
    }

    /// Tally a visit to `name` with the number of connections made there.
    pub fn record_location_visit(&mut self, name: &str, connections: u32) {
        match self.location_visits.iter_mut().find(|l| l.name == name) {
            Some(entry) => {
                entry.visits = entry.visits.saturating_add(1);
                entry.connections_count = entry.connections_count.saturating_add(connections);
            }
            None => self.location_visits.push(LocationStats {
                name: name.to_string(),
                visits: 1,
                connections_count: connections,
            }),
        }
    }

    /// Recompute every derived field from history as of `now`.
    pub fn recompute(
        &mut self,
        now: DateTime<Utc>,
        friend_count: usize,
        profile_created_at: DateTime<Utc>,
        top_n: usize,
    ) {
        self.total_time_this_week = self
            .session_history
            .iter()
            .filter(|s| same_iso_week(s.started_at, now))
            .map(SessionRecord::minutes)
            .sum();
        self.total_time_this_month = self
            .session_history
            .iter()
            .filter(|s| same_month(s.started_at, now))
            .map(SessionRecord::minutes)
            .sum();
        self.average_friends_per_day = average_friends_per_day(friend_count, profile_created_at, now);
        self.top_locations = rank_locations(&self.location_visits, top_n);
        self.updated_at = Some(now);
    }
}

/// Friends per elapsed day, counting day one as a full day.
pub fn average_friends_per_day(
    friend_count: usize,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    let days = (now - created_at).num_days().max(1);
    friend_count as f64 / days as f64
}

/// Rank locations by visits, then connections, then name; keep the top `n`.
pub fn rank_locations(locations: &[LocationStats], n: usize) -> Vec<LocationStats> {
    let mut ranked = locations.to_vec();
    ranked.sort_by(|a, b| {
        b.visits
            .cmp(&a.visits)
            .then_with(|| b.connections_count.cmp(&a.connections_count))
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn loc(name: &str, visits: u32, connections: u32) -> LocationStats {
        LocationStats {
            name: name.to_string(),
            visits,
            connections_count: connections,
        }
    }

    #[test]
    fn test_week_and_month_buckets_exclude_older_sessions() {
        // Thursday 2026-10-15
        let now = at(2026, 10, 15, 18);
        let mut stats = NetworkingStats::default();
        stats.record_session(at(2026, 10, 13, 9), 45 * 60); // this week
        stats.record_session(at(2026, 10, 2, 9), 30 * 60); // this month, earlier week
        stats.record_session(at(2026, 9, 30, 9), 60 * 60); // last month

        stats.recompute(now, 0, at(2026, 9, 1, 0), 5);

        assert_eq!(stats.total_time_this_week, 45);
        assert_eq!(stats.total_time_this_month, 75);
        assert_eq!(stats.sessions_completed, 3);
        assert_eq!(stats.session_history.len(), 3); // history kept
    }

    #[test]
    fn test_minutes_floor_per_session() {
        let now = at(2026, 10, 15, 18);
        let mut stats = NetworkingStats::default();
        stats.record_session(now, 119);
        stats.record_session(now, 59);

        stats.recompute(now, 0, now, 5);

        assert_eq!(stats.total_time_this_week, 1);
    }

    #[test]
    fn test_average_friends_per_day_minimum_divisor() {
        let created = at(2026, 10, 15, 8);
        assert_eq!(average_friends_per_day(3, created, created + Duration::hours(5)), 3.0);
        assert_eq!(average_friends_per_day(6, created, created + Duration::days(4)), 1.5);
        // Clock behind the profile creation still divides by one
        assert_eq!(average_friends_per_day(2, created, created - Duration::days(2)), 2.0);
    }

    #[test]
    fn test_rank_locations_tie_breaks() {
        let ranked = rank_locations(
            &[
                loc("Coffee District", 3, 1),
                loc("Central Park", 5, 0),
                loc("Downtown Plaza", 3, 4),
                loc("Beach Boardwalk", 3, 4),
            ],
            3,
        );
        let names: Vec<&str> = ranked.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Central Park", "Beach Boardwalk", "Downtown Plaza"]);
    }

    #[test]
    fn test_record_location_visit_accumulates() {
        let mut stats = NetworkingStats::default();
        stats.record_location_visit("Central Park", 2);
        stats.record_location_visit("Central Park", 1);
        stats.record_location_visit("Coffee District", 0);

        assert_eq!(stats.location_visits.len(), 2);
        assert_eq!(stats.location_visits[0], loc("Central Park", 2, 3));
    }

    #[test]
    fn test_missing_fields_deserialize_to_default() {
        let stats: NetworkingStats = serde_json::from_str(r#"{"sessionsCompleted": 4}"#).unwrap();
        assert_eq!(stats.sessions_completed, 4);
        assert!(stats.session_history.is_empty());
        assert_eq!(stats.total_time_this_week, 0);
    }
}
