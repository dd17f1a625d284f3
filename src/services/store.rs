// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The domain store: single source of truth for profile, friends, events
//! and the networking session.
//!
//! Every mutation follows the same path:
//! 1. Lock the state (mutations queue behind each other, load included)
//! 2. Apply the change to a copy
//! 3. Recompute derived values (ripple levels, stats, trophies)
//! 4. Write the copy through to storage
//! 5. Swap it in and publish a snapshot to subscribers
//!
//! If the write fails nothing is swapped in, so memory and storage never
//! disagree.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, MutexGuard};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::config::{Config, StorageBackend, DEFAULT_TOP_LOCATIONS};
use crate::db::{keys, FileStorage, MemoryStorage, PersistedState, Storage, STATE_VERSION};
use crate::error::{AppError, Result};
use crate::models::trophy::sync_with_catalog;
use crate::models::{
    Event, Friend, NetworkingSession, NewEvent, OnboardingProfile, Profile, ProfileUpdate,
};
use crate::services::hotspots::grass_point_multiplier;
use crate::services::ripple::{recompute_ripple_levels, FriendGraph};
use crate::services::trophies::{evaluate_trophies, TrophyProgress};
use crate::time_utils::{Clock, SystemClock};

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StoreSnapshot {
    pub profile: Option<Profile>,
    pub friends: Vec<Friend>,
    pub events: Vec<Event>,
    pub is_networking_mode: bool,
    pub session: NetworkingSession,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    data: PersistedState,
    session: NetworkingSession,
}

impl StoreState {
    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            profile: self.data.profile.clone(),
            friends: self.data.friends.clone(),
            events: self.data.events.clone(),
            is_networking_mode: self.session.is_active,
            session: self.session.clone(),
        }
    }

    fn profile_mut(&mut self) -> Result<&mut Profile> {
        self.data
            .profile
            .as_mut()
            .ok_or_else(|| AppError::NotFound("No profile yet; complete onboarding first".to_string()))
    }
}

/// Persisted domain store. Share it behind an `Arc`.
pub struct DomainStore {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    top_locations_limit: usize,
    state: Mutex<StoreState>,
    snapshot_tx: watch::Sender<StoreSnapshot>,
}

impl DomainStore {
    /// Create an empty store over `storage`. Call [`DomainStore::load`]
    /// before use to pick up persisted state.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (snapshot_tx, _) = watch::channel(StoreSnapshot::default());
        Self {
            storage,
            clock: Arc::new(SystemClock),
            top_locations_limit: DEFAULT_TOP_LOCATIONS,
            state: Mutex::new(StoreState::default()),
            snapshot_tx,
        }
    }

    /// Create a store with the backend and limits named in `config`.
    pub fn from_config(config: &Config) -> Self {
        let storage: Arc<dyn Storage> = match config.storage {
            StorageBackend::File => Arc::new(FileStorage::new(config.data_dir.clone())),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        Self::new(storage).with_top_locations_limit(config.top_locations_limit)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_top_locations_limit(mut self, limit: usize) -> Self {
        self.top_locations_limit = limit.max(1);
        self
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// Latest committed state. Does not wait on in-flight mutations.
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut snapshot = self.snapshot_tx.borrow().clone();
        snapshot.session.tick(self.clock.now());
        snapshot
    }

    /// Receive a fresh snapshot after every committed change.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Events that have not yet expired, in creation order.
    pub fn active_events(&self) -> Vec<Event> {
        let now = self.clock.now();
        self.snapshot_tx
            .borrow()
            .events
            .iter()
            .filter(|e| e.is_active(now))
            .cloned()
            .collect()
    }

    // ─── Lifecycle ───────────────────────────────────────────────

    /// Load persisted state, replacing what is in memory.
    ///
    /// Never fails: missing, unreadable or corrupt data yields the empty
    /// default so the caller can route to onboarding. A read error while
    /// state is already loaded leaves that state in place.
    pub async fn load(&self) -> StoreSnapshot {
        let mut guard = self.state.lock().await;
        let now = self.clock.now();

        let mut data = match self.storage.load(keys::STATE).await {
            Ok(Some(bytes)) => match PersistedState::decode(&bytes) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(error = %e, bytes = bytes.len(), "Corrupt state blob, starting empty");
                    PersistedState::default()
                }
            },
            Ok(None) => {
                tracing::debug!("No persisted state, starting empty");
                PersistedState::default()
            }
            Err(e) if guard.data.is_empty() => {
                tracing::warn!(error = %e, "Failed to read state, starting empty");
                PersistedState::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read state, keeping what is loaded");
                return guard.snapshot();
            }
        };

        if data.version > STATE_VERSION {
            tracing::warn!(
                version = data.version,
                supported = STATE_VERSION,
                "State written by a newer version"
            );
        }
        if let Some(profile) = data.profile.as_mut() {
            profile.trophies = sync_with_catalog(&profile.trophies);
        }
        recompute_derived(&mut data, now, self.top_locations_limit, false);

        let same_profile = match (&data.profile, &guard.data.profile) {
            (Some(next), Some(prev)) => next.id == prev.id,
            _ => false,
        };
        let session = if same_profile {
            guard.session.clone()
        } else {
            NetworkingSession::default()
        };
        *guard = StoreState { data, session };

        tracing::info!(
            has_profile = guard.data.profile.is_some(),
            friends = guard.data.friends.len(),
            events = guard.data.events.len(),
            "State loaded"
        );
        self.publish(&guard);
        guard.snapshot()
    }

    /// Re-read storage, e.g. after another component changed it.
    pub async fn reload(&self) -> StoreSnapshot {
        self.load().await
    }

    /// Wipe storage and memory. Irreversible.
    pub async fn reset(&self) -> Result<()> {
        let mut guard = self.state.lock().await;
        self.storage.clear().await?;
        *guard = StoreState::default();
        tracing::info!("Store reset");
        self.publish(&guard);
        Ok(())
    }

    // ─── Profile ─────────────────────────────────────────────────

    /// Create the profile from onboarding answers.
    pub async fn complete_onboarding(&self, input: OnboardingProfile) -> Result<Profile> {
        let input = input.normalized();
        input.validate()?;

        let mut guard = self.state.lock().await;
        if guard.data.profile.is_some() {
            return Err(AppError::Validation("Onboarding already completed".to_string()));
        }

        let now = self.clock.now();
        let mut next = guard.clone();
        next.data.profile = Some(Profile::from_onboarding(input, now));
        self.refresh(&mut next, now);

        let profile = next.data.profile.clone().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Profile vanished during onboarding"))
        })?;
        self.commit(&mut guard, next).await?;

        tracing::info!(profile_id = %profile.id, personality = profile.personality_type.display_name(), "Onboarding complete");
        Ok(profile)
    }

    /// Merge an edit into the profile.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile> {
        let mut guard = self.state.lock().await;
        if guard.data.profile.is_none() {
            return Err(AppError::NotFound("Cannot update profile before onboarding".to_string()));
        }

        let update = update.normalized();
        update.validate()?;

        let mut next = guard.clone();
        let profile = next.profile_mut()?;
        if update.is_empty() {
            tracing::debug!("Empty profile update (no-op)");
            return Ok(profile.clone());
        }
        profile.apply(update);
        let profile = profile.clone();

        self.commit(&mut guard, next).await?;
        tracing::info!(profile_id = %profile.id, "Profile updated");
        Ok(profile)
    }

    // ─── Friends & Events ────────────────────────────────────────

    /// Append a friend. Ids must be unique.
    pub async fn add_friend(&self, friend: Friend) -> Result<()> {
        let friend = friend.normalized();
        friend.validate()?;

        let mut guard = self.state.lock().await;
        if guard.data.friends.iter().any(|f| f.id == friend.id) {
            return Err(AppError::Validation(format!(
                "Friend {} already exists",
                friend.id
            )));
        }
        if guard
            .data
            .profile
            .as_ref()
            .is_some_and(|p| p.id == friend.id)
        {
            return Err(AppError::Validation("Cannot add yourself as a friend".to_string()));
        }

        let now = self.clock.now();
        let friend_id = friend.id.clone();
        let mut next = guard.clone();
        next.data.friends.push(friend);
        self.refresh(&mut next, now);
        let count = next.data.friends.len();

        self.commit(&mut guard, next).await?;
        tracing::info!(friend_id = %friend_id, friends = count, "Friend added");
        Ok(())
    }

    /// Create an event. Returns it with attendees and ripple level settled.
    pub async fn add_event(&self, input: NewEvent) -> Result<Event> {
        let input = input.normalized();
        input.validate()?;

        let mut guard = self.state.lock().await;
        if let Some(id) = &input.id {
            if guard.data.events.iter().any(|e| &e.id == id) {
                return Err(AppError::Validation(format!("Event {} already exists", id)));
            }
        }

        let now = self.clock.now();
        let event = input.into_event(now);
        if event.expires_at < event.created_at {
            return Err(AppError::Validation(format!(
                "Event would expire before it is created ({})",
                crate::time_utils::format_utc_rfc3339(event.expires_at)
            )));
        }

        let event_id = event.id.clone();
        let mut next = guard.clone();
        next.data.events.push(event);
        self.refresh(&mut next, now);
        let event = find_event(&next, &event_id)?.clone();

        self.commit(&mut guard, next).await?;
        tracing::info!(
            event_id = %event.id,
            attendees = event.attendees.len(),
            ripple_level = event.ripple_level,
            "Event created"
        );
        Ok(event)
    }

    /// Add an attendee to an event and recompute its ripple level.
    ///
    /// RSVPing twice is a no-op.
    pub async fn rsvp_event(&self, event_id: &str, attendee_id: &str) -> Result<Event> {
        let attendee_id = attendee_id.trim();
        if attendee_id.is_empty() {
            return Err(AppError::Validation("Attendee id is required".to_string()));
        }

        let mut guard = self.state.lock().await;
        let now = self.clock.now();
        let current = find_event(&guard, event_id)?;
        if current.has_attendee(attendee_id) {
            tracing::debug!(event_id, attendee_id, "Already attending (no-op)");
            return Ok(current.clone());
        }
        if !current.is_active(now) {
            return Err(AppError::Validation(format!("Event {} has expired", event_id)));
        }

        let mut next = guard.clone();
        if let Some(event) = next.data.events.iter_mut().find(|e| e.id == event_id) {
            event.attendees.push(attendee_id.to_string());
        }
        self.refresh(&mut next, now);
        let event = find_event(&next, event_id)?.clone();

        self.commit(&mut guard, next).await?;
        tracing::info!(
            event_id,
            attendee_id,
            ripple_level = event.ripple_level,
            "RSVP recorded"
        );
        Ok(event)
    }

    // ─── Networking Mode ─────────────────────────────────────────

    /// Flip networking mode. Returns the new state.
    pub async fn toggle_networking_mode(&self) -> Result<bool> {
        let mut guard = self.state.lock().await;
        let target = !guard.session.is_active;
        self.apply_networking_mode(&mut guard, target).await
    }

    /// Turn networking mode on or off. Asking for the current state does
    /// nothing, so a stray "off" never records a session.
    pub async fn set_networking_mode(&self, active: bool) -> Result<bool> {
        let mut guard = self.state.lock().await;
        self.apply_networking_mode(&mut guard, active).await
    }

    async fn apply_networking_mode(
        &self,
        guard: &mut MutexGuard<'_, StoreState>,
        active: bool,
    ) -> Result<bool> {
        if guard.data.profile.is_none() {
            return Err(AppError::NotFound(
                "Networking mode requires a profile".to_string(),
            ));
        }
        if guard.session.is_active == active {
            tracing::debug!(active, "Networking mode unchanged (no-op)");
            return Ok(active);
        }

        let now = self.clock.now();
        let mut next = (**guard).clone();

        if active {
            // The session itself is not persisted; nothing to write yet.
            next.session = NetworkingSession::start(now);
            **guard = next;
            tracing::info!("Networking mode on");
            self.publish(guard);
            return Ok(true);
        }

        let elapsed = next.session.elapsed_at(now);
        let started_at = next.session.started_at.unwrap_or(now);
        next.profile_mut()?
            .networking_stats
            .record_session(started_at, elapsed);
        next.session = NetworkingSession::default();
        self.refresh(&mut next, now);

        self.commit(guard, next).await?;
        tracing::info!(elapsed_seconds = elapsed, "Networking mode off, session recorded");
        Ok(false)
    }

    // ─── Rewards ─────────────────────────────────────────────────

    /// Add grass points. Returns the new total.
    pub async fn award_grass_points(&self, amount: u64) -> Result<u64> {
        self.award(amount, None).await
    }

    /// Add grass points earned at a place; social hotspots multiply them.
    pub async fn award_grass_points_at(&self, amount: u64, location: &str) -> Result<u64> {
        self.award(amount, Some(location)).await
    }

    async fn award(&self, amount: u64, location: Option<&str>) -> Result<u64> {
        if amount == 0 {
            return Err(AppError::Validation("Amount must be positive".to_string()));
        }
        let multiplier = location.map_or(1, grass_point_multiplier);
        let points = amount
            .checked_mul(multiplier)
            .ok_or_else(|| AppError::Validation("Amount too large".to_string()))?;

        let mut guard = self.state.lock().await;
        let now = self.clock.now();
        let mut next = guard.clone();
        let profile = next.profile_mut()?;
        profile.grass_points = profile
            .grass_points
            .checked_add(points)
            .ok_or_else(|| AppError::Validation("Grass points would overflow".to_string()))?;
        let total = profile.grass_points;
        self.refresh(&mut next, now);

        self.commit(&mut guard, next).await?;
        tracing::info!(points, multiplier, total, "Grass points awarded");
        Ok(total)
    }

    /// Count a completed handshake. Returns the new count.
    pub async fn record_handshake(&self) -> Result<u32> {
        let mut guard = self.state.lock().await;
        let now = self.clock.now();
        let mut next = guard.clone();
        let profile = next.profile_mut()?;
        profile.handshakes = profile
            .handshakes
            .checked_add(1)
            .ok_or_else(|| AppError::Validation("Handshake count would overflow".to_string()))?;
        let handshakes = profile.handshakes;
        self.refresh(&mut next, now);

        self.commit(&mut guard, next).await?;
        tracing::info!(handshakes, "Handshake recorded");
        Ok(handshakes)
    }

    /// Tally a visit to a place and the connections made there.
    pub async fn record_location_visit(&self, location: &str, connections: u32) -> Result<()> {
        let location = location.trim();
        if location.is_empty() {
            return Err(AppError::Validation("Location name is required".to_string()));
        }

        let mut guard = self.state.lock().await;
        let now = self.clock.now();
        let mut next = guard.clone();
        next.profile_mut()?
            .networking_stats
            .record_location_visit(location, connections);
        self.refresh(&mut next, now);

        self.commit(&mut guard, next).await?;
        tracing::info!(location, connections, "Location visit recorded");
        Ok(())
    }

    // ─── Internals ───────────────────────────────────────────────

    fn refresh(&self, state: &mut StoreState, now: DateTime<Utc>) {
        let unlocked = recompute_derived(&mut state.data, now, self.top_locations_limit, true);
        if !unlocked.is_empty() {
            tracing::info!(trophies = ?unlocked, "Trophies unlocked");
        }
    }

    /// Write `next` through to storage, then make it current.
    async fn commit(&self, guard: &mut MutexGuard<'_, StoreState>, mut next: StoreState) -> Result<()> {
        next.data.version = STATE_VERSION;
        let bytes = next.data.encode()?;
        if let Err(e) = self.storage.save(keys::STATE, &bytes).await {
            tracing::warn!(error = %e, "Persisting state failed, change discarded");
            return Err(e);
        }
        **guard = next;
        self.publish(guard);
        Ok(())
    }

    fn publish(&self, state: &StoreState) {
        self.snapshot_tx.send_replace(state.snapshot());
    }
}

fn find_event<'a>(state: &'a StoreState, event_id: &str) -> Result<&'a Event> {
    state
        .data
        .events
        .iter()
        .find(|e| e.id == event_id)
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
}

/// Recompute everything derived from primary facts.
///
/// Ripple levels and networking stats are always rebuilt. Trophies are only
/// evaluated when `with_trophies` is set; returns the ids it unlocked.
pub fn recompute_derived(
    data: &mut PersistedState,
    now: DateTime<Utc>,
    top_locations_limit: usize,
    with_trophies: bool,
) -> Vec<String> {
    let graph = FriendGraph::build(data.profile.as_ref().map(|p| p.id.as_str()), &data.friends);
    recompute_ripple_levels(&graph, &mut data.events);

    let friend_count = data.friends.len();
    let Some(profile) = data.profile.as_mut() else {
        return Vec::new();
    };
    profile.networking_stats.recompute(
        now,
        friend_count,
        profile.created_at,
        top_locations_limit,
    );

    if !with_trophies {
        return Vec::new();
    }
    let progress = TrophyProgress {
        handshakes: profile.handshakes,
        grass_points: profile.grass_points,
        friends: friend_count,
        sessions: profile.networking_stats.sessions_completed,
    };
    evaluate_trophies(&mut profile.trophies, &progress, now)
}
