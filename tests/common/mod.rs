// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use touch_grass::db::MemoryStorage;
use touch_grass::models::{Friend, OnboardingProfile, PersonalityType, Profile};
use touch_grass::time_utils::ManualClock;
use touch_grass::DomainStore;

/// Thursday mid-morning, so week/month buckets have room on both sides.
#[allow(dead_code)]
pub fn test_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 10, 0, 0).unwrap()
}

/// Handles to a store and the fakes behind it.
#[allow(dead_code)]
pub struct TestStore {
    pub store: Arc<DomainStore>,
    pub storage: MemoryStorage,
    pub clock: Arc<ManualClock>,
}

/// Create a loaded store over in-memory storage and a manual clock.
#[allow(dead_code)]
pub async fn test_store() -> TestStore {
    test_store_with(MemoryStorage::new()).await
}

/// Same as [`test_store`] but over existing storage (to simulate restarts).
#[allow(dead_code)]
pub async fn test_store_with(storage: MemoryStorage) -> TestStore {
    let clock = Arc::new(ManualClock::new(test_start()));
    let store = DomainStore::new(Arc::new(storage.clone())).with_clock(clock.clone());
    store.load().await;
    TestStore {
        store: Arc::new(store),
        storage,
        clock,
    }
}

/// Create a store that already has a profile.
#[allow(dead_code)]
pub async fn onboarded_store() -> (TestStore, Profile) {
    let t = test_store().await;
    let profile = t
        .store
        .complete_onboarding(OnboardingProfile::new("Robin", PersonalityType::Connector))
        .await
        .expect("Onboarding should succeed");
    (t, profile)
}

#[allow(dead_code)]
pub fn friend(id: &str) -> Friend {
    Friend::new(id, format!("Friend {id}"), PersonalityType::Explorer, test_start())
}
