// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::Duration;
use touch_grass::error::AppError;
use touch_grass::models::{OnboardingProfile, PersonalityType};

mod common;
use common::{onboarded_store, test_start, test_store, test_store_with};

#[tokio::test]
async fn test_session_adds_whole_minutes() {
    let (t, _) = onboarded_store().await;

    assert!(t.store.toggle_networking_mode().await.unwrap());
    assert!(t.store.snapshot().is_networking_mode);

    t.clock.advance(Duration::seconds(125));
    assert_eq!(t.store.snapshot().session.elapsed_seconds, 125);

    assert!(!t.store.toggle_networking_mode().await.unwrap());

    let snapshot = t.store.snapshot();
    assert!(!snapshot.is_networking_mode);
    assert_eq!(snapshot.session.elapsed_seconds, 0);

    let stats = snapshot.profile.unwrap().networking_stats;
    assert_eq!(stats.total_time_this_week, 2);
    assert_eq!(stats.total_time_this_month, 2);
    assert_eq!(stats.sessions_completed, 1);
    assert_eq!(stats.session_history.len(), 1);
    assert_eq!(stats.session_history[0].started_at, test_start());
}

#[tokio::test]
async fn test_turning_off_when_already_off_records_nothing() {
    let (t, _) = onboarded_store().await;

    assert!(!t.store.set_networking_mode(false).await.unwrap());

    let stats = t.store.snapshot().profile.unwrap().networking_stats;
    assert_eq!(stats.sessions_completed, 0);
    assert_eq!(stats.total_time_this_week, 0);
}

#[tokio::test]
async fn test_turning_on_twice_keeps_first_start() {
    let (t, _) = onboarded_store().await;

    t.store.set_networking_mode(true).await.unwrap();
    t.clock.advance(Duration::minutes(3));
    t.store.set_networking_mode(true).await.unwrap();

    assert_eq!(t.store.snapshot().session.started_at, Some(test_start()));
}

#[tokio::test]
async fn test_short_session_counts_but_adds_no_minutes() {
    let (t, _) = onboarded_store().await;

    t.store.toggle_networking_mode().await.unwrap();
    t.clock.advance(Duration::seconds(59));
    t.store.toggle_networking_mode().await.unwrap();

    let stats = t.store.snapshot().profile.unwrap().networking_stats;
    assert_eq!(stats.sessions_completed, 1);
    assert_eq!(stats.total_time_this_week, 0);
}

#[tokio::test]
async fn test_week_total_rolls_over_but_month_keeps_it() {
    let (t, _) = onboarded_store().await;

    t.store.toggle_networking_mode().await.unwrap();
    t.clock.advance(Duration::minutes(10));
    t.store.toggle_networking_mode().await.unwrap();

    // Thursday 15th -> Thursday 22nd: new ISO week, same month
    t.clock.advance(Duration::days(7));
    t.store.record_handshake().await.unwrap();

    let stats = t.store.snapshot().profile.unwrap().networking_stats;
    assert_eq!(stats.total_time_this_week, 0);
    assert_eq!(stats.total_time_this_month, 10);
    assert_eq!(stats.sessions_completed, 1);
}

#[tokio::test]
async fn test_networking_mode_requires_profile() {
    let t = test_store().await;

    let err = t.store.toggle_networking_mode().await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
    assert!(!t.store.snapshot().is_networking_mode);
}

#[tokio::test]
async fn test_session_survives_reload_but_not_reset() {
    let (t, _) = onboarded_store().await;

    t.store.toggle_networking_mode().await.unwrap();
    t.store.reload().await;
    assert!(t.store.snapshot().is_networking_mode);

    t.store.reset().await.unwrap();
    assert!(!t.store.snapshot().is_networking_mode);
}

#[tokio::test]
async fn test_session_dropped_when_reload_brings_a_different_profile() {
    let (t, _) = onboarded_store().await;
    t.store.toggle_networking_mode().await.unwrap();

    // Another handle wipes storage and onboards someone new
    let other = test_store_with(t.storage.clone()).await;
    other.store.reset().await.unwrap();
    let newcomer = other
        .store
        .complete_onboarding(OnboardingProfile::new("Sam", PersonalityType::Observer))
        .await
        .unwrap();

    t.clock.advance(Duration::minutes(30));
    let snapshot = t.store.reload().await;
    assert_eq!(snapshot.profile.as_ref().map(|p| p.id.as_str()), Some(newcomer.id.as_str()));
    assert!(!snapshot.is_networking_mode);

    // The next toggle starts a fresh session instead of closing the old one
    assert!(t.store.toggle_networking_mode().await.unwrap());
    let stats = t.store.snapshot().profile.unwrap().networking_stats;
    assert_eq!(stats.sessions_completed, 0);
    assert_eq!(stats.total_time_this_week, 0);
}
