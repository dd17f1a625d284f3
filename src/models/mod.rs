// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod event;
pub mod friend;
pub mod profile;
pub mod session;
pub mod stats;
pub mod trophy;

pub use event::{Event, NewEvent};
pub use friend::Friend;
pub use profile::{OnboardingProfile, PersonalityType, Profile, ProfileUpdate};
pub use session::NetworkingSession;
pub use stats::{LocationStats, NetworkingStats, SessionRecord};
pub use trophy::{Rarity, Trophy, TrophyRequirement};
