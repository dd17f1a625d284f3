// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The local user's profile and the inputs that create and edit it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::models::stats::NetworkingStats;
use crate::models::trophy::{locked_catalog, Trophy};

const FRIEND_CODE_LEN: usize = 6;

/// Personality type assigned by the onboarding quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum PersonalityType {
    #[serde(rename = "The Connector")]
    Connector,
    #[serde(rename = "The Explorer")]
    Explorer,
    #[serde(rename = "The Catalyst")]
    Catalyst,
    #[serde(rename = "The Anchor")]
    Anchor,
    #[serde(rename = "The Storyteller")]
    Storyteller,
    #[serde(rename = "The Observer")]
    Observer,
}

impl PersonalityType {
    pub const ALL: [PersonalityType; 6] = [
        PersonalityType::Connector,
        PersonalityType::Explorer,
        PersonalityType::Catalyst,
        PersonalityType::Anchor,
        PersonalityType::Storyteller,
        PersonalityType::Observer,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            PersonalityType::Connector => "The Connector",
            PersonalityType::Explorer => "The Explorer",
            PersonalityType::Catalyst => "The Catalyst",
            PersonalityType::Anchor => "The Anchor",
            PersonalityType::Storyteller => "The Storyteller",
            PersonalityType::Observer => "The Observer",
        }
    }
}

impl std::str::FromStr for PersonalityType {
    type Err = String;

    /// Accepts either the display name or the bare word ("connector").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = wanted.strip_prefix("the ").unwrap_or(&wanted);
        Self::ALL
            .into_iter()
            .find(|p| p.display_name()[4..].eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown personality type: {s}"))
    }
}

/// The single local user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Profile {
    /// Generated once at onboarding
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    /// Display tag (hex color)
    #[serde(default)]
    pub color: String,
    pub personality_type: PersonalityType,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub grass_points: u64,
    #[serde(default)]
    pub handshakes: u32,
    #[serde(default)]
    pub trophies: Vec<Trophy>,
    #[serde(default)]
    pub networking_stats: NetworkingStats,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Build a fresh profile from onboarding answers.
    pub fn from_onboarding(input: OnboardingProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            bio: input.bio.trim().to_string(),
            color: input.color.trim().to_string(),
            personality_type: input.personality_type,
            grass_points: 0,
            handshakes: 0,
            trophies: locked_catalog(),
            networking_stats: NetworkingStats::default(),
            created_at: now,
        }
    }

    /// Short code others type in to add this user.
    pub fn friend_code(&self) -> String {
        let chars: Vec<char> = self.id.chars().collect();
        let start = chars.len().saturating_sub(FRIEND_CODE_LEN);
        chars[start..].iter().collect::<String>().to_uppercase()
    }

    /// Apply an edit. Only the fields listed in [`ProfileUpdate`] can change.
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate { name, bio, color } = update;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(bio) = bio {
            self.bio = bio;
        }
        if let Some(color) = color {
            self.color = color;
        }
    }
}

/// Answers collected by onboarding.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProfile {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 280))]
    pub bio: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub color: String,
    pub personality_type: PersonalityType,
}

impl OnboardingProfile {
    pub fn new(name: impl Into<String>, personality_type: PersonalityType) -> Self {
        Self {
            name: name.into(),
            bio: String::new(),
            color: String::new(),
            personality_type,
        }
    }

    /// Trim text fields in place so validation sees what gets stored.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.bio = self.bio.trim().to_string();
        self.color = self.color.trim().to_string();
        self
    }
}

/// Partial profile edit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(max = 280))]
    pub bio: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub color: Option<String>,
}

impl ProfileUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.color.is_none()
    }

    /// Trim supplied values so a blank name fails the length check.
    pub fn normalized(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        Self {
            name: trim(self.name),
            bio: trim(self.bio),
            color: trim(self.color),
        }
    }
}
