// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trophy catalog and unlock state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Trophy rarity tier, ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn weight(self) -> u8 {
        match self {
            Rarity::Common => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }
}

/// Condition a trophy waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrophyRequirement {
    Handshakes(u32),
    GrassPoints(u64),
    Friends(usize),
    Sessions(u32),
}

/// Static catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct TrophyDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub requirement: TrophyRequirement,
}

/// The fixed trophy catalog, in display order.
pub const TROPHY_CATALOG: &[TrophyDefinition] = &[
    TrophyDefinition {
        id: "first_handshake",
        title: "First Contact",
        description: "Complete your first in-person handshake",
        rarity: Rarity::Common,
        requirement: TrophyRequirement::Handshakes(1),
    },
    TrophyDefinition {
        id: "first_friend",
        title: "New Roots",
        description: "Add your first friend",
        rarity: Rarity::Common,
        requirement: TrophyRequirement::Friends(1),
    },
    TrophyDefinition {
        id: "grass_sprout",
        title: "Grass Sprout",
        description: "Earn 100 Grass Points",
        rarity: Rarity::Common,
        requirement: TrophyRequirement::GrassPoints(100),
    },
    TrophyDefinition {
        id: "social_butterfly",
        title: "Social Butterfly",
        description: "Complete 10 handshakes",
        rarity: Rarity::Rare,
        requirement: TrophyRequirement::Handshakes(10),
    },
    TrophyDefinition {
        id: "inner_circle",
        title: "Inner Circle",
        description: "Make 5 friends",
        rarity: Rarity::Rare,
        requirement: TrophyRequirement::Friends(5),
    },
    TrophyDefinition {
        id: "regular_outdoorsman",
        title: "Regular Outdoorsman",
        description: "Complete 10 networking sessions",
        rarity: Rarity::Rare,
        requirement: TrophyRequirement::Sessions(10),
    },
    TrophyDefinition {
        id: "grass_guru",
        title: "Grass Guru",
        description: "Earn 1,000 Grass Points",
        rarity: Rarity::Epic,
        requirement: TrophyRequirement::GrassPoints(1_000),
    },
    TrophyDefinition {
        id: "village",
        title: "It Takes a Village",
        description: "Make 25 friends",
        rarity: Rarity::Epic,
        requirement: TrophyRequirement::Friends(25),
    },
    TrophyDefinition {
        id: "networking_legend",
        title: "Networking Legend",
        description: "Complete 50 handshakes",
        rarity: Rarity::Legendary,
        requirement: TrophyRequirement::Handshakes(50),
    },
];

/// Look up the catalog entry for a trophy id.
pub fn definition(id: &str) -> Option<&'static TrophyDefinition> {
    TROPHY_CATALOG.iter().find(|d| d.id == id)
}

/// A trophy with its per-user unlock state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Trophy {
    pub id: String,
    pub title: String,
    pub description: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub is_unlocked: bool,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl From<&TrophyDefinition> for Trophy {
    fn from(def: &TrophyDefinition) -> Self {
        Self {
            id: def.id.to_string(),
            title: def.title.to_string(),
            description: def.description.to_string(),
            rarity: def.rarity,
            is_unlocked: false,
            unlocked_at: None,
        }
    }
}

/// The full catalog in locked state, for a freshly onboarded profile.
pub fn locked_catalog() -> Vec<Trophy> {
    TROPHY_CATALOG.iter().map(Trophy::from).collect()
}

/// Align a persisted trophy list with the current catalog.
///
/// Unlock state of known ids is kept, catalog text and rarity are refreshed,
/// retired ids are dropped and new entries are appended locked. Output is in
/// catalog order.
pub fn sync_with_catalog(persisted: &[Trophy]) -> Vec<Trophy> {
    TROPHY_CATALOG
        .iter()
        .map(|def| {
            let mut trophy = Trophy::from(def);
            if let Some(prev) = persisted.iter().find(|t| t.id == def.id) {
                trophy.is_unlocked = prev.is_unlocked;
                trophy.unlocked_at = prev.unlocked_at;
            }
            trophy
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rarity_order_matches_weight() {
        let mut tiers = vec![Rarity::Legendary, Rarity::Common, Rarity::Epic, Rarity::Rare];
        tiers.sort();
        let weights: Vec<u8> = tiers.iter().map(|r| r.weight()).collect();
        assert_eq!(weights, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_catalog_ids_unique() {
        let ids: HashSet<&str> = TROPHY_CATALOG.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), TROPHY_CATALOG.len());
    }

    #[test]
    fn test_rarity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Rarity::Legendary).unwrap(), "\"legendary\"");
    }

    #[test]
    fn test_sync_keeps_unlocks_and_adds_missing() {
        let unlocked_at = Utc::now();
        let persisted = vec![
            Trophy {
                id: "social_butterfly".to_string(),
                title: "Old title".to_string(),
                description: String::new(),
                rarity: Rarity::Common,
                is_unlocked: true,
                unlocked_at: Some(unlocked_at),
            },
            Trophy {
                id: "retired_trophy".to_string(),
                title: "Gone".to_string(),
                description: String::new(),
                rarity: Rarity::Epic,
                is_unlocked: true,
                unlocked_at: Some(unlocked_at),
            },
        ];

        let synced = sync_with_catalog(&persisted);

        assert_eq!(synced.len(), TROPHY_CATALOG.len());
        assert!(!synced.iter().any(|t| t.id == "retired_trophy"));
        let butterfly = synced.iter().find(|t| t.id == "social_butterfly").unwrap();
        assert!(butterfly.is_unlocked);
        assert_eq!(butterfly.unlocked_at, Some(unlocked_at));
        assert_eq!(butterfly.title, "Social Butterfly");
        assert_eq!(butterfly.rarity, Rarity::Rare);
        assert_eq!(synced.iter().filter(|t| t.is_unlocked).count(), 1);
    }
}
