//! Friend model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::models::profile::PersonalityType;

/// A connection the profile has made. Never mutated after it is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Friend {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    pub personality_type: PersonalityType,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub bio: String,
    pub connected_at: DateTime<Utc>,
    /// Ids of people this friend is connected to (friend-of-friend edges)
    #[serde(default)]
    pub connections: Vec<String>,
}

impl Friend {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        personality_type: PersonalityType,
        connected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            personality_type,
            color: String::new(),
            bio: String::new(),
            connected_at,
            connections: Vec::new(),
        }
    }

    /// Builder-style helper to declare a known friend-of-friend edge.
    pub fn connected_to(mut self, other_id: impl Into<String>) -> Self {
        self.connections.push(other_id.into());
        self
    }

    /// Trim id and name so whitespace-only values fail validation.
    pub fn normalized(mut self) -> Self {
        self.id = self.id.trim().to_string();
        self.name = self.name.trim().to_string();
        self.connections = self
            .connections
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_id_fails_validation() {
        let friend = Friend::new("  ", "Sam", PersonalityType::Anchor, Utc::now()).normalized();
        assert!(friend.validate().is_err());
    }

    #[test]
    fn test_connections_default_when_absent() {
        let json = r#"{
            "id": "f1",
            "name": "Sam",
            "personalityType": "The Connector",
            "connectedAt": "2026-10-01T10:00:00Z"
        }"#;
        let friend: Friend = serde_json::from_str(json).unwrap();
        assert!(friend.connections.is_empty());
        assert_eq!(friend.bio, "");
    }
}
