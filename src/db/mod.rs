//! Persistence layer: async key/value storage behind a trait.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Event, Friend, Profile};

/// Storage keys as constants.
pub mod keys {
    /// Combined profile/friends/events blob
    pub const STATE: &str = "state";
}

/// Current layout version of the [`PersistedState`] blob.
pub const STATE_VERSION: u32 = 1;

/// Durable key/value storage. Knows nothing about what the bytes mean.
///
/// Failures are reported as [`AppError::Persistence`]; there is no retry
/// at this layer.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value under `key`, `None` if it was never written.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Durably replace the value under `key`.
    async fn save(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove every key.
    async fn clear(&self) -> Result<()>;
}

/// Everything the store writes, as one blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub friends: Vec<Friend>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl PersistedState {
    /// True when nothing has been created yet.
    pub fn is_empty(&self) -> bool {
        self.profile.is_none() && self.friends.is_empty() && self.events.is_empty()
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode state: {}", e)))
    }

    pub fn decode(bytes: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
