//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local use.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default number of ranked locations kept in `topLocations`.
pub const DEFAULT_TOP_LOCATIONS: usize = 5;

/// Which persistence backend the store writes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per key under `data_dir`.
    File,
    /// Process memory only; nothing survives a restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid {
                name: "TOUCH_GRASS_STORAGE",
                value: other.to_string(),
            }),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted state blobs
    pub data_dir: PathBuf,
    /// Persistence backend
    pub storage: StorageBackend,
    /// How many locations `topLocations` keeps
    pub top_locations_limit: usize,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            storage: StorageBackend::Memory,
            top_locations_limit: DEFAULT_TOP_LOCATIONS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let top_locations_limit = match env::var("TOUCH_GRASS_TOP_LOCATIONS") {
            Ok(raw) => parse_limit(&raw)?,
            Err(_) => DEFAULT_TOP_LOCATIONS,
        };

        Ok(Self {
            data_dir: env::var("TOUCH_GRASS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            storage: env::var("TOUCH_GRASS_STORAGE")
                .unwrap_or_else(|_| "file".to_string())
                .parse()?,
            top_locations_limit,
        })
    }
}

fn parse_limit(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            name: "TOUCH_GRASS_TOP_LOCATIONS",
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
