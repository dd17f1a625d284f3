// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed storage: one JSON file per key under a data directory.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::db::Storage;
use crate::error::{AppError, Result};

const EXTENSION: &str = "json";

/// Storage rooted at a directory. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(AppError::Persistence(format!("Invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Write to a temp file and rename it over the old one, so a crash
    /// mid-write leaves the previous value intact.
    async fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Persistence(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let write = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(value).await?;
            file.sync_all().await?;
            fs::rename(&tmp, &path).await
        };
        if let Err(e) = write.await {
            let _ = fs::remove_file(&tmp).await;
            return Err(AppError::Persistence(format!(
                "Failed to write {}: {}",
                path.display(),
                e
            )));
        }

        tracing::debug!(key, bytes = value.len(), "Saved blob");
        Ok(())
    }

    /// Remove every `*.json` file this storage owns, plus temp files left
    /// by an interrupted save. A missing directory is already clear.
    async fn clear(&self) -> Result<()> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(AppError::Persistence(format!(
                    "Failed to read {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        };

        let mut removed = 0usize;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to read entry: {}", e)))?
        {
            let path = entry.path();
            if !is_owned_file(&path) {
                continue;
            }
            fs::remove_file(&path).await.map_err(|e| {
                AppError::Persistence(format!("Failed to remove {}: {}", path.display(), e))
            })?;
            removed += 1;
        }

        tracing::debug!(dir = %self.dir.display(), removed, "Cleared storage");
        Ok(())
    }
}

/// Blob files and their in-flight temp copies.
fn is_owned_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(&format!(".{EXTENSION}")) || name.ends_with(&format!(".{EXTENSION}.tmp"))
}
