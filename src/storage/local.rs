//! Local filesystem storage implementation.
//!
//! Writes go to a sibling temp file first and are renamed into place, so an
//! interrupted run leaves the previous state intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::StorageConfig;
use crate::storage::{QueueStorage, parse_watermark};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    watermark_file: String,
    backlog_file: String,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, files: &StorageConfig) -> Self {
        Self {
            root_dir: root_dir.into(),
            watermark_file: files.watermark_file.clone(),
            backlog_file: files.backlog_file.clone(),
        }
    }

    /// Root directory holding the state files.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read a file as text, returning None if it doesn't exist.
    async fn read_text(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl QueueStorage for LocalStorage {
    async fn read_watermark(&self) -> Result<u64> {
        let Some(raw) = self.read_text(&self.watermark_file).await? else {
            log::debug!("No {} found, starting from 0", self.watermark_file);
            return Ok(0);
        };

        if raw.trim().is_empty() {
            return Ok(0);
        }

        Ok(parse_watermark(&raw).unwrap_or_else(|| {
            log::warn!(
                "Unreadable watermark {:?} in {}, treating as 0",
                raw.trim(),
                self.watermark_file
            );
            0
        }))
    }

    async fn write_watermark(&self, watermark: u64) -> Result<()> {
        self.write_bytes(&self.watermark_file, watermark.to_string().as_bytes())
            .await
    }

    async fn read_backlog(&self) -> Result<Vec<String>> {
        let Some(raw) = self.read_text(&self.backlog_file).await? else {
            log::debug!("No {} found, backlog is empty", self.backlog_file);
            return Ok(Vec::new());
        };

        // Split on '\n' only; a trailing '\r' belongs to the record.
        Ok(raw
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn write_backlog(&self, records: &[String]) -> Result<()> {
        self.write_bytes(&self.backlog_file, records.join("\n").as_bytes())
            .await
    }
}
