//! Persistent queue state.
//!
//! Two flat files under the state directory hold everything carried between
//! runs:
//!
//! ```text
//! {state_dir}/
//! ├── config.toml    # Optional configuration
//! ├── last.txt       # Watermark: highest post id processed
//! └── tweets.txt     # Backlog: one `id%%author%%text` record per line
//! ```
//!
//! The job assumes a single writer; nothing here takes a lock.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for queue state backends.
#[async_trait]
pub trait QueueStorage: Send + Sync {
    /// Read the watermark, treating a missing or empty store as 0.
    async fn read_watermark(&self) -> Result<u64>;

    /// Overwrite the watermark.
    async fn write_watermark(&self, watermark: u64) -> Result<()>;

    /// Read the backlog in stored order, treating a missing store as empty.
    async fn read_backlog(&self) -> Result<Vec<String>>;

    /// Overwrite the backlog with the given records.
    async fn write_backlog(&self, records: &[String]) -> Result<()>;
}

/// Parse a watermark the way a loose integer cast would: leading digits only.
///
/// Values too large for a `u64` saturate at `u64::MAX`.
pub fn parse_watermark(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..digits_end];
    if digits.is_empty() {
        return None;
    }

    Some(digits.parse().unwrap_or_else(|_| {
        log::warn!("Watermark {} overflows u64, saturating", digits);
        u64::MAX
    }))
}
