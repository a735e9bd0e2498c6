// src/pipeline/merge.rs

//! Merging fetched posts into the backlog.

use crate::models::{Post, QueueMode};

/// Candidate list and advanced watermark produced by one merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    /// Backlog plus newly qualifying records, in emission order
    pub candidates: Vec<String>,

    /// max(previous watermark, highest fetched id)
    pub watermark: u64,
}

/// Serialize the fetched posts whose id is above the watermark.
pub fn filter_new(fetched: &[Post], watermark: u64) -> Vec<String> {
    fetched
        .iter()
        .filter(|post| post.id > watermark)
        .map(Post::serialize)
        .collect()
}

/// Advance the watermark past every fetched id.
pub fn advance_watermark(fetched: &[Post], watermark: u64) -> u64 {
    fetched
        .iter()
        .map(|post| post.id)
        .fold(watermark, u64::max)
}

/// Merge fetched posts into the existing backlog.
///
/// In [`QueueMode::Compat`] the candidates are sorted as plain strings, so
/// `"10%%..."` comes before `"9%%..."`. In [`QueueMode::Fixed`] they are
/// ordered by numeric id, newest first, with duplicate lines dropped.
pub fn merge(backlog: Vec<String>, fetched: &[Post], watermark: u64, mode: QueueMode) -> Merged {
    let mut candidates = backlog;
    candidates.extend(filter_new(fetched, watermark));

    match mode {
        QueueMode::Compat => candidates.sort(),
        QueueMode::Fixed => {
            candidates.sort_by(|a, b| record_id(b).cmp(&record_id(a)).then_with(|| a.cmp(b)));
            candidates.dedup();
        }
    }

    Merged {
        candidates,
        watermark: advance_watermark(fetched, watermark),
    }
}

/// Numeric id of a stored record; unparsable records sort as 0.
fn record_id(line: &str) -> u64 {
    Post::parse(line).map(|post| post.id).unwrap_or(0)
}
