// src/pipeline/run.rs

//! One fetch → merge → emit cycle.

use crate::error::Result;
use crate::models::Config;
use crate::services::PostSource;
use crate::storage::QueueStorage;

use super::emit::emit;
use super::merge::merge;

/// Summary of a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Record surfaced this run
    pub emitted: Option<String>,

    /// Posts returned by the search endpoint
    pub fetched: usize,

    /// Fetched posts that were above the watermark
    pub queued: usize,

    pub watermark_before: u64,
    pub watermark_after: u64,

    /// Records left in the backlog after this run
    pub backlog_len: usize,
}

/// Run one cycle against the given storage and post source.
///
/// Fetch failures degrade to an empty fetch unless
/// `search.fail_on_error` is set. The backlog is persisted before the
/// watermark so an interrupted run can only duplicate records, not lose them.
pub async fn run_once(
    config: &Config,
    storage: &dyn QueueStorage,
    source: &dyn PostSource,
) -> Result<RunReport> {
    let watermark_before = storage.read_watermark().await?;
    let backlog = storage.read_backlog().await?;
    log::debug!(
        "Watermark {}, {} records in backlog",
        watermark_before,
        backlog.len()
    );

    let fetched = match source.fetch(&config.search.query).await {
        Ok(posts) => posts,
        Err(e) if !config.search.fail_on_error => {
            log::warn!("Fetch failed, continuing with backlog only: {}", e);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let queued = fetched
        .iter()
        .filter(|post| post.id > watermark_before)
        .count();
    let merged = merge(backlog, &fetched, watermark_before, config.queue.mode);

    let emission = emit(merged.candidates, config.queue.mode);

    storage.write_backlog(&emission.backlog).await?;
    storage.write_watermark(merged.watermark).await?;

    let report = RunReport {
        emitted: emission.output,
        fetched: fetched.len(),
        queued,
        watermark_before,
        watermark_after: merged.watermark,
        backlog_len: emission.backlog.len(),
    };

    log::info!(
        "Fetched {}, queued {}, backlog {}, watermark {} -> {}",
        report.fetched,
        report.queued,
        report.backlog_len,
        report.watermark_before,
        report.watermark_after
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Post, QueueMode, StorageConfig};
    use crate::storage::LocalStorage;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Post source returning a fixed set of posts.
    struct CannedSource(Vec<Post>);

    #[async_trait]
    impl PostSource for CannedSource {
        async fn fetch(&self, _query: &str) -> Result<Vec<Post>> {
            Ok(self.0.clone())
        }
    }

    /// Post source that always fails.
    struct FailingSource;

    #[async_trait]
    impl PostSource for FailingSource {
        async fn fetch(&self, query: &str) -> Result<Vec<Post>> {
            Err(AppError::fetch(query, "connection refused"))
        }
    }

    fn post(id: u64) -> Post {
        Post::new(id, "user", format!("post {id}"))
    }

    fn storage(tmp: &TempDir) -> LocalStorage {
        LocalStorage::new(tmp.path(), &StorageConfig::default())
    }

    fn read(tmp: &TempDir, name: &str) -> String {
        std::fs::read_to_string(tmp.path().join(name)).unwrap()
    }

    #[tokio::test]
    async fn test_first_run_emits_and_queues() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        std::fs::write(tmp.path().join("last.txt"), "100").unwrap();

        let source = CannedSource(vec![post(50), post(150), post(200), post(175)]);
        let report = run_once(&Config::default(), &storage, &source).await.unwrap();

        assert_eq!(report.emitted.as_deref(), Some("150%%user%%post 150"));
        assert_eq!(report.fetched, 4);
        assert_eq!(report.queued, 3);
        assert_eq!(report.watermark_after, 200);
        assert_eq!(read(&tmp, "last.txt"), "200");
        assert_eq!(
            read(&tmp, "tweets.txt"),
            "175%%user%%post 175\n200%%user%%post 200"
        );
    }

    #[tokio::test]
    async fn test_empty_everything() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        std::fs::write(tmp.path().join("last.txt"), "42").unwrap();

        let report = run_once(&Config::default(), &storage, &CannedSource(Vec::new()))
            .await
            .unwrap();

        assert_eq!(report.emitted, None);
        assert_eq!(read(&tmp, "last.txt"), "42");
        assert_eq!(read(&tmp, "tweets.txt"), "");
    }

    #[tokio::test]
    async fn test_second_run_queues_nothing_new() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        let source = CannedSource(vec![post(1), post(2), post(3)]);

        let first = run_once(&Config::default(), &storage, &source).await.unwrap();
        assert_eq!(first.queued, 3);
        assert_eq!(first.emitted.as_deref(), Some("1%%user%%post 1"));

        let second = run_once(&Config::default(), &storage, &source).await.unwrap();
        assert_eq!(second.queued, 0);
        assert_eq!(second.watermark_after, 3);
        // Only backlog left over from the first run can surface.
        assert_eq!(second.emitted.as_deref(), Some("2%%user%%post 2"));
    }

    #[tokio::test]
    async fn test_lexicographic_emission() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        std::fs::write(tmp.path().join("last.txt"), "5").unwrap();

        let source = CannedSource(vec![post(9), post(10)]);
        let report = run_once(&Config::default(), &storage, &source).await.unwrap();

        assert_eq!(report.emitted.as_deref(), Some("10%%user%%post 10"));
    }

    #[tokio::test]
    async fn test_fixed_mode_emits_newest() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        let mut config = Config::default();
        config.queue.mode = QueueMode::Fixed;

        let source = CannedSource(vec![post(9), post(10)]);
        let report = run_once(&config, &storage, &source).await.unwrap();

        assert_eq!(report.emitted.as_deref(), Some("10%%user%%post 10"));
        assert_eq!(read(&tmp, "tweets.txt"), "9%%user%%post 9");
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        std::fs::write(tmp.path().join("last.txt"), "7").unwrap();
        std::fs::write(
            tmp.path().join("tweets.txt"),
            "8%%a%%one\n9%%b%%two\n10%%c%%three",
        )
        .unwrap();

        let report = run_once(&Config::default(), &storage, &FailingSource)
            .await
            .unwrap();

        assert_eq!(report.emitted.as_deref(), Some("10%%c%%three"));
        assert_eq!(report.watermark_after, 7);
        assert_eq!(read(&tmp, "tweets.txt"), "8%%a%%one\n9%%b%%two");
    }

    #[tokio::test]
    async fn test_fetch_failure_strict() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        let mut config = Config::default();
        config.search.fail_on_error = true;

        let result = run_once(&config, &storage, &FailingSource).await;
        assert!(matches!(result, Err(AppError::Fetch { .. })));
        assert!(!tmp.path().join("last.txt").exists());
    }
}
