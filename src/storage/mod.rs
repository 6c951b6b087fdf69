//! Persistence for articles and the last-run summary.
//!
//! The backend is picked once at startup by `open_store`; nothing downstream
//! inspects which implementation it holds.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::config::{Config, StorageBackend};
use crate::entities::{Article, ArticleFilter, DistinctField, ScrapeRunSummary, SentimentStats};
use crate::errors::StorageError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Insert or replace by `url`. Returns the number of articles written.
    async fn upsert_articles(&self, articles: &[Article]) -> Result<usize, StorageError>;

    /// Newest first by `published_at`, at most `limit` rows.
    async fn read_articles(
        &self,
        filter: &ArticleFilter,
        limit: i64,
    ) -> Result<Vec<Article>, StorageError>;

    async fn aggregate_sentiment_counts(&self) -> Result<SentimentStats, StorageError>;

    /// Sorted, non-empty distinct values of a column.
    async fn distinct(&self, field: DistinctField) -> Result<Vec<String>, StorageError>;

    /// The idle default when no run has been recorded.
    async fn read_run_summary(&self) -> Result<ScrapeRunSummary, StorageError>;

    async fn write_run_summary(&self, summary: &ScrapeRunSummary) -> Result<(), StorageError>;

    /// Delete every article. Returns the number removed.
    async fn clear_all(&self) -> Result<u64, StorageError>;

    async fn ping(&self) -> Result<(), StorageError>;
}

/// Build the configured store. A Postgres backend that cannot be reached or
/// migrated is replaced by the in-memory store for the life of the process.
pub async fn open_store(config: &Config) -> Arc<dyn ArticleStore> {
    match config.storage_backend() {
        StorageBackend::Memory => {
            info!("using in-memory article store");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Postgres => {
            match PostgresStore::connect(config.database_url(), config.database_name()).await {
                Ok(store) => {
                    info!(database = config.database_name(), "connected to postgres");
                    Arc::new(store)
                }
                Err(e) => {
                    warn!(
                        "postgres unavailable ({}), falling back to in-memory article store",
                        e
                    );
                    Arc::new(MemoryStore::new())
                }
            }
        }
    }
}

/// Drop empty values, sort and dedupe.
pub(crate) fn tidy_distinct(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut values: Vec<String> = values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .collect();
    values.sort();
    values.dedup();
    values
}
