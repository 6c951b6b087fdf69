//! One pipeline run: scrape every source, score, persist, record the run.

use crate::entities::{Article, RunStatus, ScrapeRunSummary};
use crate::errors::PipelineError;
use crate::extractor::ArticleCandidate;
use crate::scrape::FleetScraper;
use crate::sentiment::SentimentFuser;
use crate::sources::{SourceDescriptor, find_source};
use crate::storage::ArticleStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub struct Coordinator {
    fleet: FleetScraper,
    fuser: SentimentFuser,
    store: Arc<dyn ArticleStore>,
    sources: Vec<SourceDescriptor>,
    interval: Option<Duration>,
    /// Held for the whole of a run; at most one run at a time.
    run_lock: Mutex<()>,
}

impl Coordinator {
    pub fn new(
        fleet: FleetScraper,
        fuser: SentimentFuser,
        store: Arc<dyn ArticleStore>,
        sources: Vec<SourceDescriptor>,
        interval: Option<Duration>,
    ) -> Self {
        Self {
            fleet,
            fuser,
            store,
            sources,
            interval,
            run_lock: Mutex::new(()),
        }
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn store(&self) -> &Arc<dyn ArticleStore> {
        &self.store
    }

    /// Scrape all sources, waiting for any run already in progress.
    pub async fn run_once(&self) -> Result<usize, PipelineError> {
        let _guard = self.run_lock.lock().await;
        self.run_sources(&self.sources).await
    }

    /// Like `run_once`, but refuse instead of waiting.
    pub async fn try_run_once(&self) -> Result<usize, PipelineError> {
        let _guard = self
            .run_lock
            .try_lock()
            .map_err(|_| PipelineError::AlreadyRunning)?;
        self.run_sources(&self.sources).await
    }

    /// Scrape a single source by name (case-insensitive).
    pub async fn run_for_source(&self, name: &str) -> Result<usize, PipelineError> {
        let source = self.lookup(name)?;
        let _guard = self.run_lock.lock().await;
        self.run_sources(std::slice::from_ref(source)).await
    }

    pub async fn try_run_for_source(&self, name: &str) -> Result<usize, PipelineError> {
        let source = self.lookup(name)?;
        let _guard = self
            .run_lock
            .try_lock()
            .map_err(|_| PipelineError::AlreadyRunning)?;
        self.run_sources(std::slice::from_ref(source)).await
    }

    fn lookup(&self, name: &str) -> Result<&SourceDescriptor, PipelineError> {
        find_source(&self.sources, name)
            .ok_or_else(|| PipelineError::UnknownSource(name.trim().to_string()))
    }

    #[instrument(skip_all, fields(sources = sources.len()))]
    async fn run_sources(&self, sources: &[SourceDescriptor]) -> Result<usize, PipelineError> {
        let harvest = self.fleet.scrape_all(sources).await;

        if harvest.candidates.is_empty() {
            warn!(
                reachable = harvest.sources_reachable,
                "no articles scraped, nothing to persist"
            );
            return Ok(0);
        }

        let scraped_at = Utc::now();
        let articles: Vec<Article> = harvest
            .candidates
            .into_iter()
            .map(|candidate| self.score(candidate, scraped_at))
            .collect();

        let finished_at = Utc::now();
        let persisted = match self.store.upsert_articles(&articles).await {
            Ok(count) => count,
            Err(e) => {
                error!("failed to persist articles: {}", e);
                let failed = self.summary(finished_at, 0, harvest.sources_reachable, RunStatus::Failed);
                if let Err(e) = self.store.write_run_summary(&failed).await {
                    error!("failed to record failed run: {}", e);
                }
                return Err(PipelineError::Persistence(e));
            }
        };

        let completed = self.summary(
            finished_at,
            persisted,
            harvest.sources_reachable,
            RunStatus::Completed,
        );
        if let Err(e) = self.store.write_run_summary(&completed).await {
            error!("failed to record run summary: {}", e);
            return Err(PipelineError::Persistence(e));
        }

        info!(
            articles = persisted,
            sources_active = harvest.sources_reachable,
            "scrape run completed"
        );
        Ok(persisted)
    }

    fn score(&self, candidate: ArticleCandidate, scraped_at: DateTime<Utc>) -> Article {
        // listing pages carry no body text, so this is the summary in practice
        let content: Option<String> = None;
        let text = content
            .as_deref()
            .or(candidate.summary.as_deref())
            .unwrap_or_default();
        let sentiment = self.fuser.score(text);

        Article {
            id: Uuid::new_v4(),
            title: candidate.title,
            url: candidate.url,
            summary: candidate.summary,
            content,
            author: None,
            source: candidate.source,
            category: candidate.category,
            image_url: candidate.image_url,
            read_time: i32::try_from(candidate.read_time).unwrap_or(i32::MAX),
            sentiment: sentiment.label,
            sentiment_score: sentiment.score,
            sentiment_confidence: sentiment.confidence,
            published_at: candidate.captured_at,
            scraped_at,
        }
    }

    fn summary(
        &self,
        at: DateTime<Utc>,
        articles: usize,
        sources_active: usize,
        status: RunStatus,
    ) -> ScrapeRunSummary {
        let next_scrape = self
            .interval
            .and_then(|interval| chrono::Duration::from_std(interval).ok())
            .map(|interval| at + interval);

        ScrapeRunSummary {
            last_scrape: Some(at),
            articles_scraped: articles as i64,
            sources_active: sources_active as i64,
            status,
            next_scrape,
        }
    }
}
