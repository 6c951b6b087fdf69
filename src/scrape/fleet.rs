use crate::extractor::ArticleCandidate;
use crate::scrape::source::SourceScraper;
use crate::sources::SourceDescriptor;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{Instrument, error, info, info_span, warn};

/// Union of every source's candidates for one run.
#[derive(Debug, Default)]
pub struct FleetHarvest {
    /// In source-completion order, not deduplicated.
    pub candidates: Vec<ArticleCandidate>,
    pub sources_attempted: usize,
    pub sources_reachable: usize,
    pub sources_failed: usize,
}

/// Scrapes many sources concurrently, one task per source.
///
/// A source that errors or panics contributes nothing and is logged; the
/// others are unaffected.
pub struct FleetScraper {
    scraper: Arc<SourceScraper>,
    concurrency: usize,
}

impl FleetScraper {
    pub fn new(scraper: SourceScraper, concurrency: usize) -> Self {
        Self {
            scraper: Arc::new(scraper),
            concurrency: concurrency.max(1),
        }
    }

    pub async fn scrape_all(&self, sources: &[SourceDescriptor]) -> FleetHarvest {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for source in sources.iter().cloned() {
            let scraper = self.scraper.clone();
            let semaphore = semaphore.clone();
            let span = info_span!("source", name = %source.name);

            tasks.spawn(
                async move {
                    // closed only if the semaphore is dropped, which cannot happen here
                    let _permit = semaphore.acquire_owned().await.ok();
                    let outcome = scraper.scrape(&source).await;
                    (source.name, outcome)
                }
                .instrument(span),
            );
        }

        let mut harvest = FleetHarvest {
            sources_attempted: sources.len(),
            ..Default::default()
        };

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(source_harvest))) => {
                    if source_harvest.reachable {
                        harvest.sources_reachable += 1;
                    }
                    harvest.candidates.extend(source_harvest.candidates);
                }
                Ok((name, Err(e))) => {
                    harvest.sources_failed += 1;
                    warn!(source = %name, "source skipped: {}", e);
                }
                Err(e) => {
                    harvest.sources_failed += 1;
                    error!("scrape task failed: {}", e);
                }
            }
        }

        info!(
            sources = harvest.sources_attempted,
            reachable = harvest.sources_reachable,
            failed = harvest.sources_failed,
            candidates = harvest.candidates.len(),
            "fleet scrape finished"
        );
        harvest
    }
}
