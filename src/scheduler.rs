use crate::coordinator::Coordinator;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Re-runs the pipeline on a fixed period, starting immediately.
///
/// Runs never overlap: the next tick is only awaited after the previous run
/// returns, and manual runs contend on the same coordinator lock.
pub struct Scheduler {
    coordinator: Arc<Coordinator>,
    period: Duration,
    shutdown: CancellationToken,
}

impl Scheduler {
    pub fn new(coordinator: Arc<Coordinator>, period: Duration, shutdown: CancellationToken) -> Self {
        Self {
            coordinator,
            period,
            shutdown,
        }
    }

    pub async fn run(self) {
        info!(period_secs = self.period.as_secs(), "scheduler started");
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    warn!("shutdown requested during a scheduled run, abandoning it");
                    break;
                }
                result = self.coordinator.run_once() => match result {
                    Ok(count) => info!(articles = count, "scheduled run finished"),
                    Err(e) => error!("scheduled run failed: {}", e),
                }
            }
        }

        info!("scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchError, FetchStrategy, PageFetcher};
    use crate::scrape::{FleetScraper, SourceScraper};
    use crate::sentiment::SentimentFuser;
    use crate::sources::{SelectorSet, SourceDescriptor};
    use crate::storage::{ArticleStore, MemoryStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl PageFetcher for Counting {
        fn strategy(&self) -> FetchStrategy {
            FetchStrategy::Static
        }

        async fn fetch(&self, _source: &SourceDescriptor) -> Result<String, FetchError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::RequestTimeout)
        }
    }

    fn coordinator(calls: Arc<AtomicUsize>) -> Arc<Coordinator> {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(Counting(calls));
        let store: Arc<dyn ArticleStore> = Arc::new(MemoryStore::new());
        let source = SourceDescriptor {
            name: "Wire".to_string(),
            url: "https://wire.example.com/".to_string(),
            category: "World".to_string(),
            selectors: SelectorSet {
                article: "article".to_string(),
                title: "h2".to_string(),
                link: "a".to_string(),
                summary: None,
            },
        };
        Arc::new(Coordinator::new(
            FleetScraper::new(SourceScraper::new(fetcher.clone(), fetcher, 20), 1),
            SentimentFuser::default(),
            store,
            vec![source],
            None,
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_every_period_until_cancelled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let shutdown = CancellationToken::new();
        let scheduler = Scheduler::new(
            coordinator(calls.clone()),
            Duration::from_secs(60),
            shutdown.clone(),
        );
        let handle = tokio::spawn(scheduler.run());

        tokio::time::sleep(Duration::from_secs(1)).await;
        // one run, two strategies tried
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        shutdown.cancel();
        handle.await.unwrap();
    }
}
