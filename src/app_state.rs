use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::fetcher::{BrowserFetcher, BrowserOptions, FetchError, PageFetcher, StaticFetcher};
use crate::scrape::{FleetScraper, SourceScraper};
use crate::sentiment::SentimentFuser;
use crate::sources::SourceDescriptor;
use crate::storage::ArticleStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub store: Arc<dyn ArticleStore>,
}

impl AppState {
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        Self {
            store: coordinator.store().clone(),
            coordinator,
        }
    }
}

/// The wired pipeline shared by the binaries.
///
/// The caller owns `browser` and must await `browser.shutdown()` before exit.
pub struct Services {
    pub coordinator: Arc<Coordinator>,
    pub browser: Arc<BrowserFetcher>,
}

impl Services {
    pub fn build(
        config: &Config,
        sources: Vec<SourceDescriptor>,
        store: Arc<dyn ArticleStore>,
    ) -> Result<Self, FetchError> {
        let static_fetcher: Arc<dyn PageFetcher> = Arc::new(StaticFetcher::new()?);
        let browser = Arc::new(BrowserFetcher::new(BrowserOptions {
            headless: config.headless_browser(),
            wait_timeout: config.browser_timeout(),
        }));

        let scraper = SourceScraper::new(
            static_fetcher,
            browser.clone(),
            config.max_articles_per_source(),
        );
        let coordinator = Coordinator::new(
            FleetScraper::new(scraper, config.scrape_concurrency()),
            SentimentFuser::default(),
            store,
            sources,
            config.scrape_interval(),
        );

        Ok(Self {
            coordinator: Arc::new(coordinator),
            browser,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.coordinator.clone())
    }
}
