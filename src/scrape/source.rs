use crate::errors::ScrapeError;
use crate::extractor::{ArticleCandidate, ListingExtractor};
use crate::fetcher::PageFetcher;
use crate::sources::SourceDescriptor;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// What one source produced in a run.
#[derive(Debug, Default)]
pub struct SourceHarvest {
    pub candidates: Vec<ArticleCandidate>,
    /// At least one strategy returned a page.
    pub reachable: bool,
}

/// Static fetch first, browser fetch only when that yields no candidates.
pub struct SourceScraper {
    static_fetcher: Arc<dyn PageFetcher>,
    automated_fetcher: Arc<dyn PageFetcher>,
    max_per_source: usize,
}

impl SourceScraper {
    pub fn new(
        static_fetcher: Arc<dyn PageFetcher>,
        automated_fetcher: Arc<dyn PageFetcher>,
        max_per_source: usize,
    ) -> Self {
        Self {
            static_fetcher,
            automated_fetcher,
            max_per_source,
        }
    }

    /// Both strategies coming back empty is not an error; only a source whose
    /// selectors cannot compile is.
    #[instrument(skip_all, fields(source = %source.name))]
    pub async fn scrape(&self, source: &SourceDescriptor) -> Result<SourceHarvest, ScrapeError> {
        let extractor = ListingExtractor::new(source)?;
        let mut harvest = SourceHarvest::default();

        for fetcher in [&self.static_fetcher, &self.automated_fetcher] {
            let strategy = fetcher.strategy();
            match fetcher.fetch(source).await {
                Ok(html) => {
                    harvest.reachable = true;
                    let candidates = extractor.extract_page(&html, self.max_per_source, Utc::now());
                    if !candidates.is_empty() {
                        info!(%strategy, count = candidates.len(), "source scraped");
                        harvest.candidates = candidates;
                        return Ok(harvest);
                    }
                    warn!(%strategy, "no articles extracted");
                }
                Err(e) => warn!(%strategy, "fetch failed: {}", e),
            }
        }

        warn!("all fetch strategies came back empty");
        Ok(harvest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchError, FetchStrategy, MockPageFetcher};
    use crate::sources::SelectorSet;

    const LISTING: &str = r#"<html><body>
        <li class="item"><h3>Rescue teams reach village</h3><a href="/a/1">more</a></li>
        <li class="item"><h3>Bridge reopens after repairs</h3><a href="/a/2">more</a></li>
    </body></html>"#;

    fn source() -> SourceDescriptor {
        SourceDescriptor {
            name: "Wire".to_string(),
            url: "https://wire.example.com/latest".to_string(),
            category: "General".to_string(),
            selectors: SelectorSet {
                article: "li.item".to_string(),
                title: "h3".to_string(),
                link: "a".to_string(),
                summary: None,
            },
        }
    }

    fn fetcher(
        strategy: FetchStrategy,
        times: usize,
        body: Result<&'static str, ()>,
    ) -> Arc<dyn PageFetcher> {
        let mut mock = MockPageFetcher::new();
        mock.expect_strategy().return_const(strategy);
        mock.expect_fetch().times(times).returning(move |_| match body {
            Ok(html) => Ok(html.to_string()),
            Err(()) => Err(FetchError::RequestTimeout),
        });
        Arc::new(mock)
    }

    #[tokio::test]
    async fn static_hit_skips_browser() {
        let scraper = SourceScraper::new(
            fetcher(FetchStrategy::Static, 1, Ok(LISTING)),
            fetcher(FetchStrategy::Automated, 0, Ok(LISTING)),
            20,
        );
        let harvest = scraper.scrape(&source()).await.unwrap();
        assert_eq!(harvest.candidates.len(), 2);
        assert!(harvest.reachable);
        assert_eq!(harvest.candidates[0].url, "https://wire.example.com/a/1");
    }

    #[tokio::test]
    async fn empty_static_page_falls_back_once() {
        let scraper = SourceScraper::new(
            fetcher(FetchStrategy::Static, 1, Ok("<html><body></body></html>")),
            fetcher(FetchStrategy::Automated, 1, Ok(LISTING)),
            20,
        );
        let harvest = scraper.scrape(&source()).await.unwrap();
        assert_eq!(harvest.candidates.len(), 2);
    }

    #[tokio::test]
    async fn both_empty_is_an_empty_success() {
        let scraper = SourceScraper::new(
            fetcher(FetchStrategy::Static, 1, Ok("<html></html>")),
            fetcher(FetchStrategy::Automated, 1, Ok("<html></html>")),
            20,
        );
        let harvest = scraper.scrape(&source()).await.unwrap();
        assert!(harvest.candidates.is_empty());
        assert!(harvest.reachable);
    }

    #[tokio::test]
    async fn static_error_falls_back_and_both_failing_is_unreachable() {
        let scraper = SourceScraper::new(
            fetcher(FetchStrategy::Static, 1, Err(())),
            fetcher(FetchStrategy::Automated, 1, Err(())),
            20,
        );
        let harvest = scraper.scrape(&source()).await.unwrap();
        assert!(harvest.candidates.is_empty());
        assert!(!harvest.reachable);
    }

    #[tokio::test]
    async fn cap_applies_to_each_strategy() {
        let scraper = SourceScraper::new(
            fetcher(FetchStrategy::Static, 1, Ok(LISTING)),
            fetcher(FetchStrategy::Automated, 0, Ok(LISTING)),
            1,
        );
        let harvest = scraper.scrape(&source()).await.unwrap();
        assert_eq!(harvest.candidates.len(), 1);
    }

    #[tokio::test]
    async fn invalid_selector_is_a_source_error() {
        let mut bad = source();
        bad.selectors.title = "h3[".to_string();
        let scraper = SourceScraper::new(
            fetcher(FetchStrategy::Static, 0, Ok(LISTING)),
            fetcher(FetchStrategy::Automated, 0, Ok(LISTING)),
            20,
        );
        assert!(scraper.scrape(&bad).await.is_err());
    }
}
