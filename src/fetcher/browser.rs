//! Headless browser fetch strategy.
//!
//! `BrowserFetcher` owns a single Chromium process for the lifetime of the
//! scraper. The process is launched on the first automated fetch, navigations
//! are serialized on a mutex (one CDP session drives one page at a time), and
//! `shutdown` must be awaited by the owner before the runtime exits.

use crate::fetcher::{PageFetcher, errors::FetchError, types::FetchStrategy};
use crate::sources::SourceDescriptor;
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::{sync::Mutex, task::JoinHandle, time::Instant};
use tracing::{debug, info, instrument, warn};

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    /// How long to wait for the article container after navigation.
    pub wait_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            wait_timeout: Duration::from_secs(10),
        }
    }
}

struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("browser close returned error: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("waiting for browser exit failed: {}", e);
        }
        self.handler.abort();
    }
}

pub struct BrowserFetcher {
    options: BrowserOptions,
    session: Mutex<Option<BrowserSession>>,
}

impl BrowserFetcher {
    pub fn new(options: BrowserOptions) -> Self {
        Self {
            options,
            session: Mutex::new(None),
        }
    }

    /// True once a browser process has been started and not yet shut down.
    pub async fn is_running(&self) -> bool {
        self.session.lock().await.is_some()
    }

    async fn launch(&self) -> Result<BrowserSession, FetchError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .window_size(1920, 1080);
        if !self.options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(FetchError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::BrowserLaunch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler event error: {}", e);
                }
            }
        });

        info!(headless = self.options.headless, "browser launched");
        Ok(BrowserSession { browser, handler })
    }

    async fn render(&self, page: &Page, source: &SourceDescriptor) -> Result<String, FetchError> {
        tokio::time::timeout(NAVIGATION_TIMEOUT, page.goto(source.url.as_str()))
            .await
            .map_err(|_| FetchError::RequestTimeout)?
            .map_err(FetchError::from_cdp_error)?;

        let selector = source.selectors.article.as_str();
        let deadline = Instant::now() + self.options.wait_timeout;
        loop {
            match page.find_element(selector).await {
                Ok(_) => break,
                Err(_) if Instant::now() < deadline => {
                    tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
                }
                Err(_) => {
                    return Err(FetchError::SelectorTimeout {
                        selector: selector.to_string(),
                        secs: self.options.wait_timeout.as_secs(),
                    });
                }
            }
        }

        page.content().await.map_err(FetchError::from_cdp_error)
    }

    /// Close the browser if it was ever started. Safe to call more than once.
    pub async fn shutdown(&self) {
        let session = self.session.lock().await.take();
        if let Some(session) = session {
            session.close().await;
            info!("browser shut down");
        }
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    fn strategy(&self) -> FetchStrategy {
        FetchStrategy::Automated
    }

    #[instrument(skip_all, fields(source = %source.name, url = %source.url))]
    async fn fetch(&self, source: &SourceDescriptor) -> Result<String, FetchError> {
        let mut guard = self.session.lock().await;

        if guard.is_none() {
            *guard = Some(self.launch().await?);
        }
        let Some(session) = guard.as_ref() else {
            return Err(FetchError::BrowserLaunch("browser unavailable".to_string()));
        };

        let opened = session.browser.new_page("about:blank").await;
        let page = match opened {
            Ok(page) => page,
            Err(e) => {
                // A session that cannot open tabs is dead; relaunch next time.
                warn!("browser could not open a page, discarding session: {}", e);
                if let Some(dead) = guard.take() {
                    dead.close().await;
                }
                return Err(FetchError::from_cdp_error(e));
            }
        };

        let result = self.render(&page, source).await;
        if let Err(e) = page.close().await {
            debug!("failed to close page: {}", e);
        }
        result
    }
}
