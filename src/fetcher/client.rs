use crate::fetcher::{
    PageFetcher, errors::FetchError, pipeline::process_response, types::FetchStrategy,
    types::PageResponse,
};
use crate::sources::SourceDescriptor;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode, header};
use std::time::Duration;
use tracing::{debug, instrument};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Plain HTTP GET of a listing page.
///
/// The client holds a connection pool, so one instance is built per process
/// and shared by every concurrent scrape.
#[derive(Clone)]
pub struct StaticFetcher {
    client: Client,
}

impl StaticFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Overall request timeout; connect timeout is capped at 10s.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let client = ClientBuilder::new()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Unknown(format!("failed to build http client: {e}")))?;

        Ok(Self { client })
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError> {
        let parsed_url = url::Url::parse(url)?;

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_BODY_SIZE {
                return Err(FetchError::BodyTooLarge(content_length));
            }
        }

        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();

        // Anything other than a plain 200 (after redirects) counts as unreachable.
        if status != StatusCode::OK {
            return Err(FetchError::Http { status });
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        // Content-Length may have been absent
        if body_bytes.len() as u64 > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        let page = process_response(final_url, status, headers, body_bytes, &content_type)?;
        debug!(bytes = page.body_raw.len(), charset = ?page.charset, "page fetched");
        Ok(page)
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    fn strategy(&self) -> FetchStrategy {
        FetchStrategy::Static
    }

    async fn fetch(&self, source: &SourceDescriptor) -> Result<String, FetchError> {
        self.fetch_page(&source.url)
            .await
            .map(|page| page.body_utf8)
    }
}
