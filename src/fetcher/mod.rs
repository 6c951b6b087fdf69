pub mod browser;
pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use browser::{BrowserFetcher, BrowserOptions};
pub use client::StaticFetcher;
pub use errors::FetchError;
pub use types::{Charset, FetchStrategy, PageResponse};

use crate::sources::SourceDescriptor;
use async_trait::async_trait;

/// A way of obtaining a source's listing page as HTML text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    fn strategy(&self) -> FetchStrategy;

    async fn fetch(&self, source: &SourceDescriptor) -> Result<String, FetchError>;
}
