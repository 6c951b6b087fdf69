pub mod links;
pub mod model;

#[cfg(test)]
mod tests;

pub use model::{ArticleCandidate, estimate_read_time, normalize_whitespace};

use crate::errors::ScrapeError;
use crate::sources::SourceDescriptor;
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static IMAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// Selector rules for one source, compiled once per scrape.
#[derive(Debug)]
pub struct ListingExtractor {
    source_name: String,
    category: String,
    base: Url,
    article: Selector,
    title: Selector,
    link: Selector,
    summary: Option<Selector>,
}

fn compile(source: &SourceDescriptor, field: &'static str, raw: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(raw).map_err(|_| ScrapeError::InvalidSelector {
        source_name: source.name.clone(),
        field,
        selector: raw.to_string(),
    })
}

impl ListingExtractor {
    pub fn new(source: &SourceDescriptor) -> Result<Self, ScrapeError> {
        let selectors = &source.selectors;
        let base = Url::parse(&source.url).map_err(|e| ScrapeError::InvalidBaseUrl {
            source_name: source.name.clone(),
            reason: e.to_string(),
        })?;

        let summary = match selectors.summary.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(compile(source, "summary", raw)?),
            _ => None,
        };

        Ok(Self {
            source_name: source.name.clone(),
            category: source.category.clone(),
            base,
            article: compile(source, "article", &selectors.article)?,
            title: compile(source, "title", &selectors.title)?,
            link: compile(source, "link", &selectors.link)?,
            summary,
        })
    }

    /// Extract up to `max` candidates from a listing page, in document order.
    ///
    /// The container list is truncated before extraction, so containers that
    /// turn out unusable still count against the cap.
    pub fn extract_page(
        &self,
        html: &str,
        max: usize,
        captured_at: DateTime<Utc>,
    ) -> Vec<ArticleCandidate> {
        let document = Html::parse_document(html);
        let containers: Vec<ElementRef> = document.select(&self.article).take(max).collect();
        let found = containers.len();

        let candidates: Vec<ArticleCandidate> = containers
            .into_iter()
            .filter_map(|container| self.extract(container, captured_at))
            .collect();

        debug!(
            source = %self.source_name,
            containers = found,
            candidates = candidates.len(),
            "listing extracted"
        );
        candidates
    }

    /// Build a candidate from one article container.
    ///
    /// A missing title or link discards the container; every other field
    /// falls back to `None`.
    pub fn extract(
        &self,
        container: ElementRef<'_>,
        captured_at: DateTime<Utc>,
    ) -> Option<ArticleCandidate> {
        let title = container
            .select(&self.title)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty());
        let Some(title) = title else {
            debug!(source = %self.source_name, "container without title skipped");
            return None;
        };

        let url = container
            .select(&self.link)
            .next()
            .and_then(|el| el.value().attr("href"))
            .and_then(|href| links::resolve(&self.base, href));
        let Some(url) = url else {
            debug!(source = %self.source_name, title = %title, "container without usable link skipped");
            return None;
        };

        let summary = self
            .summary
            .as_ref()
            .and_then(|sel| container.select(sel).next())
            .map(element_text)
            .filter(|s| !s.is_empty());

        let image_url = container
            .select(&IMAGE_SELECTOR)
            .next()
            .and_then(|img| image_source(&self.base, img));

        Some(ArticleCandidate {
            read_time: estimate_read_time(summary.as_deref()),
            title,
            url,
            summary,
            image_url,
            source: self.source_name.clone(),
            category: self.category.clone(),
            captured_at,
        })
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// `src`, unless it is missing or an inline placeholder, then `data-src`.
fn image_source(base: &Url, img: ElementRef<'_>) -> Option<String> {
    let attr = |name: &str| {
        img.value()
            .attr(name)
            .map(str::trim)
            .filter(|v| !v.is_empty() && !v.starts_with("data:"))
    };
    attr("src")
        .or_else(|| attr("data-src"))
        .and_then(|raw| links::resolve(base, raw))
}
