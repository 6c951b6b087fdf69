//! News source descriptors.
//!
//! A `SourceDescriptor` is built once at startup (either from the built-in
//! list or a JSON file named by `SOURCES_FILE`) and shared read-only by every
//! scrape for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// CSS selectors locating article fields on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSet {
    /// Repeating container, one per article.
    #[serde(alias = "articles")]
    pub article: String,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub url: String,
    pub category: String,
    pub selectors: SelectorSet,
}

#[derive(Error, Debug)]
pub enum SourcesError {
    #[error("failed to read sources file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse sources file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("source '{name}' has an invalid url: {reason}")]
    InvalidUrl { name: String, reason: String },

    #[error("sources file contains no sources")]
    Empty,
}

fn source(
    name: &str,
    url: &str,
    category: &str,
    article: &str,
    title: &str,
    link: &str,
    summary: Option<&str>,
) -> SourceDescriptor {
    SourceDescriptor {
        name: name.to_string(),
        url: url.to_string(),
        category: category.to_string(),
        selectors: SelectorSet {
            article: article.to_string(),
            title: title.to_string(),
            link: link.to_string(),
            summary: summary.map(str::to_string),
        },
    }
}

/// Outlets scraped when no sources file is configured.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        source(
            "Times of India",
            "https://timesofindia.indiatimes.com",
            "General",
            "figure",
            "figcaption",
            "a",
            None,
        ),
        source(
            "NDTV",
            "https://www.ndtv.com/latest",
            "General",
            "div.NwsLstPg-a",
            "a.NwsLstPg_ttl-lnk",
            "a.NwsLstPg_img",
            Some("p.NwsLstPg_txt"),
        ),
        source(
            "CNN",
            "https://edition.cnn.com/health",
            "Health",
            "div.container__item",
            "span.container__headline-text",
            "a",
            None,
        ),
        source(
            "NY Times",
            "https://www.nytimes.com/international/section/technology",
            "Tech",
            "article.css-1l4spti",
            "a.css-8hzhxf",
            "a.css-8hzhxf",
            Some("a.css-8hzhxf"),
        ),
    ]
}

/// Load descriptors from a JSON array on disk.
///
/// Every entry must carry an absolute http(s) URL; an empty array is rejected
/// so a typo in deployment config does not silently disable scraping.
pub fn load_sources(path: &Path) -> Result<Vec<SourceDescriptor>, SourcesError> {
    let raw = std::fs::read_to_string(path)?;
    parse_sources(&raw)
}

pub fn parse_sources(raw: &str) -> Result<Vec<SourceDescriptor>, SourcesError> {
    let sources: Vec<SourceDescriptor> = serde_json::from_str(raw)?;
    if sources.is_empty() {
        return Err(SourcesError::Empty);
    }

    for source in &sources {
        let parsed = url::Url::parse(&source.url).map_err(|e| SourcesError::InvalidUrl {
            name: source.name.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SourcesError::InvalidUrl {
                name: source.name.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
    }

    Ok(sources)
}

/// The file's descriptors when one is configured, the built-in list otherwise.
pub fn configured_sources(file: Option<&Path>) -> Result<Vec<SourceDescriptor>, SourcesError> {
    match file {
        Some(path) => load_sources(path),
        None => Ok(default_sources()),
    }
}

/// Case-insensitive lookup by source name.
pub fn find_source<'a>(sources: &'a [SourceDescriptor], name: &str) -> Option<&'a SourceDescriptor> {
    let wanted = name.trim();
    sources
        .iter()
        .find(|source| source.name.eq_ignore_ascii_case(wanted))
}
