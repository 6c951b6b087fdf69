use crate::entities::{ArticleFilter, SentimentLabel};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query string of `GET /api/articles`. `all` or an empty value means "any".
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ArticlesQuery {
    /// Page size, default 50, capped at 500.
    pub limit: Option<i64>,
    /// positive, negative, neutral or all
    pub sentiment: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

fn meaningful(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

impl ArticlesQuery {
    pub fn to_filter(&self) -> Result<ArticleFilter, String> {
        let sentiment = meaningful(&self.sentiment)
            .map(|raw| raw.parse::<SentimentLabel>())
            .transpose()?;

        Ok(ArticleFilter {
            sentiment,
            source: meaningful(&self.source),
            category: meaningful(&self.category),
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SourcesResponse {
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScrapeResponse {
    pub message: String,
    pub articles_scraped: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearResponse {
    pub message: String,
    pub deleted: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
