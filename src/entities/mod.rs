use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// --- PostgreSQL Enums ---
#[derive(
    sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[sqlx(type_name = "sentiment_label", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("unknown sentiment '{other}'")),
        }
    }
}

#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "run_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Completed,
    Failed,
}

/// --- Records ---

/// A scored, persisted news article. `url` is the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub source: String,
    pub category: String,
    pub image_url: Option<String>,
    /// Estimated minutes, at least 1.
    pub read_time: i32,
    pub sentiment: SentimentLabel,
    pub sentiment_score: f64,
    pub sentiment_confidence: f64,
    pub published_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
}

/// Last pipeline run. Overwritten on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScrapeRunSummary {
    pub last_scrape: Option<DateTime<Utc>>,
    pub articles_scraped: i64,
    pub sources_active: i64,
    pub status: RunStatus,
    pub next_scrape: Option<DateTime<Utc>>,
}

impl Default for ScrapeRunSummary {
    fn default() -> Self {
        Self {
            last_scrape: None,
            articles_scraped: 0,
            sources_active: 0,
            status: RunStatus::Idle,
            next_scrape: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SentimentStats {
    pub positive: i64,
    pub negative: i64,
    pub neutral: i64,
    pub total: i64,
}

impl SentimentStats {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
        self.total += 1;
    }
}

// --- Queries ---

pub const DEFAULT_ARTICLE_LIMIT: i64 = 50;
pub const MAX_ARTICLE_LIMIT: i64 = 500;

/// Narrowing applied by `read_articles`; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub sentiment: Option<SentimentLabel>,
    pub source: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive substring over title, summary and content.
    pub search: Option<String>,
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        if let Some(sentiment) = self.sentiment {
            if article.sentiment != sentiment {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if &article.source != source {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &article.category != category {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = |field: Option<&str>| {
                field.is_some_and(|text| text.to_lowercase().contains(&needle))
            };
            if !hit(Some(article.title.as_str()))
                && !hit(article.summary.as_deref())
                && !hit(article.content.as_deref())
            {
                return false;
            }
        }
        true
    }
}

/// Clamp a requested page size into `1..=MAX_ARTICLE_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_ARTICLE_LIMIT)
        .clamp(1, MAX_ARTICLE_LIMIT)
}

/// Columns `distinct` can enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctField {
    Source,
    Category,
}
