use crate::entities::{
    Article, ArticleFilter, DistinctField, ScrapeRunSummary, SentimentStats,
};
use crate::errors::StorageError;
use crate::storage::{ArticleStore, tidy_distinct};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    articles: HashMap<String, Article>,
    summary: Option<ScrapeRunSummary>,
}

/// Process-local store keyed by article URL. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn upsert_articles(&self, articles: &[Article]) -> Result<usize, StorageError> {
        let mut state = self.state.write().await;
        for article in articles {
            let mut article = article.clone();
            // first insert owns the id, like the unique-url row in postgres
            if let Some(existing) = state.articles.get(&article.url) {
                article.id = existing.id;
            }
            state.articles.insert(article.url.clone(), article);
        }
        Ok(articles.len())
    }

    async fn read_articles(
        &self,
        filter: &ArticleFilter,
        limit: i64,
    ) -> Result<Vec<Article>, StorageError> {
        let state = self.state.read().await;
        let mut matched: Vec<Article> = state
            .articles
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.url.cmp(&b.url))
        });
        matched.truncate(limit.max(0) as usize);
        Ok(matched)
    }

    async fn aggregate_sentiment_counts(&self) -> Result<SentimentStats, StorageError> {
        let state = self.state.read().await;
        let mut stats = SentimentStats::default();
        for article in state.articles.values() {
            stats.record(article.sentiment);
        }
        Ok(stats)
    }

    async fn distinct(&self, field: DistinctField) -> Result<Vec<String>, StorageError> {
        let state = self.state.read().await;
        let values = state.articles.values().map(|a| match field {
            DistinctField::Source => a.source.clone(),
            DistinctField::Category => a.category.clone(),
        });
        Ok(tidy_distinct(values))
    }

    async fn read_run_summary(&self) -> Result<ScrapeRunSummary, StorageError> {
        Ok(self.state.read().await.summary.clone().unwrap_or_default())
    }

    async fn write_run_summary(&self, summary: &ScrapeRunSummary) -> Result<(), StorageError> {
        self.state.write().await.summary = Some(summary.clone());
        Ok(())
    }

    async fn clear_all(&self) -> Result<u64, StorageError> {
        let mut state = self.state.write().await;
        let removed = state.articles.len() as u64;
        state.articles.clear();
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{RunStatus, SentimentLabel};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn article(url: &str, title: &str, source: &str, category: &str) -> Article {
        Article {
            id: Uuid::new_v4(),
            title: title.to_string(),
            url: url.to_string(),
            summary: None,
            content: None,
            author: None,
            source: source.to_string(),
            category: category.to_string(),
            image_url: None,
            read_time: 1,
            sentiment: SentimentLabel::Neutral,
            sentiment_score: 0.0,
            sentiment_confidence: 0.0,
            published_at: Utc::now(),
            scraped_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_same_url_keeps_one_latest_record() {
        let store = MemoryStore::new();
        let first = article("https://a.example.com/1", "Old headline", "CNN", "Health");
        let mut second = article("https://a.example.com/1", "New headline", "CNN", "Health");
        second.sentiment = SentimentLabel::Positive;
        second.sentiment_score = 0.4;

        store.upsert_articles(&[first.clone()]).await.unwrap();
        store.upsert_articles(&[second.clone()]).await.unwrap();

        let stored = store
            .read_articles(&ArticleFilter::default(), 50)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "New headline");
        assert_eq!(stored[0].sentiment, SentimentLabel::Positive);
        assert_eq!(stored[0].sentiment_score, 0.4);
        assert_eq!(stored[0].id, first.id);
    }

    #[tokio::test]
    async fn reads_newest_first_with_limit() {
        let store = MemoryStore::new();
        let mut older = article("https://a.example.com/old", "Older", "CNN", "Health");
        older.published_at = Utc::now() - Duration::hours(2);
        let newer = article("https://a.example.com/new", "Newer", "CNN", "Health");
        store.upsert_articles(&[older, newer]).await.unwrap();

        let all = store
            .read_articles(&ArticleFilter::default(), 50)
            .await
            .unwrap();
        assert_eq!(all[0].title, "Newer");
        assert_eq!(all[1].title, "Older");

        let one = store
            .read_articles(&ArticleFilter::default(), 1)
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
    }

    #[tokio::test]
    async fn distinct_drops_empty_values_for_both_fields() {
        let store = MemoryStore::new();
        store
            .upsert_articles(&[
                article("https://x/1", "a", "NDTV", "General"),
                article("https://x/2", "b", "CNN", ""),
                article("https://x/3", "c", "", "Health"),
                article("https://x/4", "d", "CNN", "Health"),
            ])
            .await
            .unwrap();

        assert_eq!(
            store.distinct(DistinctField::Source).await.unwrap(),
            vec!["CNN", "NDTV"]
        );
        assert_eq!(
            store.distinct(DistinctField::Category).await.unwrap(),
            vec!["General", "Health"]
        );
    }

    #[tokio::test]
    async fn counts_summary_and_clear() {
        let store = MemoryStore::new();
        assert_eq!(
            store.read_run_summary().await.unwrap().status,
            RunStatus::Idle
        );

        let mut positive = article("https://x/p", "p", "CNN", "Health");
        positive.sentiment = SentimentLabel::Positive;
        let mut negative = article("https://x/n", "n", "CNN", "Health");
        negative.sentiment = SentimentLabel::Negative;
        store.upsert_articles(&[positive, negative]).await.unwrap();

        let stats = store.aggregate_sentiment_counts().await.unwrap();
        assert_eq!(
            stats,
            SentimentStats {
                positive: 1,
                negative: 1,
                neutral: 0,
                total: 2
            }
        );

        let summary = ScrapeRunSummary {
            last_scrape: Some(Utc::now()),
            articles_scraped: 2,
            sources_active: 1,
            status: RunStatus::Completed,
            next_scrape: None,
        };
        store.write_run_summary(&summary).await.unwrap();
        assert_eq!(store.read_run_summary().await.unwrap(), summary);

        assert_eq!(store.clear_all().await.unwrap(), 2);
        assert_eq!(store.aggregate_sentiment_counts().await.unwrap().total, 0);
    }
}
