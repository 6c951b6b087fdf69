use crate::entities::{
    Article, ArticleFilter, DistinctField, ScrapeRunSummary, SentimentLabel, SentimentStats,
};
use crate::errors::StorageError;
use crate::storage::{ArticleStore, tidy_distinct};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};

const ARTICLE_COLUMNS: &str = "id, title, url, summary, content, author, source, category, \
     image_url, read_time, sentiment, sentiment_score, sentiment_confidence, published_at, \
     scraped_at";

/// Article store backed by the `articles` and `scrape_status` tables.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to `database` on the server named by `url` and apply pending
    /// migrations.
    pub async fn connect(url: &str, database: &str) -> Result<Self, StorageError> {
        let options = PgConnectOptions::from_str(url)
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .database(database);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing, already migrated pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `%term%` with LIKE metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl ArticleStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    #[instrument(skip_all, fields(count = articles.len()))]
    async fn upsert_articles(&self, articles: &[Article]) -> Result<usize, StorageError> {
        let mut tx = self.pool.begin().await?;

        for article in articles {
            sqlx::query(
                r#"
                INSERT INTO articles
                      (id, title, url, summary, content, author, source, category, image_url,
                       read_time, sentiment, sentiment_score, sentiment_confidence,
                       published_at, scraped_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                ON CONFLICT (url) DO UPDATE
                  SET title                = EXCLUDED.title,
                      summary              = EXCLUDED.summary,
                      content              = EXCLUDED.content,
                      author               = EXCLUDED.author,
                      source               = EXCLUDED.source,
                      category             = EXCLUDED.category,
                      image_url            = EXCLUDED.image_url,
                      read_time            = EXCLUDED.read_time,
                      sentiment            = EXCLUDED.sentiment,
                      sentiment_score      = EXCLUDED.sentiment_score,
                      sentiment_confidence = EXCLUDED.sentiment_confidence,
                      published_at         = EXCLUDED.published_at,
                      scraped_at           = EXCLUDED.scraped_at
                "#,
            )
            .bind(article.id)
            .bind(&article.title)
            .bind(&article.url)
            .bind(&article.summary)
            .bind(&article.content)
            .bind(&article.author)
            .bind(&article.source)
            .bind(&article.category)
            .bind(&article.image_url)
            .bind(article.read_time)
            .bind(article.sentiment)
            .bind(article.sentiment_score)
            .bind(article.sentiment_confidence)
            .bind(article.published_at)
            .bind(article.scraped_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("articles upserted");
        Ok(articles.len())
    }

    async fn read_articles(
        &self,
        filter: &ArticleFilter,
        limit: i64,
    ) -> Result<Vec<Article>, StorageError> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles
            WHERE ($1::sentiment_label IS NULL OR sentiment = $1)
              AND ($2::text IS NULL OR source = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::text IS NULL
                   OR title ILIKE $4 ESCAPE '\'
                   OR summary ILIKE $4 ESCAPE '\'
                   OR content ILIKE $4 ESCAPE '\')
            ORDER BY published_at DESC, url
            LIMIT $5
            "#
        );

        let articles = sqlx::query_as::<_, Article>(&sql)
            .bind(filter.sentiment)
            .bind(filter.source.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await?;

        Ok(articles)
    }

    async fn aggregate_sentiment_counts(&self) -> Result<SentimentStats, StorageError> {
        let rows = sqlx::query_as::<_, (SentimentLabel, i64)>(
            "SELECT sentiment, COUNT(*) FROM articles GROUP BY sentiment",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = SentimentStats::default();
        for (label, count) in rows {
            match label {
                SentimentLabel::Positive => stats.positive = count,
                SentimentLabel::Negative => stats.negative = count,
                SentimentLabel::Neutral => stats.neutral = count,
            }
            stats.total += count;
        }
        Ok(stats)
    }

    async fn distinct(&self, field: DistinctField) -> Result<Vec<String>, StorageError> {
        let sql = match field {
            DistinctField::Source => {
                "SELECT DISTINCT source FROM articles WHERE source <> '' ORDER BY source"
            }
            DistinctField::Category => {
                "SELECT DISTINCT category FROM articles WHERE category <> '' ORDER BY category"
            }
        };

        let values = sqlx::query_scalar::<_, String>(sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(tidy_distinct(values))
    }

    async fn read_run_summary(&self) -> Result<ScrapeRunSummary, StorageError> {
        let summary = sqlx::query_as::<_, ScrapeRunSummary>(
            "SELECT last_scrape, articles_scraped, sources_active, status, next_scrape
             FROM scrape_status WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary.unwrap_or_default())
    }

    async fn write_run_summary(&self, summary: &ScrapeRunSummary) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO scrape_status
                  (id, last_scrape, articles_scraped, sources_active, status, next_scrape)
            VALUES (1,  $1,          $2,               $3,             $4,     $5)
            ON CONFLICT (id) DO UPDATE
              SET last_scrape      = EXCLUDED.last_scrape,
                  articles_scraped = EXCLUDED.articles_scraped,
                  sources_active   = EXCLUDED.sources_active,
                  status           = EXCLUDED.status,
                  next_scrape      = EXCLUDED.next_scrape
            "#,
        )
        .bind(summary.last_scrape)
        .bind(summary.articles_scraped)
        .bind(summary.sources_active)
        .bind(summary.status)
        .bind(summary.next_scrape)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear_all(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM articles")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
