use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use crate::{
    api::dtos::{
        ArticlesQuery, CategoriesResponse, ClearResponse, ErrorResponse, RootResponse,
        ScrapeResponse, SourcesResponse,
    },
    app_state::AppState,
    entities::{Article, DistinctField, ScrapeRunSummary, SentimentStats, clamp_limit},
    errors::PipelineError,
};

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/",
    tag = "meta",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "News Aggregator Sentiment Analysis API".to_string(),
        status: "running".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "articles",
    params(ArticlesQuery),
    responses(
        (status = 200, description = "Newest articles matching the filters", body = [Article]),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticlesQuery>,
) -> Response {
    let filter = match query.to_filter() {
        Ok(filter) => filter,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, &message),
    };

    match state
        .store
        .read_articles(&filter, clamp_limit(query.limit))
        .await
    {
        Ok(articles) => Json(articles).into_response(),
        Err(e) => {
            error!("Error fetching articles: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch articles")
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/sentiment-stats",
    tag = "articles",
    responses(
        (status = 200, description = "Article counts per sentiment", body = SentimentStats),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn sentiment_stats(State(state): State<AppState>) -> Response {
    match state.store.aggregate_sentiment_counts().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            error!("Error getting sentiment stats: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch sentiment statistics",
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/sources",
    tag = "articles",
    responses(
        (status = 200, description = "Sources with stored articles", body = SourcesResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_sources(State(state): State<AppState>) -> Response {
    match state.store.distinct(DistinctField::Source).await {
        Ok(sources) => Json(SourcesResponse { sources }).into_response(),
        Err(e) => {
            error!("Error getting sources: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch sources")
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "articles",
    responses(
        (status = 200, description = "Categories with stored articles", body = CategoriesResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> Response {
    match state.store.distinct(DistinctField::Category).await {
        Ok(categories) => Json(CategoriesResponse { categories }).into_response(),
        Err(e) => {
            error!("Error getting categories: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch categories",
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/scraping-status",
    tag = "scraping",
    responses(
        (status = 200, description = "Summary of the last run", body = ScrapeRunSummary),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn scraping_status(State(state): State<AppState>) -> Response {
    match state.store.read_run_summary().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            error!("Error getting scraping status: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch scraping status",
            )
        }
    }
}

fn scrape_outcome(result: Result<usize, PipelineError>, what: &str) -> Response {
    match result {
        Ok(count) => {
            info!(articles = count, "{} finished", what);
            Json(ScrapeResponse {
                message: format!("{what} completed"),
                articles_scraped: count,
            })
            .into_response()
        }
        Err(PipelineError::AlreadyRunning) => {
            warn!("{} refused, another run is in progress", what);
            error_response(StatusCode::CONFLICT, "A scrape is already in progress")
        }
        Err(PipelineError::UnknownSource(name)) => {
            error_response(StatusCode::NOT_FOUND, &format!("Unknown source '{name}'"))
        }
        Err(e) => {
            error!("{} failed: {}", what, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Scraping failed")
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/scrape",
    tag = "scraping",
    responses(
        (status = 200, description = "Run finished", body = ScrapeResponse),
        (status = 409, description = "A run is already in progress", body = ErrorResponse),
        (status = 500, description = "Run failed", body = ErrorResponse)
    )
)]
pub async fn trigger_scrape(State(state): State<AppState>) -> Response {
    scrape_outcome(state.coordinator.try_run_once().await, "Scraping")
}

#[utoipa::path(
    post,
    path = "/api/scrape/{source}",
    tag = "scraping",
    params(("source" = String, Path, description = "Configured source name, case-insensitive")),
    responses(
        (status = 200, description = "Run finished", body = ScrapeResponse),
        (status = 404, description = "No such source", body = ErrorResponse),
        (status = 409, description = "A run is already in progress", body = ErrorResponse),
        (status = 500, description = "Run failed", body = ErrorResponse)
    )
)]
pub async fn trigger_source_scrape(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Response {
    scrape_outcome(
        state.coordinator.try_run_for_source(&source).await,
        "Source scraping",
    )
}

#[utoipa::path(
    delete,
    path = "/api/articles",
    tag = "articles",
    responses(
        (status = 200, description = "All articles removed", body = ClearResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn clear_articles(State(state): State<AppState>) -> Response {
    match state.store.clear_all().await {
        Ok(deleted) => {
            info!(deleted, "articles cleared");
            Json(ClearResponse {
                message: "All articles cleared".to_string(),
                deleted,
            })
            .into_response()
        }
        Err(e) => {
            error!("Error clearing articles: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear articles")
        }
    }
}
