pub mod dtos;
pub mod handlers;
pub mod health;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::entities::{Article, RunStatus, ScrapeRunSummary, SentimentLabel, SentimentStats};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root,
        health::health_check,
        handlers::list_articles,
        handlers::sentiment_stats,
        handlers::list_sources,
        handlers::list_categories,
        handlers::scraping_status,
        handlers::trigger_scrape,
        handlers::trigger_source_scrape,
        handlers::clear_articles,
    ),
    components(schemas(
        Article,
        SentimentLabel,
        SentimentStats,
        ScrapeRunSummary,
        RunStatus,
        dtos::RootResponse,
        dtos::SourcesResponse,
        dtos::CategoriesResponse,
        dtos::ScrapeResponse,
        dtos::ClearResponse,
        dtos::ErrorResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "articles", description = "Stored articles and aggregates"),
        (name = "scraping", description = "Pipeline runs"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

fn cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
}

/// All HTTP routes plus Swagger UI. Every request gets an `x-request-id`
/// that is echoed back and visible in the trace span.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(health::health_check))
        .route(
            "/api/articles",
            get(handlers::list_articles).delete(handlers::clear_articles),
        )
        .route("/api/sentiment-stats", get(handlers::sentiment_stats))
        .route("/api/sources", get(handlers::list_sources))
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/scraping-status", get(handlers::scraping_status))
        .route("/api/scrape", post(handlers::trigger_scrape))
        .route("/api/scrape/{source}", post(handlers::trigger_source_scrape))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors(cors_origins))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
