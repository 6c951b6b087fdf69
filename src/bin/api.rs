use anyhow::{Context, Result};
use newsmood::{
    api,
    app_state::Services,
    config::Config,
    scheduler::Scheduler,
    sources::configured_sources,
    storage::open_store,
    telemetry,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    telemetry::init(config.log_format());

    let sources = configured_sources(config.sources_file().map(|p| p.as_path()))
        .context("failed to load sources")?;
    info!(count = sources.len(), "sources loaded");

    let store = open_store(&config).await;
    let services = Services::build(&config, sources, store)?;

    let result = serve(&config, &services).await;

    services.browser.shutdown().await;
    if let Err(e) = &result {
        error!("api exited with error: {:#}", e);
    }
    result
}

async fn serve(config: &Config, services: &Services) -> Result<()> {
    let shutdown = CancellationToken::new();

    let scheduler = config.scrape_interval().map(|period| {
        let scheduler = Scheduler::new(services.coordinator.clone(), period, shutdown.clone());
        tokio::spawn(scheduler.run())
    });
    if scheduler.is_none() {
        info!("periodic scraping disabled");
    }

    let app = api::router(services.app_state(), config.cors_allowed_origins());
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!(addr = config.bind_addr(), "listening");

    let signal = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
                _ = signal.cancelled() => {}
            }
            signal.cancel();
        })
        .await;

    shutdown.cancel();
    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            error!("scheduler task failed: {}", e);
        }
    }

    served.context("http server failed")
}
