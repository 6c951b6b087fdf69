use newsmood::{config::Config, storage::PostgresStore, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init(config.log_format());

    // connect runs all pending migrations; no-op if up-to-date
    PostgresStore::connect(config.database_url(), config.database_name()).await?;
    info!(database = config.database_name(), "migrations applied");

    Ok(())
}
