use anyhow::{Context, Result};
use clap::Parser;
use newsmood::{
    app_state::Services, config::Config, sources::configured_sources, storage::open_store,
    telemetry,
};

/// Run the scraping pipeline once and exit.
#[derive(Parser, Debug)]
#[command(name = "scrape", version, about)]
struct Args {
    /// Only scrape this source (case-insensitive name)
    #[arg(short, long)]
    source: Option<String>,

    /// Print the configured sources and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;
    telemetry::init(config.log_format());

    let sources = configured_sources(config.sources_file().map(|p| p.as_path()))
        .context("failed to load sources")?;

    if args.list {
        for source in &sources {
            println!("{}\t{}\t{}", source.name, source.category, source.url);
        }
        return Ok(());
    }

    let store = open_store(&config).await;
    let services = Services::build(&config, sources, store)?;

    let result = match args.source.as_deref() {
        Some(name) => services.coordinator.run_for_source(name).await,
        None => services.coordinator.run_once().await,
    };
    services.browser.shutdown().await;

    let count = result?;
    println!("scraped {count} articles");
    Ok(())
}
