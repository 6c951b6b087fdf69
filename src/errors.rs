//! Error types shared across the scraping pipeline.
//!
//! Fetch failures live in `fetcher::errors`; everything here is raised at
//! the source, signal, storage or run level.

use thiserror::Error;

/// A source whose configuration cannot be applied to any page.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("source '{source_name}': invalid {field} selector '{selector}'")]
    InvalidSelector {
        source_name: String,
        field: &'static str,
        selector: String,
    },

    #[error("source '{source_name}': invalid base url: {reason}")]
    InvalidBaseUrl { source_name: String, reason: String },
}

/// One sentiment signal could not score a text. Absorbed by the fuser.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("{signal} signal failed: {reason}")]
    Failed {
        signal: &'static str,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("invalid connection settings: {0}")]
    Connection(String),
}

/// Run-level failures reported to whoever triggered the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("persistence failed: {0}")]
    Persistence(#[from] StorageError),

    #[error("unknown source '{0}'")]
    UnknownSource(String),

    #[error("a scrape run is already in progress")]
    AlreadyRunning,
}
