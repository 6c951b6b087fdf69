pub mod api;
pub mod app_state;
pub mod config;
pub mod coordinator;
pub mod entities;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod scheduler;
pub mod scrape;
pub mod sentiment;
pub mod sources;
pub mod storage;
pub mod telemetry;
