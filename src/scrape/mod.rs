pub mod fleet;
pub mod source;

pub use fleet::{FleetHarvest, FleetScraper};
pub use source::{SourceHarvest, SourceScraper};
