//! ytrend YouTube - trending videos scraper
//!
//! Fetches the "most popular" chart for each configured region from the
//! YouTube Data API v3, flattens every video into a fixed 16-column row
//! and appends the rows to one CSV file per region.

pub mod api;
pub mod config;
pub mod error;
pub mod paginate;
pub mod region;
pub mod runner;
pub mod schema;
pub mod transform;
pub mod writer;

// Re-exports
pub use api::{Page, PageSource, YouTubeClient};
pub use config::Config;
pub use error::{FetchError, ScrapeError};
pub use paginate::{RegionHarvest, fetch_region};
pub use region::{RegionCode, load_region_codes};
pub use runner::{Summary, run};
pub use schema::{COLUMNS, header_line};
pub use transform::{Row, VideoRecord, normalize, sanitize};
pub use writer::DatasetWriter;
