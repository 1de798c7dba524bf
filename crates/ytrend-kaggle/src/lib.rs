//! ytrend Kaggle - publishes the scraped CSV directory as a Kaggle dataset
//!
//! Downloads the current dataset snapshot, lets the scraper append to it,
//! uploads the result as a new dataset version and empties the working
//! directory again.

pub mod api;
pub mod credentials;
pub mod publish;
pub mod workdir;

// Re-exports
pub use api::{DatasetHost, DatasetRef, KaggleClient};
pub use credentials::Credentials;
pub use publish::{publish, version_notes};
pub use workdir::{METADATA_FILE, clear_dir, unpack_zip};
