//! ytrend Core - Common infrastructure for the trending-video pipeline
//!
//! Shared HTTP client and runtime, logging setup and progress reporting
//! used by the YouTube scraper and the Kaggle publisher.

pub mod http;
pub mod logging;
pub mod progress;

// Re-exports for convenience
pub use http::{HttpError, HttpResponse, http_client};
pub use logging::{Verbosity, init_logging};
pub use progress::{ProgressContext, fmt_num};
