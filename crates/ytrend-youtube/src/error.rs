//! Error types for page fetching and whole scrape runs

use std::path::PathBuf;

use ytrend_core::HttpError;

use crate::region::RegionCode;

/// Error from fetching a single page of the trending chart
#[derive(Debug)]
pub enum FetchError {
    /// HTTP 429: the API key is temporarily banned, stop all requests
    RateLimited,
    /// Transport failure (DNS, TLS, connection reset...)
    Http(HttpError),
    /// Response body is not the expected JSON
    Decode(serde_json::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => f.write_str("rate limited by the YouTube API (HTTP 429)"),
            Self::Http(e) => write!(f, "{e}"),
            Self::Decode(e) => write!(f, "invalid response JSON: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RateLimited => None,
            Self::Http(e) => Some(e),
            Self::Decode(e) => Some(e),
        }
    }
}

impl From<HttpError> for FetchError {
    fn from(e: HttpError) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}

/// Error that aborts a scrape run
#[derive(Debug)]
pub enum ScrapeError {
    /// Upstream rate limit hit; nothing was written for `region` or later regions
    RateLimited { region: RegionCode },
    Fetch {
        region: RegionCode,
        source: FetchError,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited { region } => write!(
                f,
                "temporarily banned due to excess requests while fetching {region}, \
                 please wait and continue later"
            ),
            Self::Fetch { region, source } => write!(f, "{region}: {source}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RateLimited { .. } => None,
            Self::Fetch { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl ScrapeError {
    /// Wrap a page fetch failure, promoting rate limits to their own variant
    pub fn from_fetch(region: &RegionCode, e: FetchError) -> Self {
        match e {
            FetchError::RateLimited => Self::RateLimited {
                region: region.clone(),
            },
            source => Self::Fetch {
                region: region.clone(),
                source,
            },
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
