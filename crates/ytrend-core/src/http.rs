//! Blocking HTTP on top of the async reqwest client.
//!
//! Uses a shared tokio runtime internally but presents a sync interface,
//! so the pipeline stays a plain sequential program.

use std::sync::LazyLock;
use std::time::Duration;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error types for HTTP operations
#[derive(Debug)]
pub enum HttpError {
    /// Transport or HTTP-level error with optional status code
    Http {
        status: Option<u16>,
        message: String,
    },
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
        }
    }
}

impl std::error::Error for HttpError {}

impl HttpError {
    /// Create HTTP error from reqwest error.
    ///
    /// The URL is stripped so query-string API keys never reach logs.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }
}

/// Fully buffered response: status plus body bytes.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 429 Too Many Requests
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Body as lossy UTF-8, for error messages
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("ytrend/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Runtime that drives every request; callers stay synchronous.
static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Send a request and buffer the whole body, blocking the caller.
///
/// Non-success statuses are returned as a normal [`HttpResponse`];
/// only transport failures become [`HttpError`].
pub fn execute(request: reqwest::RequestBuilder) -> Result<HttpResponse, HttpError> {
    SHARED_RUNTIME.handle().block_on(async {
        let response = request.send().await.map_err(HttpError::from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(HttpError::from_reqwest)?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            body: b"{}".to_vec(),
        }
    }

    #[test]
    fn success_range() {
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(301).is_success());
        assert!(!response(429).is_success());
    }

    #[test]
    fn rate_limited_only_429() {
        assert!(response(429).is_rate_limited());
        assert!(!response(403).is_rate_limited());
        assert!(!response(503).is_rate_limited());
    }

    #[test]
    fn text_lossy_replaces_invalid_utf8() {
        let resp = HttpResponse {
            status: 500,
            body: vec![b'o', b'k', 0xff],
        };
        assert!(resp.text_lossy().starts_with("ok"));
    }

    #[test]
    fn display_http_with_status() {
        let err = HttpError::Http {
            status: Some(404),
            message: "test".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP 404: test");
    }

    #[test]
    fn display_http_without_status() {
        let err = HttpError::Http {
            status: None,
            message: "timeout".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP error: timeout");
    }
}
