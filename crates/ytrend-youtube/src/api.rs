//! YouTube Data API v3 client for the "most popular" chart

use anyhow::Context;
use serde::{Deserialize, Deserializer};
use ytrend_core::{HttpResponse, http_client};

use crate::error::FetchError;
use crate::region::RegionCode;
use crate::transform::VideoRecord;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Largest page the API allows for `videos.list`
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Deserialize null as empty Vec
fn null_to_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// One decoded response page
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Continuation token; absent on the last page
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default, deserialize_with = "null_to_empty_vec")]
    pub items: Vec<VideoRecord>,
    /// Error payload the API sends alongside non-success statuses
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
}

/// Anything that can serve trending chart pages for a region
pub trait PageSource {
    /// Fetch one page; `page_token` is `None` for the first page
    fn fetch_page(&mut self, region: &RegionCode, page_token: Option<&str>)
    -> Result<Page, FetchError>;
}

/// Blocking HTTP client for `GET /youtube/v3/videos?chart=mostPopular`
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    endpoint: reqwest::Url,
    api_key: String,
    page_size: u32,
}

impl YouTubeClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let endpoint = format!("{}/youtube/v3/videos", base_url.trim_end_matches('/'));
        let endpoint = reqwest::Url::parse(&endpoint)
            .with_context(|| format!("Invalid YouTube API URL: {base_url}"))?;
        Ok(Self {
            endpoint,
            api_key: api_key.into(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Request URL for one page (contains the API key; never log it)
    pub fn videos_url(&self, region: &RegionCode, page_token: Option<&str>) -> reqwest::Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("part", "id,statistics,snippet");
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
            query
                .append_pair("chart", "mostPopular")
                .append_pair("regionCode", region.as_str())
                .append_pair("maxResults", &self.page_size.to_string())
                .append_pair("key", &self.api_key);
        }
        url
    }
}

impl PageSource for YouTubeClient {
    fn fetch_page(
        &mut self,
        region: &RegionCode,
        page_token: Option<&str>,
    ) -> Result<Page, FetchError> {
        let url = self.videos_url(region, page_token);
        log::debug!(
            "{region}: requesting page {}",
            page_token.unwrap_or("(first)")
        );
        let response = ytrend_core::http::execute(http_client().get(url))?;
        decode_page(region, &response)
    }
}

/// Turn a raw response into a page.
///
/// 429 is the only status handled specially; any other error payload is
/// decoded like a normal page and usually carries no items.
pub fn decode_page(region: &RegionCode, response: &HttpResponse) -> Result<Page, FetchError> {
    if response.is_rate_limited() {
        return Err(FetchError::RateLimited);
    }
    let page: Page = serde_json::from_slice(&response.body)?;
    if !response.is_success() {
        match &page.error {
            Some(err) => log::warn!(
                "{region}: API error {}: {}",
                err.code.unwrap_or(response.status),
                err.message
            ),
            None => log::warn!("{region}: unexpected HTTP status {}", response.status),
        }
    }
    Ok(page)
}
