//! HTTP-level tests for the YouTube client against a local mock server.
//!
//! The client is blocking, so each test owns a separate tokio runtime that
//! only drives the mock server.

use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ytrend_core::ProgressContext;
use ytrend_youtube::{Config, FetchError, PageSource, RegionCode, YouTubeClient, fetch_region};

fn mock_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("runtime")
}

fn region(code: &str) -> RegionCode {
    RegionCode::parse(code).expect("region")
}

fn video(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "snippet": {"title": id, "tags": ["x"]},
        "statistics": {"viewCount": "10", "likeCount": "2", "commentCount": "1"}
    })
}

#[test]
fn paginates_over_http() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/youtube/v3/videos"))
            .and(query_param("regionCode", "US"))
            .and(query_param("chart", "mostPopular"))
            .and(query_param("part", "id,statistics,snippet"))
            .and(query_param("key", "test-key"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nextPageToken": "PAGE2",
                "items": [video("first")]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/videos"))
            .and(query_param("pageToken", "PAGE2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "deleted", "snippet": {"title": "gone"}}]
            })))
            .mount(&server)
            .await;
    });

    let mut client = YouTubeClient::new(&server.uri(), "test-key").expect("client");
    let harvest = fetch_region(&mut client, &region("US"), "2024-05-01T00:00:00Z").expect("harvest");

    assert_eq!(harvest.pages, 2);
    assert_eq!(harvest.rows.len(), 1);
    assert_eq!(harvest.rows[0].get("video_id"), Some("\"first\""));

    let requests = rt.block_on(server.received_requests()).expect("recording enabled");
    assert_eq!(requests.len(), 2);
}

#[test]
fn status_429_is_rate_limited() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server),
    );

    let mut client = YouTubeClient::new(&server.uri(), "test-key").expect("client");
    let err = client.fetch_page(&region("GB"), None).unwrap_err();
    assert!(matches!(err, FetchError::RateLimited));
}

#[test]
fn rate_limit_stops_whole_run() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("GET"))
            .and(query_param("regionCode", "US"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": [video("a")]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("regionCode", "GB"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
    });

    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        api_key: "test-key".to_string(),
        api_url: server.uri(),
        regions: vec![region("US"), region("GB"), region("DE")],
        output_dir: dir.path().to_path_buf(),
        max_results: 50,
    };
    let mut client = config.client().expect("client");
    let err = ytrend_youtube::run(&config, &mut client, &ProgressContext::hidden()).unwrap_err();

    assert!(err.is_rate_limited());
    let requests = rt.block_on(server.received_requests()).expect("recording enabled");
    assert_eq!(requests.len(), 2, "no request for DE after the ban");
    assert!(dir.path().join("US_youtube_trending_data.csv").exists());
    assert!(!dir.path().join("GB_youtube_trending_data.csv").exists());
}

#[test]
fn api_error_payload_ends_region() {
    let rt = mock_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid"}
            })))
            .mount(&server),
    );

    let mut client = YouTubeClient::new(&server.uri(), "bad-key").expect("client");
    let harvest = fetch_region(&mut client, &region("US"), "2024-05-01T00:00:00Z").expect("harvest");
    assert_eq!(harvest.pages, 1);
    assert!(harvest.rows.is_empty());
}
