// Graceful degradation: transient upstream failures must never evict
// previously cached category text, and only a completely cold cache with
// a failing upstream surfaces an error to the scrape handler.

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use serial_test::serial;

use crate::auth::CredentialManager;
use crate::cache::MetricsCache;
use crate::observability::metrics::get_metrics;
use crate::server::server::{router, AppState};
use crate::tests::common::{
    build_reqwest_client, mock_category_endpoint, mock_settings, mock_token_endpoint,
    performance_body, spawn_axum, summary_body,
};
use crate::upstream::client::UpstreamClient;
use crate::upstream::Category;

#[tokio::test]
#[serial]
async fn failed_fetch_preserves_previous_slot_text() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    mock_token_endpoint(&server, "tok-1").await;
    let good_mock =
        mock_category_endpoint(&server, Category::ServerPerformance, performance_body()).await;

    // zero cache TTL: every scrape attempts a refresh
    let mut settings = mock_settings(&server, dir.path(), vec![Category::ServerPerformance]);
    settings.cache_ttl = Duration::from_secs(0);
    let credentials = Arc::new(CredentialManager::new(&settings).unwrap());
    let client = UpstreamClient::new(&settings).unwrap();
    let coordinator = Arc::new(MetricsCache::new(&settings, credentials, client));

    let warm = coordinator.get_metrics().await.unwrap();
    assert!(warm.contains("server=\"db01\""));

    // upstream starts failing
    good_mock.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/reports/performance/type/SERVER");
            then.status(503).body("upstream unavailable");
        })
        .await;

    // the stale-but-available text is still served
    let degraded = coordinator.get_metrics().await.unwrap();
    assert!(degraded.contains("server=\"db01\""));
    assert_eq!(degraded, warm);
}

#[tokio::test]
#[serial]
async fn slow_upstream_hits_refresh_bound_and_serves_stale() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    mock_token_endpoint(&server, "tok-1").await;
    let good_mock =
        mock_category_endpoint(&server, Category::ServerPerformance, performance_body()).await;

    // zero cache TTL plus a tight refresh bound, well under the client timeout
    let mut settings = mock_settings(&server, dir.path(), vec![Category::ServerPerformance]);
    settings.cache_ttl = Duration::from_secs(0);
    settings.refresh_timeout = Duration::from_secs(1);
    let credentials = Arc::new(CredentialManager::new(&settings).unwrap());
    let client = UpstreamClient::new(&settings).unwrap();
    let coordinator = Arc::new(MetricsCache::new(&settings, credentials, client));

    let warm = coordinator.get_metrics().await.unwrap();
    assert!(warm.contains("server=\"db01\""));

    // upstream now stalls for longer than the refresh bound before answering
    good_mock.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/reports/performance/type/SERVER");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(performance_body());
        })
        .await;

    let failures = get_metrics()
        .await
        .category_fetch_failures
        .with_label_values(&[Category::ServerPerformance.as_str(), "fetch"]);
    let failures_before = failures.get();

    let degraded = coordinator.get_metrics().await.unwrap();
    assert_eq!(degraded, warm);
    assert_eq!(failures.get(), failures_before + 1);
}

#[tokio::test]
#[serial]
async fn refresh_all_swallows_a_failing_category_and_commits_the_rest() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    mock_token_endpoint(&server, "tok-1").await;
    let summary_mock = mock_category_endpoint(&server, Category::SummaryReport, summary_body()).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/reports/performance/type/SERVER");
            then.status(500).body("boom");
        })
        .await;

    let settings = mock_settings(
        &server,
        dir.path(),
        vec![Category::ServerPerformance, Category::SummaryReport],
    );
    let credentials = Arc::new(CredentialManager::new(&settings).unwrap());
    let client = UpstreamClient::new(&settings).unwrap();
    let coordinator = Arc::new(MetricsCache::new(&settings, credentials, client));

    // returns normally despite the failing category
    coordinator.refresh_all().await;
    assert_eq!(summary_mock.hits_async().await, 1);

    // the healthy slot was committed during the failed cycle: the scrape
    // serves it fresh without another fetch
    let body = coordinator.get_metrics().await.unwrap();
    assert!(body.contains("site24x7_summary_availability_percent"));
    assert!(!body.contains("site24x7_server_disk_used_percent"));
    assert_eq!(summary_mock.hits_async().await, 1);
}

#[tokio::test]
#[serial]
async fn one_failing_category_does_not_block_the_others() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    mock_token_endpoint(&server, "tok-1").await;
    mock_category_endpoint(&server, Category::SummaryReport, summary_body()).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/reports/performance/type/SERVER");
            then.status(500).body("boom");
        })
        .await;

    let settings = mock_settings(
        &server,
        dir.path(),
        vec![Category::ServerPerformance, Category::SummaryReport],
    );
    let credentials = Arc::new(CredentialManager::new(&settings).unwrap());
    let client = UpstreamClient::new(&settings).unwrap();
    let coordinator = Arc::new(MetricsCache::new(&settings, credentials, client));

    let body = coordinator.get_metrics().await.unwrap();
    assert!(body.contains("site24x7_summary_availability_percent"));
    assert!(!body.contains("site24x7_server_disk_used_percent"));
}

#[tokio::test]
#[serial]
async fn malformed_body_is_treated_like_a_fetch_failure() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    mock_token_endpoint(&server, "tok-1").await;
    let good_mock =
        mock_category_endpoint(&server, Category::ServerPerformance, performance_body()).await;

    let mut settings = mock_settings(&server, dir.path(), vec![Category::ServerPerformance]);
    settings.cache_ttl = Duration::from_secs(0);
    let credentials = Arc::new(CredentialManager::new(&settings).unwrap());
    let client = UpstreamClient::new(&settings).unwrap();
    let coordinator = Arc::new(MetricsCache::new(&settings, credentials, client));

    let warm = coordinator.get_metrics().await.unwrap();
    good_mock.delete_async().await;

    // 200 with a shape that cannot render: RenderError, slot untouched
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/reports/performance/type/SERVER");
            then.status(200).json_body(json!({"data": ["wrong", "shape"]}));
        })
        .await;

    let degraded = coordinator.get_metrics().await.unwrap();
    assert_eq!(degraded, warm);
}

#[tokio::test]
#[serial]
async fn cold_cache_with_failing_upstream_returns_500() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    mock_token_endpoint(&server, "tok-1").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/reports/performance/type/SERVER");
            then.status(500).body("boom");
        })
        .await;

    let settings = mock_settings(&server, dir.path(), vec![Category::ServerPerformance]);
    let credentials = Arc::new(CredentialManager::new(&settings).unwrap());
    let client = UpstreamClient::new(&settings).unwrap();
    let coordinator = Arc::new(MetricsCache::new(&settings, credentials, client));

    assert!(coordinator.get_metrics().await.is_err());

    let app = router(AppState::new(coordinator));
    let (handle, addr) = spawn_axum(app).await;
    let client = build_reqwest_client();

    let response = client
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), "Internal server error");

    handle.abort();
}

#[tokio::test]
#[serial]
async fn auth_failure_on_cold_cache_surfaces_as_error() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    // identity provider rejects every refresh attempt
    server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/v2/token");
            then.status(401).json_body(json!({"error": "invalid_client"}));
        })
        .await;
    let perf_mock =
        mock_category_endpoint(&server, Category::ServerPerformance, performance_body()).await;

    let settings = mock_settings(&server, dir.path(), vec![Category::ServerPerformance]);
    let credentials = Arc::new(CredentialManager::new(&settings).unwrap());
    let client = UpstreamClient::new(&settings).unwrap();
    let coordinator = Arc::new(MetricsCache::new(&settings, credentials, client));

    let err = coordinator.get_metrics().await.unwrap_err();
    assert_eq!(err.reason(), "auth");
    // the data API was never reached without a credential
    assert_eq!(perf_mock.hits_async().await, 0);
}
