// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use httpmock::prelude::*;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::settings::Settings;
use crate::upstream::Category;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Settings pointing both the identity provider and the data API at the
/// given mock server, persisting the token under `dir`.
pub fn mock_settings(server: &MockServer, dir: &Path, categories: Vec<Category>) -> Settings {
    Settings {
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        refresh_token: "refresh-token".into(),
        zaaid: Some("42".into()),
        accounts_host: server.base_url(),
        api_host: server.base_url(),
        host: "127.0.0.1".into(),
        port: 3001,
        token_file: dir.join("token.json"),
        token_ttl: Duration::from_secs(3600),
        cache_ttl: Duration::from_secs(3600),
        refresh_interval: Duration::from_secs(3600),
        fetch_timeout: Duration::from_secs(5),
        refresh_timeout: Duration::from_secs(10),
        categories,
    }
}

/// Mock the identity provider's token endpoint with a fixed access token.
pub async fn mock_token_endpoint<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
    let body = json!({ "access_token": token });
    server
        .mock_async(move |when, then| {
            when.method(POST)
                .path("/oauth/v2/token")
                .query_param("grant_type", "refresh_token")
                .query_param("client_id", "client-id");
            then.status(200).json_body(body);
        })
        .await
}

/// Mock one category endpoint with the given JSON document.
pub async fn mock_category_endpoint<'a>(
    server: &'a MockServer,
    category: Category,
    body: Value,
) -> httpmock::Mock<'a> {
    let path = category
        .request_path()
        .split('?')
        .next()
        .unwrap()
        .to_string();
    server
        .mock_async(move |when, then| {
            when.method(GET).path(path);
            then.status(200).json_body(body);
        })
        .await
}

/// Server performance document with one healthy and one sparse row.
pub fn performance_body() -> Value {
    json!({
        "data": {
            "group_data": {
                "SERVER": {
                    "name": ["db01"],
                    "attribute_data": [
                        {"0": {"DISKUSEDPERCENT": "73.2", "MEMUSEDPERCENT": 41, "CPUUSEDPERCENT": "12.5"}}
                    ]
                }
            }
        }
    })
}

pub fn summary_body() -> Value {
    json!({
        "data": {
            "summary_details": {
                "availability_percentage": "99.9",
                "downtime_percentage": 0.1,
                "downtime_duration": 42,
                "maintenance_percentage": 0,
                "maintenance_duration": 0,
                "alarm_count": 3,
                "down_count": 1
            }
        }
    })
}
