use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use http::{header::CONTENT_TYPE, StatusCode};
use prometheus::{Encoder, TextEncoder};
use tracing::{error, info};

use crate::cache::MetricsCache;
use crate::config::settings::Settings;
use crate::observability::metrics::get_metrics;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<MetricsCache>,
}

impl AppState {
    pub fn new(coordinator: Arc<MetricsCache>) -> Self {
        Self { coordinator }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/metrics", get(serve_metrics))
        .with_state(state)
}

/// Start the Axum server on the configured listen address.
pub async fn start(settings: &Settings, coordinator: Arc<MetricsCache>) -> Result<()> {
    let app = router(AppState::new(coordinator));

    let bind_addr = settings.bind_addr();
    info!("listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    get_metrics().await.up.set(1);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> impl IntoResponse {
    (StatusCode::OK, "site24x7-exporter is running")
}

async fn serve_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = match state.coordinator.get_metrics().await {
        Ok(body) => body,
        Err(e) => {
            error!("serving /metrics failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, "text/plain")],
                "Internal server error".to_string(),
            );
        }
    };

    // append the exporter's own registry after the upstream blocks
    let metrics = get_metrics().await;
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    let mut response = body;
    if encoder
        .encode(&metrics.registry.gather(), &mut buffer)
        .is_ok()
    {
        if let Ok(own) = String::from_utf8(buffer) {
            if !own.is_empty() {
                if !response.is_empty() {
                    response.push_str("\n\n");
                }
                response.push_str(own.trim_end());
            }
        }
    }

    (StatusCode::OK, [(CONTENT_TYPE, "text/plain")], response)
}
