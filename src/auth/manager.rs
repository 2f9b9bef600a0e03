use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::auth::credential::Credential;
use crate::auth::store;
use crate::config::settings::Settings;
use crate::error::ExporterError;
use crate::helpers::time::now_i64;
use crate::observability::metrics::get_metrics;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Owns the single bearer credential and its refresh lifecycle.
///
/// Concurrency contract: overlapping `ensure_valid()` calls coalesce onto
/// one in-flight refresh via the refresh gate; callers that lose the race
/// re-check validity after acquiring it and return without a network call.
pub struct CredentialManager {
    http: Client,
    accounts_host: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_file: PathBuf,
    ttl: Duration,
    current: RwLock<Option<Credential>>,
    refresh_gate: Mutex<()>,
}

impl CredentialManager {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(settings.fetch_timeout).build()?;
        Ok(Self {
            http,
            accounts_host: settings.accounts_host.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            refresh_token: settings.refresh_token.clone(),
            token_file: settings.token_file.clone(),
            ttl: settings.token_ttl,
            current: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        })
    }

    /// Seed in-memory state from the persisted record, if present.
    /// Returns true when a still-valid credential was restored.
    pub async fn load_persisted(&self) -> anyhow::Result<bool> {
        match store::load(&self.token_file).await? {
            Some(credential) => {
                let restored_valid = credential.is_valid(self.ttl, now_i64());
                if restored_valid {
                    info!(
                        expires_at = credential.expires_at(self.ttl),
                        "restored persisted credential"
                    );
                } else {
                    info!("persisted credential has expired, will refresh on first use");
                }
                *self.current.write().await = Some(credential);
                Ok(restored_valid)
            }
            None => Ok(false),
        }
    }

    /// Best available credential, possibly expired; no network calls.
    /// Call `ensure_valid()` first for a freshness guarantee.
    pub async fn current(&self) -> Option<Credential> {
        self.current.read().await.clone()
    }

    /// Guarantee a valid credential is held, refreshing at most once even
    /// under concurrent callers.
    pub async fn ensure_valid(&self) -> Result<(), ExporterError> {
        if self.holds_valid_credential().await {
            return Ok(());
        }

        let _gate = self.refresh_gate.lock().await;
        // another caller may have finished the refresh while we waited
        if self.holds_valid_credential().await {
            return Ok(());
        }
        self.refresh().await
    }

    async fn holds_valid_credential(&self) -> bool {
        let now = now_i64();
        self.current
            .read()
            .await
            .as_ref()
            .map(|c| c.is_valid(self.ttl, now))
            .unwrap_or(false)
    }

    /// One refresh-grant exchange with the identity provider. Not retried
    /// here; the periodic refresh loop retries on its next cycle.
    async fn refresh(&self) -> Result<(), ExporterError> {
        let metrics = get_metrics().await;
        let url = format!("{}/oauth/v2/token", self.accounts_host);

        let result = async {
            let response = self
                .http
                .post(&url)
                .query(&[
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                    ("refresh_token", self.refresh_token.as_str()),
                    ("grant_type", "refresh_token"),
                ])
                .send()
                .await
                .map_err(|e| ExporterError::Auth(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ExporterError::Auth(format!("unexpected status {}", status)));
            }

            let body: TokenResponse = response
                .json()
                .await
                .map_err(|e| ExporterError::Auth(format!("invalid token response: {}", e)))?;

            body.access_token
                .filter(|token| !token.is_empty())
                .ok_or_else(|| ExporterError::Auth("no access token received".to_string()))
        }
        .await;

        let token = match result {
            Ok(token) => token,
            Err(e) => {
                metrics.token_refresh_failures.inc();
                return Err(e);
            }
        };

        let credential = Credential::new(token, now_i64());
        if let Err(e) = store::save(&self.token_file, &credential).await {
            // in-memory state is still usable; the next refresh rewrites the file
            warn!("failed to persist credential: {:#}", e);
        }

        metrics.token_refreshes.inc();
        metrics
            .token_expiry_unix
            .set(credential.expires_at(self.ttl));
        info!(
            expires_at = credential.expires_at(self.ttl),
            "credential refreshed"
        );

        *self.current.write().await = Some(credential);
        Ok(())
    }
}
