use anyhow::anyhow;
use reqwest::Client;
use serde_json::Value;

use crate::config::settings::Settings;
use crate::error::ExporterError;
use crate::upstream::Category;

/// Read-only client for the Site24x7 data API.
///
/// Every request carries the `Zoho-oauthtoken` authorization header and,
/// when a tenant id is configured, the `zaaid` cookie the MSP endpoints
/// expect.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    api_host: String,
    zaaid: Option<String>,
}

impl UpstreamClient {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(settings.fetch_timeout).build()?;
        Ok(Self {
            http,
            api_host: settings.api_host.clone(),
            zaaid: settings.zaaid.clone(),
        })
    }

    /// Fetch the raw JSON document for one category.
    ///
    /// Network errors, non-2xx statuses, and bodies that are not JSON all
    /// surface as `UpstreamFetchError`; the caller leaves the previous slot
    /// content untouched.
    pub async fn fetch(&self, category: Category, token: &str) -> Result<Value, ExporterError> {
        let url = format!("{}{}", self.api_host, category.request_path());

        let mut request = self
            .http
            .get(&url)
            .header(http::header::CONTENT_TYPE, "application/json")
            .header(
                http::header::AUTHORIZATION,
                format!("Zoho-oauthtoken {}", token),
            );
        if let Some(zaaid) = &self.zaaid {
            request = request.header(http::header::COOKIE, format!("zaaid={}", zaaid));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExporterError::UpstreamFetch {
                category,
                source: anyhow!(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExporterError::UpstreamFetch {
                category,
                source: anyhow!("unexpected status {}", status),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ExporterError::UpstreamFetch {
                category,
                source: anyhow!("invalid JSON body: {}", e),
            })
    }
}
