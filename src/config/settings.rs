use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::upstream::Category;

/// Both the credential and the cache slots live for one hour.
pub const DEFAULT_TTL_SECONDS: u64 = 3600;
pub const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 3600;
pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 30;
/// Bound on one whole fetch-render sequence on the scrape path; a slow
/// upstream falls back to stale cached data instead of hanging the scrape.
pub const DEFAULT_REFRESH_TIMEOUT_SECONDS: u64 = 45;

pub const DEFAULT_ACCOUNTS_HOST: &str = "https://accounts.zoho.com";
pub const DEFAULT_API_HOST: &str = "https://www.site24x7.com";

/// ================================
/// Service-wide settings (environment-sourced)
/// ================================
#[derive(Debug, Clone)]
pub struct Settings {
    // identity provider
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Optional tenant identifier carried as the `zaaid` cookie.
    pub zaaid: Option<String>,

    // endpoints
    pub accounts_host: String,
    pub api_host: String,

    // http server
    pub host: String,
    pub port: u16,

    // persistence
    pub token_file: PathBuf,

    // timing
    pub token_ttl: Duration,
    pub cache_ttl: Duration,
    pub refresh_interval: Duration,
    pub fetch_timeout: Duration,
    pub refresh_timeout: Duration,

    pub categories: Vec<Category>,
}

impl Settings {
    /// Label value identifying this exporter in rendered samples.
    pub fn instance(&self) -> String {
        format!("localhost:{}", self.port)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse the `CATEGORIES` option: `all` or a comma-separated list of
/// category names.
pub fn parse_categories(raw: &str) -> Result<Vec<Category>> {
    if raw.trim().eq_ignore_ascii_case("all") {
        return Ok(Category::ALL.to_vec());
    }
    let mut categories = Vec::new();
    for name in raw.split(',').filter(|s| !s.trim().is_empty()) {
        let category = Category::parse(name)
            .ok_or_else(|| anyhow!("unknown category '{}'", name.trim()))?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    if categories.is_empty() {
        return Err(anyhow!("no categories enabled"));
    }
    Ok(categories)
}

#[cfg(test)]
pub fn test_settings() -> Settings {
    Settings {
        client_id: "test-client".into(),
        client_secret: "test-secret".into(),
        refresh_token: "test-refresh".into(),
        zaaid: Some("12345".into()),
        accounts_host: DEFAULT_ACCOUNTS_HOST.into(),
        api_host: DEFAULT_API_HOST.into(),
        host: "127.0.0.1".into(),
        port: 3001,
        token_file: PathBuf::from("./token.json"),
        token_ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
        cache_ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
        refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECONDS),
        fetch_timeout: Duration::from_secs(5),
        refresh_timeout: Duration::from_secs(10),
        categories: Category::ALL.to_vec(),
    }
}
