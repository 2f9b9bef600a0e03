use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use site24x7_exporter::auth::CredentialManager;
use site24x7_exporter::cache::MetricsCache;
use site24x7_exporter::config::settings::{
    parse_categories, Settings, DEFAULT_ACCOUNTS_HOST, DEFAULT_API_HOST,
    DEFAULT_FETCH_TIMEOUT_SECONDS, DEFAULT_REFRESH_INTERVAL_SECONDS,
    DEFAULT_REFRESH_TIMEOUT_SECONDS, DEFAULT_TTL_SECONDS,
};
use site24x7_exporter::server;
use site24x7_exporter::upstream::client::UpstreamClient;
use site24x7_exporter::utils::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Zoho OAuth client id
    #[arg(long, env = "CLIENT_ID")]
    client_id: String,
    /// Zoho OAuth client secret
    #[arg(long, env = "CLIENT_SECRET")]
    client_secret: String,
    /// Zoho OAuth refresh token (refresh-grant)
    #[arg(long, env = "REFRESH_TOKEN")]
    refresh_token: String,
    /// Tenant identifier carried as the zaaid cookie on data API calls
    #[arg(long, env = "ZAAID")]
    zaaid: Option<String>,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    #[arg(long, env = "TOKEN_FILE", default_value = "./token.json")]
    token_file: PathBuf,

    #[arg(long, env = "ACCOUNTS_HOST", default_value = DEFAULT_ACCOUNTS_HOST)]
    accounts_host: String,
    #[arg(long, env = "API_HOST", default_value = DEFAULT_API_HOST)]
    api_host: String,

    /// Enabled metric categories: `all` or a comma-separated list
    #[arg(long, env = "CATEGORIES", default_value = "all")]
    categories: String,

    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

impl Args {
    fn into_settings(self) -> Result<Settings> {
        Ok(Settings {
            client_id: self.client_id,
            client_secret: self.client_secret,
            refresh_token: self.refresh_token,
            zaaid: self.zaaid,
            accounts_host: self.accounts_host,
            api_host: self.api_host,
            host: self.host,
            port: self.port,
            token_file: self.token_file,
            token_ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
            cache_ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECONDS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECONDS),
            refresh_timeout: Duration::from_secs(DEFAULT_REFRESH_TIMEOUT_SECONDS),
            categories: parse_categories(&self.categories)?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read env / args, init logging
    // -------------------------------

    let args = Args::parse();
    let log_level = args.log_level;
    init_logging(log_level, LogFormat::from_env());
    let settings = args.into_settings()?;

    // -------------------------------
    // 2. Credential manager, seeded from disk when possible
    // -------------------------------

    let credentials = Arc::new(CredentialManager::new(&settings)?);
    if credentials.load_persisted().await? {
        info!("reusing persisted credential");
    }

    // -------------------------------
    // 3. Cache coordinator over the upstream client
    // -------------------------------

    let client = UpstreamClient::new(&settings)?;
    let coordinator = Arc::new(MetricsCache::new(&settings, credentials, client));

    // -------------------------------
    // 4. Periodic refresh task (proactive warm-up, then every interval)
    // -------------------------------

    let refresh_task = tokio::spawn(
        coordinator
            .clone()
            .run_refresh_loop(settings.refresh_interval),
    );

    // -------------------------------
    // 5. HTTP server until ctrl-c
    // -------------------------------

    tokio::select! {
        result = server::server::start(&settings, coordinator) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    refresh_task.abort();
    Ok(())
}
