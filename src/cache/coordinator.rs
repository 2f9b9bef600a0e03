use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use futures::future::join_all;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::auth::CredentialManager;
use crate::cache::slot::Slot;
use crate::config::settings::Settings;
use crate::error::ExporterError;
use crate::observability::metrics::get_metrics;
use crate::render::render_category;
use crate::upstream::client::UpstreamClient;
use crate::upstream::Category;

struct SlotEntry {
    category: Category,
    slot: Slot,
}

/// Cache/refresh coordinator.
///
/// Owns one slot per enabled category. Refreshes run concurrently across
/// categories; within a category they are serialized by the slot's refresh
/// lock, and a freshness double-check after acquiring it coalesces
/// concurrent stale scrapers onto a single upstream fetch.
pub struct MetricsCache {
    slots: Vec<SlotEntry>,
    credentials: Arc<CredentialManager>,
    client: UpstreamClient,
    cache_ttl: Duration,
    refresh_timeout: Duration,
    instance: String,
}

impl MetricsCache {
    pub fn new(
        settings: &Settings,
        credentials: Arc<CredentialManager>,
        client: UpstreamClient,
    ) -> Self {
        // preserve the fixed output order regardless of config order
        let slots = Category::ALL
            .iter()
            .copied()
            .filter(|c| settings.categories.contains(c))
            .map(|category| SlotEntry {
                category,
                slot: Slot::new(),
            })
            .collect();

        Self {
            slots,
            credentials,
            client,
            cache_ttl: settings.cache_ttl,
            refresh_timeout: settings.refresh_timeout,
            instance: settings.instance(),
        }
    }

    /// Serve the combined exposition text, refreshing stale categories
    /// first.
    ///
    /// A category whose refresh fails keeps its previous text and the
    /// failure is logged; the call errors only when nothing at all is
    /// servable.
    pub async fn get_metrics(&self) -> Result<String, ExporterError> {
        let refreshes = self.slots.iter().map(|entry| async move {
            (entry.category, self.refresh_slot(entry, false).await)
        });

        let mut first_error = None;
        for (category, result) in join_all(refreshes).await {
            if let Err(e) = result {
                warn!(category = %category, error = %e, "refresh failed, serving cached data");
                first_error.get_or_insert(e);
            }
        }

        let body = self.assemble().await;
        if body.is_empty() {
            if let Some(e) = first_error {
                return Err(e);
            }
        }
        Ok(body)
    }

    /// Unconditionally refresh every slot. Per-category failures are
    /// logged and swallowed; the periodic loop must keep running.
    pub async fn refresh_all(&self) {
        let metrics = get_metrics().await;
        metrics.cache_refresh_cycles.inc();

        let refreshes = self.slots.iter().map(|entry| async move {
            (entry.category, self.refresh_slot(entry, true).await)
        });

        for (category, result) in join_all(refreshes).await {
            match result {
                Ok(_) => debug!(category = %category, "slot refreshed"),
                Err(e) => warn!(category = %category, error = %e, "periodic refresh failed"),
            }
        }
    }

    /// Supervised background task driving proactive refresh. The first
    /// cycle runs immediately so scrapes normally observe warm caches.
    pub async fn run_refresh_loop(self: Arc<Self>, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            info!("refresh cycle start");
            self.refresh_all().await;
        }
    }

    /// Returns true when an upstream fetch actually happened.
    async fn refresh_slot(&self, entry: &SlotEntry, force: bool) -> Result<bool, ExporterError> {
        if !force && entry.slot.is_fresh(self.cache_ttl).await {
            return Ok(false);
        }

        let _refresh = entry.slot.lock_refresh().await;
        // a concurrent caller may have refreshed while we waited
        if !force && entry.slot.is_fresh(self.cache_ttl).await {
            return Ok(false);
        }

        let metrics = get_metrics().await;
        metrics
            .category_fetch_requests
            .with_label_values(&[entry.category.as_str()])
            .inc();
        let start = Instant::now();

        let outcome = tokio::time::timeout(self.refresh_timeout, self.fetch_and_render(entry.category))
            .await
            .unwrap_or_else(|_| {
                Err(ExporterError::UpstreamFetch {
                    category: entry.category,
                    source: anyhow!("refresh timed out after {:?}", self.refresh_timeout),
                })
            });

        metrics
            .category_fetch_duration
            .with_label_values(&[entry.category.as_str()])
            .observe(start.elapsed().as_secs_f64());

        match outcome {
            Ok(text) => {
                entry.slot.commit(text).await;
                Ok(true)
            }
            Err(e) => {
                metrics
                    .category_fetch_failures
                    .with_label_values(&[entry.category.as_str(), e.reason()])
                    .inc();
                Err(e)
            }
        }
    }

    async fn fetch_and_render(&self, category: Category) -> Result<String, ExporterError> {
        self.credentials.ensure_valid().await?;
        let credential = self
            .credentials
            .current()
            .await
            .ok_or_else(|| ExporterError::Auth("no usable credential".to_string()))?;

        let document = self.client.fetch(category, &credential.token).await?;
        render_category(category, &document, &self.instance)
    }

    async fn assemble(&self) -> String {
        let mut blocks = Vec::with_capacity(self.slots.len());
        for entry in &self.slots {
            let state = entry.slot.snapshot().await;
            if !state.text.is_empty() {
                blocks.push(state.text);
            }
        }
        blocks.join("\n\n")
    }
}
