use thiserror::Error;

use crate::upstream::Category;

/// Error taxonomy for the exporter.
///
/// `UpstreamFetch` and `Render` are equivalent for slot-update purposes:
/// the category's previous cached text stays in place and the category is
/// retried on the next cycle or on-demand trigger.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("identity provider refused the refresh grant: {0}")]
    Auth(String),

    #[error("upstream fetch failed for category '{category}': {source}")]
    UpstreamFetch {
        category: Category,
        #[source]
        source: anyhow::Error,
    },

    #[error("render failed for category '{category}': {detail}")]
    Render { category: Category, detail: String },
}

impl ExporterError {
    /// Short reason tag used as a metrics label value.
    pub fn reason(&self) -> &'static str {
        match self {
            ExporterError::Auth(_) => "auth",
            ExporterError::UpstreamFetch { .. } => "fetch",
            ExporterError::Render { .. } => "render",
        }
    }
}
