/// Render module
///
/// Pure transformation of fetched Site24x7 documents into Prometheus text
/// exposition blocks. No I/O happens here; a shape mismatch is reported as
/// a `RenderError` and the caller keeps its previous slot content.
pub mod categories;
pub mod exposition;

pub use categories::render_category;
pub use exposition::{escape_label_value, sanitize_metric_value, Exposition, MetricKind};
