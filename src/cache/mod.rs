/// Cache module
///
/// One slot per metric category plus the coordinator that refreshes them
/// on a periodic timer and on demand from scrape requests.
pub mod coordinator;
pub mod slot;

pub use coordinator::MetricsCache;
pub use slot::Slot;
