/// Upstream module
///
/// Defines the Site24x7 data categories and the authenticated read-only
/// client used to fetch them.
pub mod client;
pub mod models;

use std::fmt;

/// One logical group of upstream metrics with its own cache slot and
/// fetch/render routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    ServerPerformance,
    MonitorStatus,
    SummaryReport,
    CurrentStatus,
    CurrentStatusGroups,
    TrendReport,
    TopAvailability,
    TopServer,
}

impl Category {
    /// Fixed output order; also the default enabled set.
    pub const ALL: [Category; 8] = [
        Category::ServerPerformance,
        Category::MonitorStatus,
        Category::SummaryReport,
        Category::CurrentStatus,
        Category::CurrentStatusGroups,
        Category::TrendReport,
        Category::TopAvailability,
        Category::TopServer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ServerPerformance => "server_performance",
            Category::MonitorStatus => "monitor_status",
            Category::SummaryReport => "summary_report",
            Category::CurrentStatus => "current_status",
            Category::CurrentStatusGroups => "current_status_groups",
            Category::TrendReport => "trend_report",
            Category::TopAvailability => "top_availability",
            Category::TopServer => "top_server",
        }
    }

    /// Request path (with query) on the Site24x7 API host.
    pub fn request_path(&self) -> &'static str {
        match self {
            Category::ServerPerformance => {
                "/api/reports/performance/type/SERVER?period=0&metric_aggregation=0"
            }
            Category::MonitorStatus => "/api/msp/monitors/status",
            Category::SummaryReport => "/api/reports/summary?period=0",
            Category::CurrentStatus => {
                "/api/current_status?apm_required=true&group_required=true&locations_required=true&suspended_required=true"
            }
            Category::CurrentStatusGroups => "/api/current_status/group",
            Category::TrendReport => "/api/reports/trend?period=3",
            Category::TopAvailability => "/api/reports/top_n/availability?period=0&limit=10",
            Category::TopServer => "/api/reports/top_n/server?period=0&limit=10",
        }
    }

    pub fn parse(name: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == name.trim())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
