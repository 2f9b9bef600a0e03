//! Typed shapes of the Site24x7 API documents.
//!
//! Numeric fields are deserialized as `serde_json::Value` because the
//! upstream mixes numbers, numeric strings, and nulls for the same field;
//! every value goes through the sanitize rule at render time. String and
//! list fields default when absent so a sparse document still renders.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// `/api/reports/performance/type/SERVER`
#[derive(Debug, Default, Deserialize)]
pub struct PerformanceReport {
    #[serde(default)]
    pub data: PerformanceData,
}

#[derive(Debug, Default, Deserialize)]
pub struct PerformanceData {
    #[serde(default)]
    pub group_data: GroupData,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupData {
    #[serde(rename = "SERVER", default)]
    pub server: ServerGroup,
}

/// Parallel arrays: `name[i]` is described by `attribute_data[i]["0"]`.
#[derive(Debug, Default, Deserialize)]
pub struct ServerGroup {
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub attribute_data: Vec<HashMap<String, ServerAttributes>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerAttributes {
    #[serde(rename = "DISKUSEDPERCENT", default)]
    pub disk_used_percent: Value,
    #[serde(rename = "MEMUSEDPERCENT", default)]
    pub mem_used_percent: Value,
    #[serde(rename = "CPUUSEDPERCENT", default)]
    pub cpu_used_percent: Value,
}

/// `/api/msp/monitors/status`
#[derive(Debug, Default, Deserialize)]
pub struct MonitorStatusReport {
    #[serde(default)]
    pub data: Vec<MonitorStatusRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonitorStatusRow {
    #[serde(default, alias = "monitor_name")]
    pub name: String,
    #[serde(default)]
    pub monitor_type: String,
    #[serde(default)]
    pub status: Value,
}

/// `/api/reports/summary`
#[derive(Debug, Default, Deserialize)]
pub struct SummaryReport {
    #[serde(default)]
    pub data: SummaryData,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryData {
    #[serde(default)]
    pub summary_details: SummaryDetails,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryDetails {
    #[serde(default)]
    pub availability_percentage: Value,
    #[serde(default)]
    pub downtime_percentage: Value,
    #[serde(default)]
    pub downtime_duration: Value,
    #[serde(default)]
    pub maintenance_percentage: Value,
    #[serde(default)]
    pub maintenance_duration: Value,
    #[serde(default)]
    pub alarm_count: Value,
    #[serde(default)]
    pub down_count: Value,
}

/// `/api/current_status` (flat monitor list) and
/// `/api/current_status/group` (grouped variant).
#[derive(Debug, Default, Deserialize)]
pub struct CurrentStatusReport {
    #[serde(default)]
    pub data: CurrentStatusData,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentStatusData {
    #[serde(default)]
    pub monitors: Vec<CurrentMonitor>,
    #[serde(default)]
    pub monitor_groups: Vec<MonitorGroup>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentMonitor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub monitor_type: String,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub attribute_key: String,
    #[serde(default)]
    pub attribute_value: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonitorGroup {
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub monitors: Vec<CurrentMonitor>,
}

/// `/api/reports/trend` and `/api/reports/top_n/*` share the row layout:
/// one entry per monitor with a single reported attribute.
#[derive(Debug, Default, Deserialize)]
pub struct RankedReport {
    #[serde(default)]
    pub data: RankedData,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankedData {
    #[serde(default)]
    pub report: Vec<RankedRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankedRow {
    #[serde(default, alias = "monitor_name")]
    pub name: String,
    #[serde(default)]
    pub attribute_value: Value,
    #[serde(default)]
    pub availability_percentage: Value,
    #[serde(default)]
    pub response_time: Value,
}
