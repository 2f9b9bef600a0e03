//! Per-category renderers.
//!
//! Each function decodes the raw JSON document into its typed shape and
//! walks it deterministically, emitting one family per logical metric.
//! A decode failure is a `RenderError`; nothing is partially emitted.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ExporterError;
use crate::render::exposition::{sanitize_metric_value, Exposition, MetricKind};
use crate::upstream::models::{
    CurrentStatusReport, MonitorStatusReport, PerformanceReport, RankedReport, ServerAttributes,
    ServerGroup, SummaryReport,
};
use crate::upstream::Category;

const STATUS_HELP_SUFFIX: &str = "(0=down 1=up 2=trouble 3=critical 5=suspended)";

/// Decode and render one category. Pure: no I/O, no partial output.
pub fn render_category(
    category: Category,
    document: &Value,
    instance: &str,
) -> Result<String, ExporterError> {
    let text = match category {
        Category::ServerPerformance => {
            render_server_performance(&decode(category, document)?, instance)
        }
        Category::MonitorStatus => render_monitor_status(&decode(category, document)?, instance),
        Category::SummaryReport => render_summary_report(&decode(category, document)?, instance),
        Category::CurrentStatus => render_current_status(&decode(category, document)?, instance),
        Category::CurrentStatusGroups => {
            render_current_status_groups(&decode(category, document)?, instance)
        }
        Category::TrendReport => render_trend_report(&decode(category, document)?, instance),
        Category::TopAvailability => render_top_availability(&decode(category, document)?, instance),
        Category::TopServer => render_top_server(&decode(category, document)?, instance),
    };
    Ok(text)
}

fn decode<T: DeserializeOwned>(category: Category, document: &Value) -> Result<T, ExporterError> {
    serde_json::from_value(document.clone()).map_err(|e| ExporterError::Render {
        category,
        detail: e.to_string(),
    })
}

fn render_server_performance(report: &PerformanceReport, instance: &str) -> String {
    let group = &report.data.group_data.server;
    let mut exposition = Exposition::new();

    emit_server_family(
        &mut exposition,
        group,
        instance,
        "site24x7_server_disk_used_percent",
        "Disk Used Percentage",
        |a| &a.disk_used_percent,
    );
    emit_server_family(
        &mut exposition,
        group,
        instance,
        "site24x7_server_mem_used_percent",
        "Memory Used Percentage",
        |a| &a.mem_used_percent,
    );
    emit_server_family(
        &mut exposition,
        group,
        instance,
        "site24x7_server_cpu_used_percent",
        "CPU Used Percentage",
        |a| &a.cpu_used_percent,
    );

    exposition.finish()
}

fn emit_server_family<'a>(
    exposition: &mut Exposition,
    group: &'a ServerGroup,
    instance: &str,
    name: &str,
    help: &str,
    pick: impl Fn(&'a ServerAttributes) -> &'a Value,
) {
    let mut family = exposition.family(name, help, MetricKind::Gauge);
    for (index, server_name) in group.name.iter().enumerate() {
        // attribute_data is a parallel array keyed by aggregation slot "0"
        let value = group
            .attribute_data
            .get(index)
            .and_then(|samples| samples.get("0"))
            .map(|attributes| sanitize_metric_value(pick(attributes)))
            .unwrap_or_else(|| "0.0".to_string());
        family.sample(&[("server", server_name), ("instance", instance)], &value);
    }
}

fn render_monitor_status(report: &MonitorStatusReport, instance: &str) -> String {
    let mut exposition = Exposition::new();
    let mut family = exposition.family(
        "site24x7_monitor_status",
        &format!("Global monitor status {}", STATUS_HELP_SUFFIX),
        MetricKind::Gauge,
    );
    for row in &report.data {
        family.sample(
            &[
                ("monitor", &row.name),
                ("monitor_type", &row.monitor_type),
                ("instance", instance),
            ],
            &sanitize_metric_value(&row.status),
        );
    }
    exposition.finish()
}

fn render_summary_report(report: &SummaryReport, instance: &str) -> String {
    let details = &report.data.summary_details;
    let mut exposition = Exposition::new();

    let scalars: [(&str, &str, &Value); 7] = [
        (
            "site24x7_summary_availability_percent",
            "Overall availability percentage for the period",
            &details.availability_percentage,
        ),
        (
            "site24x7_summary_downtime_percent",
            "Overall downtime percentage for the period",
            &details.downtime_percentage,
        ),
        (
            "site24x7_summary_downtime_duration_seconds",
            "Total downtime duration for the period",
            &details.downtime_duration,
        ),
        (
            "site24x7_summary_maintenance_percent",
            "Overall maintenance percentage for the period",
            &details.maintenance_percentage,
        ),
        (
            "site24x7_summary_maintenance_duration_seconds",
            "Total maintenance duration for the period",
            &details.maintenance_duration,
        ),
        (
            "site24x7_summary_alarm_count",
            "Alarms raised in the period",
            &details.alarm_count,
        ),
        (
            "site24x7_summary_down_count",
            "Down events in the period",
            &details.down_count,
        ),
    ];

    for (name, help, value) in scalars {
        exposition
            .family(name, help, MetricKind::Gauge)
            .sample(&[("instance", instance)], &sanitize_metric_value(value));
    }

    exposition.finish()
}

fn render_current_status(report: &CurrentStatusReport, instance: &str) -> String {
    let mut exposition = Exposition::new();
    {
        let mut family = exposition.family(
            "site24x7_current_status",
            &format!("Current monitor status {}", STATUS_HELP_SUFFIX),
            MetricKind::Gauge,
        );
        for monitor in &report.data.monitors {
            family.sample(
                &[
                    ("monitor", &monitor.name),
                    ("monitor_type", &monitor.monitor_type),
                    ("instance", instance),
                ],
                &sanitize_metric_value(&monitor.status),
            );
        }
    }
    {
        let mut family = exposition.family(
            "site24x7_monitor_attribute_value",
            "Last polled attribute value per monitor",
            MetricKind::Gauge,
        );
        for monitor in &report.data.monitors {
            family.sample(
                &[
                    ("monitor", &monitor.name),
                    ("attribute", &monitor.attribute_key),
                    ("instance", instance),
                ],
                &sanitize_metric_value(&monitor.attribute_value),
            );
        }
    }
    exposition.finish()
}

fn render_current_status_groups(report: &CurrentStatusReport, instance: &str) -> String {
    let mut exposition = Exposition::new();
    {
        let mut family = exposition.family(
            "site24x7_group_status",
            &format!("Monitor group status {}", STATUS_HELP_SUFFIX),
            MetricKind::Gauge,
        );
        for group in &report.data.monitor_groups {
            family.sample(
                &[("group", &group.group_name), ("instance", instance)],
                &sanitize_metric_value(&group.status),
            );
        }
    }
    {
        let mut family = exposition.family(
            "site24x7_group_monitor_count",
            "Monitors in the group",
            MetricKind::Gauge,
        );
        for group in &report.data.monitor_groups {
            family.sample(
                &[("group", &group.group_name), ("instance", instance)],
                &format!("{}", group.monitors.len()),
            );
        }
    }
    exposition.finish()
}

fn render_trend_report(report: &RankedReport, instance: &str) -> String {
    let mut exposition = Exposition::new();
    {
        let mut family = exposition.family(
            "site24x7_trend_availability_percent",
            "Availability percentage over the trend period per monitor",
            MetricKind::Gauge,
        );
        for row in &report.data.report {
            family.sample(
                &[("monitor", &row.name), ("instance", instance)],
                &sanitize_metric_value(&row.availability_percentage),
            );
        }
    }
    {
        let mut family = exposition.family(
            "site24x7_trend_response_time_ms",
            "Average response time over the trend period per monitor",
            MetricKind::Gauge,
        );
        for row in &report.data.report {
            family.sample(
                &[("monitor", &row.name), ("instance", instance)],
                &sanitize_metric_value(&row.response_time),
            );
        }
    }
    exposition.finish()
}

fn render_top_availability(report: &RankedReport, instance: &str) -> String {
    let mut exposition = Exposition::new();
    let mut family = exposition.family(
        "site24x7_top_availability_percent",
        "Top-N monitors by availability percentage",
        MetricKind::Gauge,
    );
    for row in &report.data.report {
        family.sample(
            &[("monitor", &row.name), ("instance", instance)],
            &sanitize_metric_value(&row.attribute_value),
        );
    }
    exposition.finish()
}

fn render_top_server(report: &RankedReport, instance: &str) -> String {
    let mut exposition = Exposition::new();
    let mut family = exposition.family(
        "site24x7_top_server_utilization_percent",
        "Top-N servers by resource utilization",
        MetricKind::Gauge,
    );
    for row in &report.data.report {
        family.sample(
            &[("server", &row.name), ("instance", instance)],
            &sanitize_metric_value(&row.attribute_value),
        );
    }
    exposition.finish()
}
