//! Output formatting helpers for CLI commands

use crate::analytics::{AnalyticsReport, StatusClass};
use crate::model::{Alarm, ApiKey, Endpoint, User};
use crate::views::TestOutcome;
use chrono::NaiveDateTime;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn format_time(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Status code colored by class
pub fn colored_status(status: Option<u16>) -> String {
    match status {
        Some(code) => {
            let text = code.to_string();
            match StatusClass::from_code(code) {
                StatusClass::Success => text.green().to_string(),
                StatusClass::Redirect => text.blue().to_string(),
                StatusClass::ClientError => text.yellow().to_string(),
                StatusClass::ServerError | StatusClass::Other => text.red().to_string(),
            }
        }
        None => "-".dimmed().to_string(),
    }
}

/// Pretty JSON for `--json` output
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format endpoints as a table
pub fn format_endpoints_table(endpoints: &[Endpoint]) -> String {
    if endpoints.is_empty() {
        return "No endpoints configured.".to_string();
    }

    let mut table = new_table(vec!["ID", "Name", "Method", "URL", "Headers", "Recurring", "Updated"]);
    for e in endpoints {
        let recurring = match (e.recurring_enabled, e.recurring_interval) {
            (true, Some(interval)) => interval.to_string().cyan().to_string(),
            _ => "off".dimmed().to_string(),
        };
        table.add_row(vec![
            Cell::new(&e.id),
            Cell::new(&e.name),
            Cell::new(e.method),
            Cell::new(&e.url),
            Cell::new(e.headers.len()),
            Cell::new(recurring),
            Cell::new(format_time(&e.updated_at)),
        ]);
    }

    table.to_string()
}

/// Format one endpoint with its headers and body
pub fn format_endpoint_detail(endpoint: &Endpoint) -> String {
    let mut table = new_table(vec!["Field", "Value"]);
    let headers = if endpoint.headers.is_empty() {
        "-".to_string()
    } else {
        endpoint.headers.to_text()
    };
    let recurring = match (endpoint.recurring_enabled, endpoint.recurring_interval) {
        (true, Some(interval)) => format!("every {}", interval),
        _ => "off".to_string(),
    };

    table.add_row(vec![Cell::new("ID"), Cell::new(&endpoint.id)]);
    table.add_row(vec![Cell::new("Name"), Cell::new(&endpoint.name)]);
    table.add_row(vec![Cell::new("Method"), Cell::new(endpoint.method)]);
    table.add_row(vec![Cell::new("URL"), Cell::new(&endpoint.url)]);
    table.add_row(vec![Cell::new("Headers"), Cell::new(headers)]);
    table.add_row(vec![
        Cell::new("Body"),
        Cell::new(endpoint.body.as_deref().unwrap_or("-")),
    ]);
    table.add_row(vec![Cell::new("Recurring"), Cell::new(recurring)]);
    table.add_row(vec![Cell::new("Created"), Cell::new(format_time(&endpoint.created_at))]);
    table.add_row(vec![Cell::new("Updated"), Cell::new(format_time(&endpoint.updated_at))]);

    table.to_string()
}

/// Format a test-now verdict
pub fn format_test_outcome(outcome: &TestOutcome) -> String {
    let summary = outcome.summary();
    if outcome.passed {
        format!("{} {}", "✓".green(), summary.green())
    } else {
        format!("{} {}", "✗".red(), summary.red())
    }
}

/// Format an analytics report: summary, bucket table and status distribution
pub fn format_report(report: &AnalyticsReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    out.push_str(&format!(
        "{} ({}, {} buckets)\n",
        format!("Analytics for the last {}", report.range).bold(),
        match report.granularity {
            crate::analytics::Granularity::Hourly => "hourly",
            crate::analytics::Granularity::Daily => "daily",
        },
        report.points.len()
    ));
    out.push_str(&format!(
        "Requests: {}  Errors: {}  Success rate: {:.1}%  Avg response: {}ms\n",
        summary.total_requests, summary.total_errors, summary.success_rate, summary.average_response_time
    ));

    if report.is_empty() {
        out.push_str("No test results in this range.\n");
        return out;
    }

    let mut points = new_table(vec![
        "Time", "Avg (ms)", "p95", "p99", "Requests", "Errors", "Success",
    ]);
    for p in &report.points {
        let rate = format!("{}%", p.success_rate);
        let rate = if p.success_rate >= 95 {
            rate.green().to_string()
        } else if p.success_rate >= 80 {
            rate.yellow().to_string()
        } else {
            rate.red().to_string()
        };
        points.add_row(vec![
            Cell::new(&p.time),
            Cell::new(p.response_time),
            Cell::new(or_dash(p.p95)),
            Cell::new(or_dash(p.p99)),
            Cell::new(p.requests),
            Cell::new(p.errors),
            Cell::new(rate),
        ]);
    }
    out.push_str(&points.to_string());
    out.push('\n');

    if !report.status_distribution.is_empty() {
        let mut distribution = new_table(vec!["Status", "Count", "Class"]);
        for s in &report.status_distribution {
            distribution.add_row(vec![
                Cell::new(colored_status(Some(s.status_code))),
                Cell::new(s.count),
                Cell::new(s.class.label()),
            ]);
        }
        out.push_str(&distribution.to_string());
        out.push('\n');
    }

    let quality = &report.data_quality;
    if !quality.is_clean() {
        out.push_str(&format!(
            "{}\n",
            format!(
                "Note: {} record(s) had unreadable timestamps and were counted as now; {} record(s) were skipped.",
                quality.timestamp_fallbacks, quality.skipped_records
            )
            .yellow()
        ));
    }

    out
}

/// Format active alarms as a table
pub fn format_alarms_table(alarms: &[Alarm]) -> String {
    if alarms.is_empty() {
        return format!("{} No active alarms.", "✓".green());
    }

    let mut table = new_table(vec!["Test Result", "Endpoint", "URL", "Status", "Error", "Time"]);
    for a in alarms {
        table.add_row(vec![
            Cell::new(&a.test_result_id),
            Cell::new(&a.endpoint_name),
            Cell::new(&a.endpoint_url),
            Cell::new(colored_status(a.status_code)),
            Cell::new(a.error.as_deref().unwrap_or("-")),
            Cell::new(format_time(&a.timestamp)),
        ]);
    }

    table.to_string()
}

/// Format API keys; values are masked unless `reveal` is set
pub fn format_api_keys_table(keys: &[ApiKey], reveal: bool) -> String {
    if keys.is_empty() {
        return "No API keys stored.".to_string();
    }

    let mut table = new_table(vec!["ID", "Name", "Value", "Created"]);
    for k in keys {
        let value = if reveal {
            k.key_value.clone()
        } else {
            k.masked_value()
        };
        table.add_row(vec![
            Cell::new(&k.id),
            Cell::new(&k.name),
            Cell::new(value),
            Cell::new(or_dash(k.created_at.as_ref().map(format_time))),
        ]);
    }

    table.to_string()
}

/// Format the authenticated user
pub fn format_user(user: &User) -> String {
    format!("{} <{}> (id {})", user.name.bold(), user.email, user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{aggregate, AnalyticsConfig, TimeRange};
    use crate::model::{Headers, HttpMethod, TestResult};
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 4)
            .unwrap()
            .and_hms_opt(10, 20, 30)
            .unwrap()
    }

    fn create_test_endpoint() -> Endpoint {
        Endpoint {
            id: "ep-1".to_string(),
            name: "health".to_string(),
            url: "https://api.example.com/health".to_string(),
            method: HttpMethod::Get,
            headers: Headers::parse("Accept: application/json"),
            body: None,
            recurring_enabled: true,
            recurring_interval: Some(crate::model::RecurringInterval::FiveMinutes),
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn test_format_endpoints_table() {
        let output = format_endpoints_table(&[create_test_endpoint()]);
        assert!(output.contains("health"));
        assert!(output.contains("https://api.example.com/health"));
        assert!(output.contains("GET"));
        assert!(output.contains("5m"));
    }

    #[test]
    fn test_format_endpoints_table_empty() {
        assert_eq!(format_endpoints_table(&[]), "No endpoints configured.");
    }

    #[test]
    fn test_format_endpoint_detail_shows_headers_text() {
        let output = format_endpoint_detail(&create_test_endpoint());
        assert!(output.contains("Accept: application/json"));
        assert!(output.contains("every 5m"));
    }

    #[test]
    fn test_format_api_keys_masked_by_default() {
        let key = ApiKey {
            id: "1".to_string(),
            name: "stripe".to_string(),
            key_value: "sk_live_abcdef123456".to_string(),
            created_at: Some(ts()),
            updated_at: None,
        };

        let masked = format_api_keys_table(std::slice::from_ref(&key), false);
        assert!(masked.contains("sk_l••••••••3456"));
        assert!(!masked.contains("sk_live_abcdef123456"));

        let revealed = format_api_keys_table(&[key], true);
        assert!(revealed.contains("sk_live_abcdef123456"));
    }

    #[test]
    fn test_format_alarms_table() {
        let alarm = Alarm {
            test_result_id: "77".to_string(),
            endpoint_id: "ep-1".to_string(),
            endpoint_name: "health".to_string(),
            endpoint_url: "https://api.example.com/health".to_string(),
            error: Some("Connection refused".to_string()),
            status_code: None,
            timestamp: ts(),
        };
        let output = format_alarms_table(&[alarm]);
        assert!(output.contains("77"));
        assert!(output.contains("Connection refused"));
        assert!(output.contains("2024-05-04 10:20:30"));
    }

    #[test]
    fn test_format_report_empty() {
        let report = aggregate(&[], TimeRange::Last24Hours, ts(), &AnalyticsConfig::default());
        let output = format_report(&report);
        assert!(output.contains("No test results in this range."));
        assert!(output.contains("Success rate: 0.0%"));
    }

    #[test]
    fn test_format_report_with_points() {
        let result = TestResult {
            id: "1".to_string(),
            endpoint_id: "ep-1".to_string(),
            status_code: Some(503),
            response_time_ms: Some(250),
            response_body: None,
            response_headers: None,
            error: None,
            success: false,
            timestamp: ts(),
        };
        let report = aggregate(&[result], TimeRange::Last24Hours, ts(), &AnalyticsConfig::default());
        let output = format_report(&report);
        assert!(output.contains("10:00"));
        assert!(output.contains("250"));
        assert!(output.contains("503"));
        assert!(output.contains("5xx"));
    }

    #[test]
    fn test_format_json_pretty() {
        let json = format_json(&serde_json::json!({"count": 3})).unwrap();
        assert!(json.contains("\"count\": 3"));
    }
}
