//! Unit tests for analytics module.

use super::*;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use serde_json::json;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap()
}

fn result(id: u32, status: Option<u16>, ms: Option<u64>, timestamp: NaiveDateTime) -> TestResult {
    TestResult {
        id: id.to_string(),
        endpoint_id: "ep-1".to_string(),
        status_code: status,
        response_time_ms: ms,
        response_body: None,
        response_headers: None,
        error: None,
        success: crate::model::is_success_status(status),
        timestamp,
    }
}

fn defaults() -> AnalyticsConfig {
    AnalyticsConfig::default()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_empty_input_yields_zeroes() {
    let report = aggregate(&[], TimeRange::Last24Hours, now(), &defaults());

    assert!(report.points.is_empty());
    assert!(report.status_distribution.is_empty());
    assert_eq!(report.summary.total_requests, 0);
    assert_eq!(report.summary.total_errors, 0);
    assert_eq!(report.summary.average_response_time, 0);
    assert_eq!(report.summary.success_rate, 0.0);
    assert!(!report.summary.success_rate.is_nan());
    assert!(report.is_empty());
}

#[test]
fn test_two_ok_one_error_same_hour() {
    let ts = now() - Duration::minutes(10);
    let results = vec![
        result(1, Some(200), Some(100), ts),
        result(2, Some(200), Some(200), ts),
        result(3, Some(500), Some(300), ts),
    ];

    let report = aggregate(&results, TimeRange::Last24Hours, now(), &defaults());

    assert_eq!(report.summary.average_response_time, 200);
    assert_eq!(report.summary.total_requests, 3);
    assert_eq!(report.summary.total_errors, 1);
    assert_eq!(report.summary.success_rate, 66.7);

    assert_eq!(report.points.len(), 1);
    let point = &report.points[0];
    assert_eq!(point.time, "14:00");
    assert_eq!(point.response_time, 200);
    assert_eq!(point.requests, 3);
    assert_eq!(point.success, 2);
    assert_eq!(point.errors, 1);
    // 66.67% rounds half-up to 67
    assert_eq!(point.success_rate, 67);
}

#[test]
fn test_malformed_timestamp_lands_in_latest_bucket() {
    let raw = vec![
        json!({"id": 1, "endpointId": "ep-1", "statusCode": 200, "responseTime": 50, "timestamp": "2024-03-10T09:15:00"}),
        json!({"id": 2, "endpointId": "ep-1", "statusCode": 200, "responseTime": 70, "timestamp": "not-a-date"}),
    ];

    let report = aggregate_raw(&raw, TimeRange::Last24Hours, now(), &defaults());

    assert_eq!(report.summary.total_requests, 2);
    assert_eq!(report.data_quality.timestamp_fallbacks, 1);
    let last = report.points.last().unwrap();
    assert_eq!(last.time, "14:00");
    assert_eq!(last.requests, 1);
    assert_eq!(last.response_time, 70);
}

#[test]
fn test_results_outside_window_are_excluded() {
    let results = vec![
        result(1, Some(200), Some(10), now() - Duration::hours(25)),
        result(2, Some(200), Some(20), now() - Duration::hours(24)),
        result(3, Some(200), Some(30), now() + Duration::hours(1)),
    ];

    let report = aggregate(&results, TimeRange::Last24Hours, now(), &defaults());

    // Cutoff is inclusive and there is no upper bound
    assert_eq!(report.summary.total_requests, 2);
}

#[test]
fn test_tuple_and_string_timestamps_share_a_bucket() {
    let raw = vec![
        json!({"id": 1, "statusCode": 200, "responseTime": 10, "timestamp": [2024, 3, 10, 13, 5, 0, 0]}),
        json!({"id": 2, "statusCode": 200, "responseTime": 30, "timestamp": "2024-03-10T13:45:00"}),
    ];

    let report = aggregate_raw(&raw, TimeRange::Last24Hours, now(), &defaults());

    assert_eq!(report.points.len(), 1);
    assert_eq!(report.points[0].time, "13:00");
    assert_eq!(report.points[0].response_time, 20);
    assert!(report.data_quality.is_clean());
}

#[test]
fn test_buckets_sorted_across_midnight() {
    let late = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(23, 10, 0)
        .unwrap();
    let early = NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(1, 10, 0)
        .unwrap();
    // Input order is newest first; "01:00" sorts before "23:00" as a label
    let results = vec![
        result(1, Some(200), Some(10), early),
        result(2, Some(200), Some(10), late),
    ];

    let report = aggregate(&results, TimeRange::Last24Hours, now(), &defaults());

    let labels: Vec<&str> = report.points.iter().map(|p| p.time.as_str()).collect();
    assert_eq!(labels, vec!["23:00", "01:00"]);
}

#[test]
fn test_empty_hours_are_omitted() {
    let results = vec![
        result(1, Some(200), Some(10), now() - Duration::hours(5)),
        result(2, Some(200), Some(10), now()),
    ];

    let report = aggregate(&results, TimeRange::Last24Hours, now(), &defaults());
    assert_eq!(report.points.len(), 2);
}

#[test]
fn test_seven_day_hourly_labels() {
    let results = vec![result(1, Some(200), Some(10), now() - Duration::days(3))];

    let report = aggregate(&results, TimeRange::Last7Days, now(), &defaults());

    assert_eq!(report.granularity, Granularity::Hourly);
    assert_eq!(report.points[0].time, "Mar 07 14:00");
}

#[test]
fn test_seven_day_daily_when_configured() {
    let config = AnalyticsConfig {
        seven_day_granularity: Granularity::Daily,
        ..Default::default()
    };
    let day = now() - Duration::days(2);
    let results = vec![
        result(1, Some(200), Some(10), day - Duration::hours(3)),
        result(2, Some(200), Some(10), day + Duration::hours(3)),
    ];

    let report = aggregate(&results, TimeRange::Last7Days, now(), &config);

    assert_eq!(report.granularity, Granularity::Daily);
    assert_eq!(report.points.len(), 1);
    assert_eq!(report.points[0].time, "Mar 08");
    assert_eq!(report.points[0].requests, 2);
}

#[test]
fn test_thirty_day_buckets_are_daily_and_cross_months() {
    let results = vec![
        result(1, Some(200), Some(10), now() - Duration::days(1)),
        result(2, Some(200), Some(10), now() - Duration::days(12)),
    ];

    let report = aggregate(&results, TimeRange::Last30Days, now(), &defaults());

    let labels: Vec<&str> = report.points.iter().map(|p| p.time.as_str()).collect();
    assert_eq!(labels, vec!["Feb 27", "Mar 09"]);
    assert_eq!(
        report.points[0].bucket_start,
        NaiveDate::from_ymd_opt(2024, 2, 27).unwrap().and_hms_opt(0, 0, 0).unwrap()
    );
}

// ============================================================================
// Missing response times
// ============================================================================

#[test]
fn test_missing_response_time_counts_as_zero_by_default() {
    let ts = now();
    let results = vec![
        result(1, Some(200), Some(300), ts),
        result(2, None, None, ts),
    ];

    let report = aggregate(&results, TimeRange::Last24Hours, now(), &defaults());

    assert_eq!(report.points[0].response_time, 150);
    assert_eq!(report.summary.average_response_time, 150);
}

#[test]
fn test_missing_response_time_excluded_when_configured() {
    let config = AnalyticsConfig {
        missing_response_time: MissingResponseTime::Exclude,
        ..Default::default()
    };
    let ts = now();
    let results = vec![
        result(1, Some(200), Some(300), ts),
        result(2, None, None, ts),
    ];

    let report = aggregate(&results, TimeRange::Last24Hours, now(), &config);

    assert_eq!(report.points[0].response_time, 300);
    assert_eq!(report.summary.average_response_time, 300);
}

#[test]
fn test_percentiles_ignore_missing_timings() {
    let ts = now();
    let mut results: Vec<TestResult> = (1..=20)
        .map(|i| result(i, Some(200), Some(u64::from(i) * 10), ts))
        .collect();
    results.push(result(99, None, None, ts));

    let report = aggregate(&results, TimeRange::Last24Hours, now(), &defaults());

    assert_eq!(report.points[0].p95, Some(190));
    assert_eq!(report.points[0].p99, Some(200));
}

#[test]
fn test_percentiles_none_without_timings() {
    let results = vec![result(1, None, None, now())];
    let report = aggregate(&results, TimeRange::Last24Hours, now(), &defaults());
    assert_eq!(report.points[0].p95, None);
    assert_eq!(report.points[0].p99, None);
}

// ============================================================================
// Status distribution
// ============================================================================

#[test]
fn test_distribution_counts_exact_codes_sorted_by_count() {
    let ts = now();
    let results = vec![
        result(1, Some(200), Some(1), ts),
        result(2, Some(201), Some(1), ts),
        result(3, Some(503), Some(1), ts),
        result(4, Some(503), Some(1), ts),
        result(5, Some(404), Some(1), ts),
        result(6, Some(301), Some(1), ts),
        result(7, None, None, ts),
    ];

    let report = aggregate(&results, TimeRange::Last24Hours, now(), &defaults());
    let codes: Vec<(u16, u64)> = report
        .status_distribution
        .iter()
        .map(|s| (s.status_code, s.count))
        .collect();

    assert_eq!(codes, vec![(503, 2), (200, 1), (201, 1), (301, 1), (404, 1)]);
}

#[test]
fn test_distribution_colors_by_class() {
    assert_eq!(StatusClass::from_code(204).color(), "#10b981");
    assert_eq!(StatusClass::from_code(302).color(), "#3b82f6");
    assert_eq!(StatusClass::from_code(429).color(), "#f59e0b");
    assert_eq!(StatusClass::from_code(500).color(), "#ef4444");
    assert_eq!(StatusClass::from_code(102), StatusClass::Other);
    assert_eq!(StatusClass::from_code(102).color(), "#ef4444");
}

#[test]
fn test_explicit_success_flag_is_respected() {
    let mut failing_200 = result(1, Some(200), Some(10), now());
    failing_200.success = false;

    let report = aggregate(&[failing_200], TimeRange::Last24Hours, now(), &defaults());

    assert_eq!(report.summary.total_errors, 1);
    assert_eq!(report.points[0].errors, 1);
}

// ============================================================================
// Range parsing
// ============================================================================

#[test]
fn test_time_range_parsing_and_hours() {
    assert_eq!("24h".parse::<TimeRange>().unwrap(), TimeRange::Last24Hours);
    assert_eq!("7D".parse::<TimeRange>().unwrap(), TimeRange::Last7Days);
    assert_eq!("30d".parse::<TimeRange>().unwrap(), TimeRange::Last30Days);
    assert!("1y".parse::<TimeRange>().is_err());

    let hours: Vec<u32> = TimeRange::ALL.iter().map(TimeRange::hours).collect();
    assert_eq!(hours, vec![24, 168, 720]);
}

#[test]
fn test_report_serializes_camel_case() {
    let results = vec![result(1, Some(200), Some(10), now())];
    let report = aggregate(&results, TimeRange::Last7Days, now(), &defaults());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["range"], "7d");
    assert_eq!(json["granularity"], "hourly");
    assert_eq!(json["summary"]["totalRequests"], 1);
    assert_eq!(json["points"][0]["successRate"], 100);
    assert_eq!(json["statusDistribution"][0]["statusCode"], 200);
    assert_eq!(json["dataQuality"]["timestampFallbacks"], 0);
}

#[test]
fn test_huge_response_times_average_without_overflow() {
    let ts = "2024-03-10T14:05:00";
    let raw = vec![
        json!({"id": 1, "statusCode": 200, "responseTime": 10_000_000_000_000_000_000u64, "timestamp": ts}),
        json!({"id": 2, "statusCode": 200, "responseTime": 1.0e19, "timestamp": ts}),
        json!({"id": 3, "statusCode": 200, "responseTime": 1.0e300, "timestamp": ts}),
    ];

    let report = aggregate_raw(&raw, TimeRange::Last24Hours, now(), &defaults());

    assert_eq!(report.summary.total_requests, 3);
    assert_eq!(report.points.len(), 1);
    // 1e300 clamps to u64::MAX; the sum of all three exceeds u64::MAX
    assert_eq!(report.points[0].response_time, 12_815_581_357_903_183_872);
    assert_eq!(
        report.summary.average_response_time,
        12_815_581_357_903_183_872
    );
    assert_eq!(report.points[0].p99, Some(u64::MAX));
}

#[test]
fn test_single_huge_response_time_is_reported_exactly() {
    let raw = vec![json!({
        "id": 1,
        "statusCode": 200,
        "responseTime": 10_000_000_000_000_000_000u64,
        "timestamp": "2024-03-10T14:05:00"
    })];

    let report = aggregate_raw(&raw, TimeRange::Last24Hours, now(), &defaults());

    assert_eq!(
        report.summary.average_response_time,
        10_000_000_000_000_000_000
    );
}

#[test]
fn test_adversarial_numeric_fields_degrade_quietly() {
    let ts = "2024-03-10T14:05:00";
    let raw = vec![
        json!({"id": 1, "statusCode": -200, "responseTime": -5, "timestamp": ts}),
        json!({"id": 2, "statusCode": 200.0, "responseTime": 12.5, "timestamp": ts}),
        json!({"id": 3, "statusCode": 70_000, "responseTime": "fast", "timestamp": ts}),
        json!({"id": 4, "statusCode": 200, "responseTime": 8, "timestamp": [i64::MAX, 1, 1]}),
        json!({"id": 5, "statusCode": 200, "responseTime": 8, "timestamp": i64::MIN}),
    ];

    let report = aggregate_raw(&raw, TimeRange::Last24Hours, now(), &defaults());

    assert_eq!(report.summary.total_requests, 5);
    assert_eq!(report.data_quality.timestamp_fallbacks, 2);
    let codes: u64 = report.status_distribution.iter().map(|s| s.count).sum();
    assert!(codes <= 5);
}

// ============================================================================
// Property Tests
// ============================================================================

fn arb_result() -> impl Strategy<Value = (Option<u16>, Option<u64>, i64)> {
    (
        prop::option::of(any::<u16>()),
        prop::option::of(prop_oneof![0u64..10_000, any::<u64>()]),
        0i64..(30 * 24 * 60),
    )
}

fn arb_number() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<u64>().prop_map(|n| json!(n)),
        any::<i64>().prop_map(|n| json!(n)),
        any::<f64>().prop_map(|n| json!(n)),
        "[0-9a-z.-]{0,8}".prop_map(|s| json!(s)),
        Just(Value::Null),
    ]
}

fn arb_raw_timestamp() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec(any::<i64>(), 0..8).prop_map(|parts| json!(parts)),
        prop::collection::vec(0i64..3000, 3..8).prop_map(|parts| json!(parts)),
        any::<i64>().prop_map(|millis| json!(millis)),
        "[0-9T:. -]{0,24}".prop_map(|s| json!(s)),
        Just(json!("2024-03-10T13:00:00")),
    ]
}

fn arb_raw_record() -> impl Strategy<Value = Value> {
    (arb_number(), arb_number(), arb_raw_timestamp(), any::<Option<bool>>()).prop_map(
        |(status, ms, timestamp, success)| {
            json!({
                "id": 1,
                "statusCode": status,
                "responseTime": ms,
                "timestamp": timestamp,
                "success": success,
            })
        },
    )
}

fn arb_range() -> impl Strategy<Value = TimeRange> {
    prop::sample::select(TimeRange::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_aggregate_raw_accepts_any_numeric_input(
        raw in prop::collection::vec(arb_raw_record(), 0..50),
        range in arb_range(),
    ) {
        let report = aggregate_raw(&raw, range, now(), &defaults());

        let bucketed: u64 = report.points.iter().map(|p| p.requests).sum();
        prop_assert_eq!(bucketed, report.summary.total_requests);
        prop_assert!(report.summary.total_requests <= raw.len() as u64);
        prop_assert!(report.summary.success_rate <= 100.0);
    }

    #[test]
    fn prop_success_plus_errors_equals_requests(
        specs in prop::collection::vec(arb_result(), 0..200),
        range in arb_range(),
    ) {
        let results: Vec<TestResult> = specs
            .iter()
            .enumerate()
            .map(|(i, (status, ms, minutes_ago))| {
                result(i as u32, *status, *ms, now() - Duration::minutes(*minutes_ago))
            })
            .collect();

        let report = aggregate(&results, range, now(), &defaults());

        for point in &report.points {
            prop_assert_eq!(point.success + point.errors, point.requests);
            prop_assert!(point.requests > 0);
            prop_assert!(point.success_rate <= 100);
        }
        let bucketed: u64 = report.points.iter().map(|p| p.requests).sum();
        prop_assert_eq!(bucketed, report.summary.total_requests);
    }

    #[test]
    fn prop_buckets_sorted_regardless_of_input_order(
        specs in prop::collection::vec(arb_result(), 1..100),
        range in arb_range(),
        seed in any::<u64>(),
    ) {
        let mut results: Vec<TestResult> = specs
            .iter()
            .enumerate()
            .map(|(i, (status, ms, minutes_ago))| {
                result(i as u32, *status, *ms, now() - Duration::minutes(*minutes_ago))
            })
            .collect();
        // Deterministic shuffle
        let len = results.len();
        for i in 0..len {
            let j = ((seed.wrapping_mul(i as u64 + 1)) % len as u64) as usize;
            results.swap(i, j);
        }

        let report = aggregate(&results, range, now(), &defaults());

        for pair in report.points.windows(2) {
            prop_assert!(pair[0].bucket_start < pair[1].bucket_start);
        }
    }

    #[test]
    fn prop_distribution_sorted_by_count_desc(
        codes in prop::collection::vec(prop::option::of(100u16..600), 0..200),
    ) {
        let results: Vec<TestResult> = codes
            .iter()
            .enumerate()
            .map(|(i, code)| result(i as u32, *code, Some(1), now()))
            .collect();

        let report = aggregate(&results, TimeRange::Last24Hours, now(), &defaults());

        for pair in report.status_distribution.windows(2) {
            prop_assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].status_code < pair[1].status_code)
            );
        }
        let tallied: u64 = report.status_distribution.iter().map(|s| s.count).sum();
        prop_assert_eq!(tallied, codes.iter().filter(|c| c.is_some()).count() as u64);
    }
}
