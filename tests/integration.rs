//! Integration tests for dq-agent.
//!
//! Drives the whole pipeline the way the nightly job does: a dated CSV
//! drop on disk, one check run, report files out.

use chrono::NaiveDate;
use dq_agent::{
    daily_file_path, report, run_checks, CheckConfig, Error, FindingCategory, OrderDataset,
};

/// A day's drop with every kind of problem the detectors know about.
const SAMPLE_DROP: &str = "\
order_id,order_date,customer_id,product_id,quantity,unit_price,amount
1002,2025-10-25,C002,P02,1,15000,15000
1002,2025-10-25,C002,P02,1,15000,15000
1003,2025-10-25,,P03,3,10000,30000
1004,2025-10-25,C004,P04,5,50000,10
1005,2025-10-25,C005,P05,0,20000,0
1006,2025-10-25,C006,P06,-1,5000,-5000
1007,2025-10-25,C007,P07,2,0,0
1008,2025/10/25,C008,P08,1,12000,12000
1009,invalid_date,C009,P09,1,8000,8000
1010,2025-10-24,C010,P10,2,9000,18000
1011,2025-12-31,C011,P11,1,7000,7000
1012,2024-01-01,C012,P12,1,6000,6000
";

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 25).unwrap()
}

fn run_sample() -> dq_agent::Summary {
    let dataset = OrderDataset::from_csv_str(SAMPLE_DROP).unwrap();
    run_checks(&dataset, &CheckConfig::new(reference())).unwrap()
}

#[test]
fn test_end_to_end_category_counts() {
    let summary = run_sample();

    assert_eq!(summary.row_count, 12);
    assert_eq!(summary.category_count(FindingCategory::Missing), 1);
    assert_eq!(summary.category_count(FindingCategory::Duplicate), 2);
    // quantity: 5 and -1 outside [-0.5, 3.5]; unit_price: 50000 outside
    // [-5625, 27375]; amount: nothing outside [-22481.25, 37488.75].
    assert_eq!(summary.category_count(FindingCategory::Outlier), 3);
    // 3 non-positive, 1 arithmetic, 2 format, 3 reference mismatches.
    assert_eq!(summary.category_count(FindingCategory::BusinessRule), 9);
    assert_eq!(summary.total_findings(), 15);
}

#[test]
fn test_end_to_end_duplicates() {
    let summary = run_sample();
    let dup_rows: Vec<usize> = summary
        .findings
        .iter()
        .filter(|f| f.category == FindingCategory::Duplicate)
        .map(|f| f.row)
        .collect();
    assert_eq!(dup_rows, vec![0, 1]);
    assert!(summary
        .findings
        .iter()
        .filter(|f| f.category == FindingCategory::Duplicate)
        .all(|f| f.value.as_deref() == Some("1002")));
}

#[test]
fn test_end_to_end_missing_customer() {
    let summary = run_sample();
    let missing: Vec<_> = summary
        .findings
        .iter()
        .filter(|f| f.category == FindingCategory::Missing)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].row, 2);
    assert_eq!(missing[0].column.as_deref(), Some("customer_id"));
}

#[test]
fn test_end_to_end_business_rules() {
    let summary = run_sample();
    let rule_findings: Vec<_> = summary
        .findings
        .iter()
        .filter(|f| f.category == FindingCategory::BusinessRule)
        .collect();

    let arithmetic: Vec<usize> = rule_findings
        .iter()
        .filter(|f| f.reason.contains("does not equal"))
        .map(|f| f.row)
        .collect();
    assert_eq!(arithmetic, vec![3]);

    let non_positive: Vec<(usize, &str)> = rule_findings
        .iter()
        .filter(|f| f.reason.contains("not positive"))
        .map(|f| (f.row, f.column.as_deref().unwrap()))
        .collect();
    assert_eq!(
        non_positive,
        vec![(4, "quantity"), (5, "quantity"), (6, "unit_price")]
    );

    let bad_format: Vec<usize> = rule_findings
        .iter()
        .filter(|f| f.reason.contains("YYYY-MM-DD"))
        .map(|f| f.row)
        .collect();
    assert_eq!(bad_format, vec![7, 8]);

    let mismatched: Vec<usize> = rule_findings
        .iter()
        .filter(|f| f.reason.contains("reference date"))
        .map(|f| f.row)
        .collect();
    assert_eq!(mismatched, vec![9, 10, 11]);
}

#[test]
fn test_format_violation_is_not_double_counted() {
    // 2025/10/25 matches the reference date in substance, but only the
    // format rule may fire for it.
    let summary = run_sample();
    assert_eq!(summary.row_findings(7).len(), 1);
    assert_eq!(summary.row_findings(8).len(), 1);
}

#[test]
fn test_end_to_end_schema_and_date_stats() {
    let summary = run_sample();

    assert!(summary.schema.conforms());
    assert_eq!(summary.schema.required_columns.len(), 7);

    assert_eq!(summary.date_stats.column, "order_date");
    // 2025/10/25 and invalid_date are the two unparseable cells.
    assert_eq!(summary.date_stats.parsed_count, 10);
    assert_eq!(summary.date_stats.failed_count, 2);
}

#[test]
fn test_end_to_end_truncated_schema_still_checked() {
    // Same drop without the customer_id column: the run completes, the
    // schema section carries the gap, and the other detectors still work.
    let csv = "\
order_id,order_date,product_id,quantity,unit_price,amount
1002,2025-10-25,P02,1,15000,15000
1002,2025-10-25,P02,1,15000,15000
1004,2025-10-25,P04,5,50000,10
1005,2025-10-25,P05,0,20000,0
1006,2025-10-25,P06,-1,5000,-5000
";
    let dataset = OrderDataset::from_csv_str(csv).unwrap();
    let summary = run_checks(&dataset, &CheckConfig::new(reference())).unwrap();

    assert_eq!(summary.schema.missing_required_columns, vec!["customer_id"]);
    assert_eq!(summary.category_count(FindingCategory::Duplicate), 2);
    assert_eq!(summary.category_count(FindingCategory::BusinessRule), 3);
}

#[test]
fn test_end_to_end_is_idempotent() {
    let first = run_sample();
    let second = run_sample();
    assert_eq!(first.findings, second.findings);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_daily_drop_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();

    let drop_path = daily_file_path(&data_dir, reference());
    assert!(drop_path.ends_with("sales_2025_10_25.csv"));
    std::fs::write(&drop_path, SAMPLE_DROP).unwrap();

    let dataset = OrderDataset::from_csv(&drop_path).unwrap();
    let summary = run_checks(&dataset, &CheckConfig::new(reference())).unwrap();
    assert_eq!(summary.total_findings(), 15);

    let reports_dir = dir.path().join("reports");
    let (json_path, md_path) = report::save_reports(&summary, &reports_dir, true).unwrap();
    assert!(json_path.exists());

    let md = std::fs::read_to_string(&md_path).unwrap();
    assert!(md.starts_with("# Data Quality Report - 2025-10-25"));
    assert!(md.contains("## Suggested actions"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["row_count"], 12);
    assert_eq!(json["findings"].as_array().unwrap().len(), 15);
}

#[test]
fn test_fatal_vs_clean_is_distinguishable() {
    // Unreadable file: could not run.
    let err = OrderDataset::from_csv("/nonexistent/sales.csv").unwrap_err();
    assert!(matches!(err, Error::Io { .. }));

    // Header-only file: ran, found nothing wrong.
    let dataset = OrderDataset::from_csv_str(
        "order_id,order_date,customer_id,product_id,quantity,unit_price,amount\n",
    )
    .unwrap();
    let summary = run_checks(&dataset, &CheckConfig::new(reference())).unwrap();
    assert!(!summary.has_findings());
}

#[test]
fn test_problem_rows_cover_every_flagged_row() {
    let summary = run_sample();
    // Every row in this drop has at least one issue.
    assert_eq!(summary.problem_rows.len(), 12);

    let row3 = summary.problem_rows.get(&3).unwrap();
    let amount = row3.iter().find(|f| f.column == "amount").unwrap();
    assert_eq!(amount.value, "10");
}
