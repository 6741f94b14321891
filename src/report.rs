//! Report rendering.
//!
//! Thin formatting layer over [`Summary`]: no decisions are made here, the
//! detectors already made all of them. Each run can emit a Markdown report
//! for humans and a JSON report for machines, both named after the
//! reference date, plus an optional plain-language narrative section.

use std::path::{Path, PathBuf};

use crate::{
    detect::{FindingCategory, Summary},
    error::{Error, Result},
};

/// Renders the Markdown report for one run.
pub fn render_markdown(summary: &Summary) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "# Data Quality Report - {}\n\n",
        summary.reference_date
    ));

    md.push_str("## 1. Status\n");
    md.push_str(&format!("- rows checked: {}\n", summary.row_count));
    md.push_str(&format!("- columns: {}\n", summary.column_count));
    md.push_str(&format!("- total findings: {}\n", summary.total_findings()));
    md.push_str(&format!(
        "- affected rows: {}\n\n",
        summary.problem_rows.len()
    ));

    md.push_str("## 2. Findings by category\n");
    for category in &summary.categories {
        md.push_str(&format!(
            "- {}: {} ({})\n",
            category.category,
            category.count,
            percent(category.ratio)
        ));
    }
    md.push('\n');

    md.push_str("## 3. Missing values by column\n");
    if summary.missing.is_empty() {
        md.push_str("- (no columns)\n");
    }
    for stats in &summary.missing {
        md.push_str(&format!(
            "- {}: {} ({})\n",
            stats.column,
            stats.missing_count,
            percent(stats.missing_ratio)
        ));
    }
    md.push('\n');

    md.push_str("## 4. Schema\n");
    md.push_str(&format!(
        "- required columns: {}\n",
        summary.schema.required_columns.join(", ")
    ));
    md.push_str(&format!(
        "- missing required columns: {}\n",
        join_or_none(&summary.schema.missing_required_columns)
    ));
    md.push_str(&format!(
        "- extra columns: {}\n\n",
        join_or_none(&summary.schema.extra_columns)
    ));

    md.push_str("## 5. Date column\n");
    md.push_str(&format!(
        "- {}: parsed {}, failed {}\n\n",
        summary.date_stats.column,
        summary.date_stats.parsed_count,
        summary.date_stats.failed_count
    ));

    md.push_str("## 6. Outlier bounds (IQR)\n");
    if summary.outlier_bounds.is_empty() {
        md.push_str("- (no numeric column had enough values)\n");
    }
    for bounds in &summary.outlier_bounds {
        md.push_str(&format!(
            "- {}: Q1={}, Q3={}, bounds [{}, {}], n={}\n",
            bounds.column, bounds.q1, bounds.q3, bounds.lower, bounds.upper, bounds.sample_size
        ));
    }
    md.push('\n');

    md.push_str("## 7. Problem rows\n");
    if summary.problem_rows.is_empty() {
        md.push_str("- none\n");
    }
    for (&row, fields) in &summary.problem_rows {
        let content: Vec<String> = fields
            .iter()
            .map(|f| format!("{}={}", f.column, f.value))
            .collect();
        md.push_str(&format!("- **row {}** (`{}`)\n", row, content.join(", ")));
        for finding in summary.row_findings(row) {
            md.push_str(&format!("  - [{}] {}\n", finding.category, finding.reason));
        }
    }

    md
}

/// Renders the JSON report (the full [`Summary`] contract, pretty-printed).
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(summary: &Summary) -> Result<String> {
    serde_json::to_string_pretty(summary).map_err(|e| Error::Format(e.to_string()))
}

/// Renders a plain-language digest of the run.
///
/// Deterministic template over the summary, written for readers who will
/// not open the finding list. Same inputs, same text.
pub fn render_narrative(summary: &Summary) -> String {
    let mut md = String::new();

    md.push_str("## Summary\n");
    if summary.row_count == 0 {
        md.push_str(&format!(
            "The dataset for {} contains no data rows; there was nothing to check.\n\n",
            summary.reference_date
        ));
        return md;
    }
    md.push_str(&format!(
        "The dataset for {} contains {} rows across {} columns. ",
        summary.reference_date, summary.row_count, summary.column_count
    ));
    if summary.has_findings() {
        md.push_str(&format!(
            "{} issues were detected in {} rows.\n\n",
            summary.total_findings(),
            summary.problem_rows.len()
        ));
    } else {
        md.push_str("No issues were detected.\n\n");
        return md;
    }

    md.push_str("## Notable issues\n");
    for stats in &summary.missing {
        if stats.missing_count > 0 {
            md.push_str(&format!(
                "- Column `{}` is missing {} values ({}).\n",
                stats.column,
                stats.missing_count,
                percent(stats.missing_ratio)
            ));
        }
    }
    for category in &summary.categories {
        if category.count == 0 {
            continue;
        }
        let text = match category.category {
            // Per-column missing lines above already cover this.
            FindingCategory::Missing => continue,
            FindingCategory::Duplicate => "rows share a duplicate key",
            FindingCategory::Outlier => "numeric values fall outside their IQR bounds",
            FindingCategory::BusinessRule => "rows violate business rules",
        };
        md.push_str(&format!("- {} {}.\n", category.count, text));
    }
    md.push('\n');

    md.push_str("## Suggested actions\n");
    md.push_str("- Review the problem rows listed above with the upstream data owner.\n");
    if summary.category_count(FindingCategory::Duplicate) > 0 {
        md.push_str("- Confirm whether duplicated keys are re-submissions or export glitches.\n");
    }
    if summary.category_count(FindingCategory::BusinessRule) > 0 {
        md.push_str(
            "- Check the order-entry pipeline for the rows with rule violations before they reach billing.\n",
        );
    }

    md
}

/// Writes the JSON and Markdown reports for one run into `dir`, creating it
/// if needed.
///
/// File names follow the daily drop convention:
/// `quality_report_YYYY_MM_DD.json` and `quality_report_YYYY_MM_DD.md`.
/// Returns the two paths (JSON first).
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
pub fn save_reports(
    summary: &Summary,
    dir: impl AsRef<Path>,
    include_narrative: bool,
) -> Result<(PathBuf, PathBuf)> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| Error::io(e, dir))?;

    let stamp = summary.reference_date.format("%Y_%m_%d");
    let json_path = dir.join(format!("quality_report_{}.json", stamp));
    let md_path = dir.join(format!("quality_report_{}.md", stamp));

    let json = render_json(summary)?;
    std::fs::write(&json_path, json).map_err(|e| Error::io(e, &json_path))?;

    let mut md = render_markdown(summary);
    if include_narrative {
        md.push('\n');
        md.push_str(&render_narrative(summary));
    }
    std::fs::write(&md_path, md).map_err(|e| Error::io(e, &md_path))?;

    Ok((json_path, md_path))
}

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

fn join_or_none(columns: &[String]) -> String {
    if columns.is_empty() {
        "(none)".to_string()
    } else {
        columns.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{config::CheckConfig, dataset::OrderDataset, detect::run_checks};

    const SAMPLE: &str = "\
order_id,order_date,customer_id,product_id,quantity,unit_price,amount
1001,2025-10-25,C001,P01,2,30000,60000
1002,2025-10-25,,P02,1,15000,15000
1002,2025-10-24,C002,P02,1,15000,15000
1003,2025-10-25,C003,P03,3,10000,30000
1004,2025-10-25,C004,P04,5,50000,10
";

    fn sample_summary() -> Summary {
        let dataset = OrderDataset::from_csv_str(SAMPLE).unwrap();
        let config = CheckConfig::new(NaiveDate::from_ymd_opt(2025, 10, 25).unwrap());
        run_checks(&dataset, &config).unwrap()
    }

    #[test]
    fn test_markdown_sections() {
        let md = render_markdown(&sample_summary());
        assert!(md.starts_with("# Data Quality Report - 2025-10-25"));
        assert!(md.contains("## 2. Findings by category"));
        assert!(md.contains("## 4. Schema"));
        assert!(md.contains("## 5. Date column"));
        assert!(md.contains("## 7. Problem rows"));
        assert!(md.contains("customer_id: 1 (20.00%)"));
        assert!(md.contains("- missing required columns: (none)"));
        assert!(md.contains("- order_date: parsed 5, failed 0"));
        assert!(md.contains("**row 1**"));
    }

    #[test]
    fn test_markdown_schema_section_lists_missing_columns() {
        let dataset = OrderDataset::from_csv_str(
            "order_id,order_date,quantity,unit_price,amount,channel\n\
             1001,2025-10-25,2,30000,60000,web\n",
        )
        .unwrap();
        let config = CheckConfig::new(NaiveDate::from_ymd_opt(2025, 10, 25).unwrap());
        let summary = run_checks(&dataset, &config).unwrap();

        let md = render_markdown(&summary);
        assert!(md.contains("- missing required columns: customer_id, product_id"));
        assert!(md.contains("- extra columns: channel"));
    }

    #[test]
    fn test_json_contract_fields() {
        let json = render_json(&sample_summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["row_count"], 5);
        assert_eq!(value["reference_date"], "2025-10-25");
        assert!(value["findings"].as_array().is_some());
        assert!(value["problem_rows"].as_object().is_some());
        assert_eq!(value["categories"][0]["category"], "missing");
        assert_eq!(
            value["schema"]["missing_required_columns"]
                .as_array()
                .unwrap()
                .len(),
            0
        );
        assert_eq!(value["date_stats"]["column"], "order_date");
        assert_eq!(value["date_stats"]["failed_count"], 0);
    }

    #[test]
    fn test_narrative_mentions_issues() {
        let narrative = render_narrative(&sample_summary());
        assert!(narrative.contains("## Summary"));
        assert!(narrative.contains("## Suggested actions"));
        assert!(narrative.contains("`customer_id`"));
    }

    #[test]
    fn test_narrative_clean_run() {
        let dataset = OrderDataset::from_csv_str(
            "order_id,order_date,customer_id,product_id,quantity,unit_price,amount\n\
             1001,2025-10-25,C001,P01,2,30000,60000\n\
             1002,2025-10-25,C002,P02,1,15000,15000\n\
             1003,2025-10-25,C003,P03,3,10000,30000\n\
             1004,2025-10-25,C004,P04,4,20000,80000\n",
        )
        .unwrap();
        let config = CheckConfig::new(NaiveDate::from_ymd_opt(2025, 10, 25).unwrap());
        let summary = run_checks(&dataset, &config).unwrap();

        let narrative = render_narrative(&summary);
        assert!(narrative.contains("No issues were detected."));
        assert!(!narrative.contains("## Suggested actions"));
    }

    #[test]
    fn test_save_reports_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let (json_path, md_path) =
            save_reports(&sample_summary(), dir.path().join("reports"), false).unwrap();

        assert!(json_path.ends_with("quality_report_2025_10_25.json"));
        assert!(md_path.ends_with("quality_report_2025_10_25.md"));
        assert!(json_path.exists());

        let md = std::fs::read_to_string(&md_path).unwrap();
        assert!(!md.contains("## Suggested actions"));
    }

    #[test]
    fn test_save_reports_with_narrative() {
        let dir = tempfile::tempdir().unwrap();
        let (_, md_path) = save_reports(&sample_summary(), dir.path(), true).unwrap();
        let md = std::fs::read_to_string(&md_path).unwrap();
        assert!(md.contains("## Suggested actions"));
    }
}
