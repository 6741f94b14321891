//! Detector orchestration and the Summary contract.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    config::CheckConfig,
    dataset::OrderDataset,
    detect::{
        duplicate::detect_duplicates,
        finding::{Finding, FindingCategory},
        missing::{detect_missing, MissingStats},
        outlier::{detect_outliers, OutlierBounds},
        rules::{detect_rule_violations, DateStats},
        schema::{check_schema, SchemaSummary},
    },
    error::Result,
};

/// Aggregate counts for one finding category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// The category.
    pub category: FindingCategory,
    /// Number of findings in the category.
    pub count: usize,
    /// `count / row_count` (0 for an empty dataset).
    pub ratio: f64,
}

/// One original cell of a problem row, as it appeared in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowField {
    /// Column name.
    pub column: String,
    /// Raw cell text (empty string for a null cell).
    pub value: String,
}

/// The result of one check run: the data contract consumed by the report
/// layer.
///
/// A `Summary` is a pure function of (dataset, configuration, reference
/// date). Running the suite twice over the same inputs yields an identical
/// structure, findings order included, which is what makes daily reports
/// reproducible.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Number of data rows checked.
    pub row_count: usize,
    /// Number of columns in the dataset.
    pub column_count: usize,
    /// The reference date of the run.
    pub reference_date: NaiveDate,
    /// Per-category counts and ratios, in category order. Every category
    /// appears, zero or not.
    pub categories: Vec<CategorySummary>,
    /// All findings, sorted by (category, row index); ties keep detector
    /// emission order.
    pub findings: Vec<Finding>,
    /// Distinct affected rows with their full original content, keyed by
    /// row index.
    pub problem_rows: BTreeMap<usize, Vec<RowField>>,
    /// Missing-value stats for every column.
    pub missing: Vec<MissingStats>,
    /// Required columns vs. the file's actual header.
    pub schema: SchemaSummary,
    /// Parse tallies for the date column.
    pub date_stats: DateStats,
    /// IQR bounds for every numeric column that had enough values.
    pub outlier_bounds: Vec<OutlierBounds>,
}

impl Summary {
    /// Total number of findings across all categories.
    pub fn total_findings(&self) -> usize {
        self.findings.len()
    }

    /// Returns true if the run produced any finding.
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Number of findings in one category.
    pub fn category_count(&self, category: FindingCategory) -> usize {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.count)
    }

    /// Findings attached to one row, in report order.
    pub fn row_findings(&self, row: usize) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.row == row).collect()
    }
}

/// Runs the full detector suite over one dataset.
///
/// The detectors are independent pure functions over the immutable dataset;
/// they are run in a fixed order only so the output ordering is stable,
/// not because any of them depends on another.
///
/// # Errors
///
/// Returns an error for an invalid configuration. Bad cell values are never
/// errors, and a configured column the file does not carry is skipped by its
/// detector and reported through the schema summary.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use dq_agent::{run_checks, CheckConfig, OrderDataset};
///
/// let csv = "order_id,order_date,customer_id,product_id,quantity,unit_price,amount\n\
///            1001,2025-10-25,C001,P01,2,30000,60000\n";
/// let dataset = OrderDataset::from_csv_str(csv).unwrap();
/// let config = CheckConfig::new(NaiveDate::from_ymd_opt(2025, 10, 25).unwrap());
///
/// let summary = run_checks(&dataset, &config).unwrap();
/// assert!(!summary.has_findings());
/// ```
pub fn run_checks(dataset: &OrderDataset, config: &CheckConfig) -> Result<Summary> {
    config.validate()?;

    let schema = check_schema(dataset, &config.required_columns);
    let (mut findings, missing) = detect_missing(dataset)?;
    findings.extend(detect_duplicates(dataset, &config.key_column)?);
    let (outlier_findings, outlier_bounds) =
        detect_outliers(dataset, &config.numeric_columns, config.iqr_multiplier)?;
    findings.extend(outlier_findings);
    let (rule_findings, date_stats) =
        detect_rule_violations(dataset, &config.date_column, config.reference_date)?;
    findings.extend(rule_findings);

    // Stable: within one (category, row) pair, detector emission order is
    // the tie-break.
    findings.sort_by_key(|f| (f.category, f.row));

    let row_count = dataset.len();
    let categories = FindingCategory::ALL
        .iter()
        .map(|&category| {
            let count = findings.iter().filter(|f| f.category == category).count();
            let ratio = if row_count > 0 {
                count as f64 / row_count as f64
            } else {
                0.0
            };
            CategorySummary {
                category,
                count,
                ratio,
            }
        })
        .collect();

    let mut problem_rows = BTreeMap::new();
    for finding in &findings {
        problem_rows.entry(finding.row).or_insert_with(|| {
            dataset
                .row(finding.row)
                .unwrap_or_default()
                .into_iter()
                .map(|(column, value)| RowField { column, value })
                .collect()
        });
    }

    Ok(Summary {
        row_count,
        column_count: dataset.column_names().len(),
        reference_date: config.reference_date,
        categories,
        findings,
        problem_rows,
        missing,
        schema,
        date_stats,
        outlier_bounds,
    })
}
