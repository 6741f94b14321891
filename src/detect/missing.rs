//! Missing-value detection.

use serde::Serialize;

use crate::{
    dataset::OrderDataset,
    detect::finding::{Finding, FindingCategory},
    error::Result,
};

/// Missing-value statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingStats {
    /// Column name.
    pub column: String,
    /// Number of rows with an empty/null cell in this column.
    pub missing_count: usize,
    /// `missing_count / total_rows` (0 for an empty dataset).
    pub missing_ratio: f64,
}

/// Scans every declared column and emits one finding per missing cell.
///
/// A fully empty row contributes one finding per column, not one per row.
/// Stats are reported for every column, including clean ones, so the
/// report layer can show the full per-column table.
pub(crate) fn detect_missing(dataset: &OrderDataset) -> Result<(Vec<Finding>, Vec<MissingStats>)> {
    let total = dataset.len();
    let mut findings = Vec::new();
    let mut stats = Vec::new();

    for name in dataset.column_names() {
        let values = dataset.column_values(name)?;
        let mut missing_count = 0;

        for (row, value) in values.iter().enumerate() {
            if value.is_none() {
                missing_count += 1;
                findings.push(Finding {
                    category: FindingCategory::Missing,
                    row,
                    column: Some(name.to_string()),
                    value: None,
                    reason: format!("value for '{}' is empty", name),
                });
            }
        }

        let missing_ratio = if total > 0 {
            missing_count as f64 / total as f64
        } else {
            0.0
        };
        stats.push(MissingStats {
            column: name.to_string(),
            missing_count,
            missing_ratio,
        });
    }

    Ok((findings, stats))
}
