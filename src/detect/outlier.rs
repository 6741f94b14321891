//! IQR-based outlier detection.

use serde::Serialize;

use crate::{
    dataset::OrderDataset,
    detect::finding::{Finding, FindingCategory},
    error::Result,
};

/// Columns with fewer parseable values than this are skipped entirely;
/// quartiles over a handful of points are noise, not bounds.
pub(crate) const MIN_SAMPLE_SIZE: usize = 4;

/// Computed IQR bounds for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierBounds {
    /// Column name.
    pub column: String,
    /// First quartile (linear interpolation).
    pub q1: f64,
    /// Third quartile (linear interpolation).
    pub q3: f64,
    /// `q1 - k * IQR`.
    pub lower: f64,
    /// `q3 + k * IQR`.
    pub upper: f64,
    /// Number of parseable values the quartiles were computed over.
    pub sample_size: usize,
}

/// Flags values strictly outside the per-column IQR bounds.
///
/// The quantile pool for a column contains only its finite, parseable
/// values; rows whose cell is missing or unparseable are excluded from the
/// computation and can never be outliers in that column. When IQR is zero
/// the bounds collapse to `q1 == q3` and the strict comparison does the
/// right thing on its own: equal values pass, differing values are flagged.
/// Configured columns absent from the file are skipped; the schema check
/// reports the absence.
pub(crate) fn detect_outliers(
    dataset: &OrderDataset,
    columns: &[String],
    multiplier: f64,
) -> Result<(Vec<Finding>, Vec<OutlierBounds>)> {
    let mut findings = Vec::new();
    let mut all_bounds = Vec::new();

    for column in columns {
        if dataset.column_index(column).is_none() {
            continue;
        }
        let values = dataset.column_values(column)?;

        // (row, raw, parsed) for every parseable cell, in row order.
        let parsed: Vec<(usize, &str, f64)> = values
            .iter()
            .enumerate()
            .filter_map(|(row, value)| {
                let raw = value.as_deref()?;
                let num: f64 = raw.trim().parse().ok()?;
                num.is_finite().then_some((row, raw, num))
            })
            .collect();

        if parsed.len() < MIN_SAMPLE_SIZE {
            continue;
        }

        let mut sorted: Vec<f64> = parsed.iter().map(|&(_, _, v)| v).collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = quantile(&sorted, 0.25);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lower = q1 - multiplier * iqr;
        let upper = q3 + multiplier * iqr;

        for &(row, raw, value) in &parsed {
            if value < lower || value > upper {
                findings.push(Finding {
                    category: FindingCategory::Outlier,
                    row,
                    column: Some(column.clone()),
                    value: Some(raw.to_string()),
                    reason: format!(
                        "{} value {} is outside IQR bounds [{}, {}]",
                        column, value, lower, upper
                    ),
                });
            }
        }

        all_bounds.push(OutlierBounds {
            column: column.clone(),
            q1,
            q3,
            lower,
            upper,
            sample_size: parsed.len(),
        });
    }

    Ok((findings, all_bounds))
}

/// Quantile by the standard linear-interpolation method over a sorted,
/// non-empty slice.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    if frac == 0.0 || lo + 1 >= n {
        sorted[lo]
    } else {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    }
}
