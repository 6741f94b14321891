//! Run configuration for the check pipeline.
//!
//! A run is parameterized by an explicit [`CheckConfig`] passed into
//! [`run_checks`](crate::detect::run_checks), not by globals or environment
//! reads, so the core stays testable without any setup.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Default column used to group rows for duplicate detection.
pub const DEFAULT_KEY_COLUMN: &str = "order_id";

/// Default column holding the order date.
pub const DEFAULT_DATE_COLUMN: &str = "order_date";

/// Default columns checked for statistical outliers.
pub const DEFAULT_NUMERIC_COLUMNS: [&str; 3] = ["quantity", "unit_price", "amount"];

/// Default required column set for the schema check.
pub const DEFAULT_REQUIRED_COLUMNS: [&str; 7] = [
    "order_id",
    "order_date",
    "customer_id",
    "product_id",
    "quantity",
    "unit_price",
    "amount",
];

/// Default IQR multiplier for outlier bounds.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Parameters for one check run.
///
/// Built with chained setters, the same way detector thresholds are
/// configured elsewhere in this crate:
///
/// ```
/// use chrono::NaiveDate;
/// use dq_agent::CheckConfig;
///
/// let config = CheckConfig::new(NaiveDate::from_ymd_opt(2025, 10, 25).unwrap())
///     .key_column("order_id")
///     .iqr_multiplier(3.0);
/// ```
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub(crate) reference_date: NaiveDate,
    pub(crate) key_column: String,
    pub(crate) date_column: String,
    pub(crate) numeric_columns: Vec<String>,
    pub(crate) required_columns: Vec<String>,
    pub(crate) iqr_multiplier: f64,
    pub(crate) narrative: bool,
}

impl CheckConfig {
    /// Creates a configuration for the given reference date with defaults
    /// for everything else.
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            numeric_columns: DEFAULT_NUMERIC_COLUMNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            required_columns: DEFAULT_REQUIRED_COLUMNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            narrative: false,
        }
    }

    /// Sets the duplicate-detection key column.
    #[must_use]
    pub fn key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = column.into();
        self
    }

    /// Sets the date column checked by the date rules.
    #[must_use]
    pub fn date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = column.into();
        self
    }

    /// Sets the columns checked for outliers.
    #[must_use]
    pub fn numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the required column set for the schema check.
    #[must_use]
    pub fn required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the IQR multiplier used for outlier bounds.
    #[must_use]
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    /// Enables or disables the plain-language narrative section in saved
    /// reports.
    #[must_use]
    pub fn with_narrative(mut self, enabled: bool) -> Self {
        self.narrative = enabled;
        self
    }

    /// The reference date rows are checked against.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Whether the narrative section is enabled.
    pub fn narrative_enabled(&self) -> bool {
        self.narrative
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(Error::invalid_config("iqr_multiplier must be positive"));
        }
        if self.key_column.trim().is_empty() {
            return Err(Error::invalid_config("key_column must not be empty"));
        }
        if self.date_column.trim().is_empty() {
            return Err(Error::invalid_config("date_column must not be empty"));
        }
        Ok(())
    }
}

/// Path of the daily drop file for a date: `<data_dir>/sales_YYYY_MM_DD.csv`.
pub fn daily_file_path(data_dir: impl AsRef<Path>, date: NaiveDate) -> PathBuf {
    data_dir
        .as_ref()
        .join(format!("sales_{}.csv", date.format("%Y_%m_%d")))
}
