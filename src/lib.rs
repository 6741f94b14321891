//! dq-agent - Daily Data-Quality Checks for Order Records
//!
//! Scans one day's order-record CSV drop for quality problems and produces
//! a structured, reproducible report. Four detectors run over one
//! in-memory snapshot: missing values, duplicate keys, IQR outliers, and
//! business-rule violations (non-positive factors, arithmetic consistency,
//! date format, date vs. reference date). A schema check compares the
//! file's header against the required column set alongside them.
//!
//! # Design Principles
//!
//! 1. **One snapshot, one run** - the dataset is loaded fully, checked,
//!    reported, and discarded; no state survives a run
//! 2. **Deterministic** - identical (dataset, config, reference date)
//!    always yields an identical finding sequence
//! 3. **Per-cell tolerance** - a bad cell becomes a finding or an
//!    exclusion, never an aborted run; only an unreadable file or a
//!    missing header is fatal
//!
//! # Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use dq_agent::{run_checks, CheckConfig, OrderDataset};
//!
//! let dataset = OrderDataset::from_csv("data/sales_2025_10_25.csv").unwrap();
//! let config = CheckConfig::new(NaiveDate::from_ymd_opt(2025, 10, 25).unwrap());
//!
//! let summary = run_checks(&dataset, &config).unwrap();
//! for finding in &summary.findings {
//!     println!("[{}] row {}: {}", finding.category, finding.row, finding.reason);
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_precision_loss,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::unreadable_literal
    )
)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

/// CLI module for the command-line interface
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dataset;
pub mod detect;
pub mod error;
pub mod report;

pub use config::{daily_file_path, CheckConfig};
pub use dataset::{CsvOptions, OrderDataset};
pub use detect::{
    run_checks, CategorySummary, DateStats, Finding, FindingCategory, MissingStats, OutlierBounds,
    RowField, SchemaSummary, Summary,
};
pub use error::{Error, Result};
