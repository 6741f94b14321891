//! The quality-check engine.
//!
//! Four independent detectors scan one immutable
//! [`OrderDataset`](crate::dataset::OrderDataset) snapshot and emit per-row
//! findings:
//!
//! - missing values (per column, per cell)
//! - duplicate rows (shared key value, default `order_id`)
//! - statistical outliers (IQR bounds per numeric column)
//! - business-rule violations (non-positive factors, arithmetic
//!   consistency, date format, date vs. reference date)
//!
//! Alongside the per-row findings, a schema check compares the file's
//! header against the required column set and the date column's parse
//! tallies are recorded, both summary-level observations rather than
//! row findings.
//!
//! [`run_checks`] runs the suite and merges everything into a [`Summary`],
//! the data contract the report layer renders from. The whole pipeline is
//! deterministic: identical (dataset, config, reference date) inputs yield
//! an identical finding sequence.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use dq_agent::{run_checks, CheckConfig, OrderDataset};
//!
//! let csv = "order_id,order_date,customer_id,product_id,quantity,unit_price,amount\n\
//!            1001,2025-10-25,,P01,2,30000,60000\n";
//! let dataset = OrderDataset::from_csv_str(csv).unwrap();
//! let config = CheckConfig::new(NaiveDate::from_ymd_opt(2025, 10, 25).unwrap());
//!
//! let summary = run_checks(&dataset, &config).unwrap();
//! assert_eq!(summary.total_findings(), 1); // the empty customer_id
//! ```

// Statistical computation over usize counts
#![allow(clippy::cast_precision_loss)]

mod aggregate;
mod duplicate;
mod finding;
mod missing;
mod outlier;
pub(crate) mod rules;
mod schema;


pub use aggregate::{run_checks, CategorySummary, RowField, Summary};
pub use finding::{Finding, FindingCategory};
pub use missing::MissingStats;
pub use outlier::OutlierBounds;
pub use rules::DateStats;
pub use schema::SchemaSummary;
