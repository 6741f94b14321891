//! Schema conformance check.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::dataset::OrderDataset;

/// How the file's columns compare against the required set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaSummary {
    /// The columns the file is expected to carry.
    pub required_columns: Vec<String>,
    /// Required columns absent from the file, sorted.
    pub missing_required_columns: Vec<String>,
    /// File columns outside the required set, sorted.
    pub extra_columns: Vec<String>,
}

impl SchemaSummary {
    /// Returns true if the file carries exactly the required columns.
    pub fn conforms(&self) -> bool {
        self.missing_required_columns.is_empty() && self.extra_columns.is_empty()
    }
}

/// Compares the dataset's header against the required column set.
///
/// An absent column is a schema observation, not a fatal error: the other
/// detectors treat it as all-missing or skip it, and the run completes.
pub(crate) fn check_schema(dataset: &OrderDataset, required: &[String]) -> SchemaSummary {
    let existing: BTreeSet<&str> = dataset.column_names().into_iter().collect();
    let required_set: BTreeSet<&str> = required.iter().map(String::as_str).collect();

    let missing_required_columns = required_set
        .difference(&existing)
        .map(|&c| c.to_string())
        .collect();
    let extra_columns = existing
        .difference(&required_set)
        .map(|&c| c.to_string())
        .collect();

    SchemaSummary {
        required_columns: required.to_vec(),
        missing_required_columns,
        extra_columns,
    }
}
