//! Duplicate-row detection.

use std::collections::HashMap;

use crate::{
    dataset::OrderDataset,
    detect::finding::{Finding, FindingCategory},
    error::Result,
};

/// Groups rows by the raw value of the key column and flags every member
/// of a group larger than one, the first occurrence included, since "which
/// row is the original" is not knowable from a single snapshot.
///
/// Rows with a missing key are not grouped: the empty cell is already a
/// missing-value finding, and grouping empty strings would weld unrelated
/// rows into a fake duplicate group. A key column absent from the file is
/// skipped entirely; the schema check reports the absence.
pub(crate) fn detect_duplicates(dataset: &OrderDataset, key_column: &str) -> Result<Vec<Finding>> {
    if dataset.column_index(key_column).is_none() {
        return Ok(Vec::new());
    }
    let keys = dataset.column_values(key_column)?;

    // Groups in first-occurrence order so output is deterministic.
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();

    for (row, key) in keys.iter().enumerate() {
        let Some(key) = key.as_deref() else { continue };
        match group_index.get(key) {
            Some(&idx) => groups[idx].1.push(row),
            None => {
                group_index.insert(key, groups.len());
                groups.push((key, vec![row]));
            }
        }
    }

    let mut findings = Vec::new();
    for (key, rows) in &groups {
        if rows.len() < 2 {
            continue;
        }
        for &row in rows {
            findings.push(Finding {
                category: FindingCategory::Duplicate,
                row,
                column: Some(key_column.to_string()),
                value: Some((*key).to_string()),
                reason: format!(
                    "{} '{}' appears {} times",
                    key_column,
                    key,
                    rows.len()
                ),
            });
        }
    }

    Ok(findings)
}
