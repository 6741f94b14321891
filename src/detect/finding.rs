//! Finding types shared by all detectors.

use std::fmt;

use serde::Serialize;

/// The category a finding belongs to.
///
/// The enum order is also the report order: findings are sorted by category
/// first, then by row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    /// Empty or null cell in a declared column.
    Missing,
    /// Row shares its key value with at least one other row.
    Duplicate,
    /// Numeric value outside the column's IQR bounds.
    Outlier,
    /// Row violates one of the fixed business rules.
    BusinessRule,
}

impl FindingCategory {
    /// All categories, in report order.
    pub const ALL: [FindingCategory; 4] = [
        FindingCategory::Missing,
        FindingCategory::Duplicate,
        FindingCategory::Outlier,
        FindingCategory::BusinessRule,
    ];

    /// Severity level implied by the category (1-5, higher is worse).
    pub fn severity(&self) -> u8 {
        match self {
            Self::BusinessRule => 4,
            Self::Missing => 3,
            Self::Duplicate => 3,
            Self::Outlier => 2,
        }
    }

    /// Short lowercase label used in reports and JSON keys.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Duplicate => "duplicate",
            Self::Outlier => "outlier",
            Self::BusinessRule => "business_rule",
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One detected data-quality issue, attached to one row.
///
/// Findings are independent facts: a single row can carry any number of
/// them across categories. The row index always refers to the dataset the
/// finding was produced from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Category of the issue.
    pub category: FindingCategory,
    /// Zero-based index of the affected row.
    pub row: usize,
    /// Affected column, when the issue is column-scoped.
    pub column: Option<String>,
    /// The offending raw value, when there is one.
    pub value: Option<String>,
    /// Human-readable description of the issue.
    pub reason: String,
}

impl Finding {
    /// Severity level of this finding (implied by its category).
    pub fn severity(&self) -> u8 {
        self.category.severity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_is_report_order() {
        assert!(FindingCategory::Missing < FindingCategory::Duplicate);
        assert!(FindingCategory::Duplicate < FindingCategory::Outlier);
        assert!(FindingCategory::Outlier < FindingCategory::BusinessRule);
    }

    #[test]
    fn test_severity_by_category() {
        assert_eq!(FindingCategory::BusinessRule.severity(), 4);
        assert_eq!(FindingCategory::Outlier.severity(), 2);

        let finding = Finding {
            category: FindingCategory::Missing,
            row: 0,
            column: Some("customer_id".to_string()),
            value: None,
            reason: "value for 'customer_id' is empty".to_string(),
        };
        assert_eq!(finding.severity(), 3);
    }

    #[test]
    fn test_labels() {
        assert_eq!(FindingCategory::BusinessRule.label(), "business_rule");
        assert_eq!(FindingCategory::Missing.to_string(), "missing");
    }
}
