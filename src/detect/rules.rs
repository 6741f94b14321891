//! Business-rule detection.
//!
//! The rule set is small and fixed, so it is data: an enumerable table of
//! `(id, evaluation fn)` pairs walked per row. Adding a rule means adding a
//! table entry, not touching the detector control flow. Each rule fires at
//! most once per row and rules never look at each other's results, with one
//! deliberate exception: the date-mismatch rule only runs on dates the
//! format rule accepted, so a malformed date is reported once, not twice.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    dataset::OrderDataset,
    detect::finding::{Finding, FindingCategory},
    error::Result,
};

/// Canonical date format accepted by the date rules. `2025/10/25` is a
/// violation: strict matching only, no separator normalization.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

const QUANTITY_COLUMN: &str = "quantity";
const UNIT_PRICE_COLUMN: &str = "unit_price";
const AMOUNT_COLUMN: &str = "amount";

/// Parse outcome counts for the date column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateStats {
    /// Column name.
    pub column: String,
    /// Rows whose cell parsed in the canonical format.
    pub parsed_count: usize,
    /// Rows whose cell was missing or malformed.
    pub failed_count: usize,
}

/// Per-row view the rules evaluate against.
pub(crate) struct RuleContext<'a> {
    raw_quantity: Option<&'a str>,
    raw_unit_price: Option<&'a str>,
    raw_amount: Option<&'a str>,
    raw_date: Option<&'a str>,
    quantity: Option<f64>,
    unit_price: Option<f64>,
    amount: Option<f64>,
    parsed_date: Option<NaiveDate>,
    reference_date: NaiveDate,
    date_column: &'a str,
}

/// What a rule reports when it fires.
pub(crate) struct RuleHit {
    column: String,
    value: Option<String>,
    reason: String,
}

/// One entry in the rule table.
pub(crate) struct BusinessRule {
    /// Stable identifier for the rule.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) id: &'static str,
    eval: fn(&RuleContext<'_>) -> Option<RuleHit>,
}

/// The fixed rule set, in evaluation (and report tie-break) order.
pub(crate) const RULES: &[BusinessRule] = &[
    BusinessRule {
        id: "non_positive_quantity",
        eval: non_positive_quantity,
    },
    BusinessRule {
        id: "non_positive_unit_price",
        eval: non_positive_unit_price,
    },
    BusinessRule {
        id: "amount_mismatch",
        eval: amount_mismatch,
    },
    BusinessRule {
        id: "date_format",
        eval: date_format,
    },
    BusinessRule {
        id: "date_mismatch",
        eval: date_mismatch,
    },
];

fn non_positive_quantity(ctx: &RuleContext<'_>) -> Option<RuleHit> {
    let quantity = ctx.quantity?;
    (quantity <= 0.0).then(|| RuleHit {
        column: QUANTITY_COLUMN.to_string(),
        value: ctx.raw_quantity.map(str::to_string),
        reason: format!("quantity {} is not positive", quantity),
    })
}

fn non_positive_unit_price(ctx: &RuleContext<'_>) -> Option<RuleHit> {
    let unit_price = ctx.unit_price?;
    (unit_price <= 0.0).then(|| RuleHit {
        column: UNIT_PRICE_COLUMN.to_string(),
        value: ctx.raw_unit_price.map(str::to_string),
        reason: format!("unit_price {} is not positive", unit_price),
    })
}

// Exact equality on purpose: 0 = 0 * price is consistent and must not be
// flagged, only a real mismatch is.
#[allow(clippy::float_cmp)]
fn amount_mismatch(ctx: &RuleContext<'_>) -> Option<RuleHit> {
    let quantity = ctx.quantity?;
    let unit_price = ctx.unit_price?;
    let amount = ctx.amount?;
    let expected = quantity * unit_price;
    (amount != expected).then(|| RuleHit {
        column: AMOUNT_COLUMN.to_string(),
        value: ctx.raw_amount.map(str::to_string),
        reason: format!(
            "amount {} does not equal quantity * unit_price ({})",
            amount, expected
        ),
    })
}

fn date_format(ctx: &RuleContext<'_>) -> Option<RuleHit> {
    let raw = ctx.raw_date?;
    ctx.parsed_date.is_none().then(|| RuleHit {
        column: ctx.date_column.to_string(),
        value: Some(raw.to_string()),
        reason: format!(
            "{} '{}' is not in YYYY-MM-DD format",
            ctx.date_column,
            raw.trim()
        ),
    })
}

fn date_mismatch(ctx: &RuleContext<'_>) -> Option<RuleHit> {
    let date = ctx.parsed_date?;
    (date != ctx.reference_date).then(|| RuleHit {
        column: ctx.date_column.to_string(),
        value: ctx.raw_date.map(str::to_string),
        reason: format!(
            "{} {} does not match reference date {}",
            ctx.date_column, date, ctx.reference_date
        ),
    })
}

/// Evaluates the rule table against every row.
///
/// Missing or unparseable factors simply make the affected rule
/// inapplicable for that row (the missing-value and date-format findings
/// cover those cases); they never abort the run. Columns absent from the
/// dataset behave like all-missing columns.
///
/// Also returns the parse tallies for the date column: every row counts
/// as parsed or failed, except when the column itself is absent, in which
/// case both tallies stay at zero.
pub(crate) fn detect_rule_violations(
    dataset: &OrderDataset,
    date_column: &str,
    reference_date: NaiveDate,
) -> Result<(Vec<Finding>, DateStats)> {
    let total = dataset.len();
    let quantities = values_or_blank(dataset, QUANTITY_COLUMN, total);
    let unit_prices = values_or_blank(dataset, UNIT_PRICE_COLUMN, total);
    let amounts = values_or_blank(dataset, AMOUNT_COLUMN, total);
    let dates = values_or_blank(dataset, date_column, total);
    let date_column_present = dataset.column_index(date_column).is_some();

    let mut findings = Vec::new();
    let mut parsed_count = 0;
    for row in 0..total {
        let raw_date = dates[row].as_deref();
        let parsed_date = parse_date(raw_date);
        if parsed_date.is_some() {
            parsed_count += 1;
        }
        let ctx = RuleContext {
            raw_quantity: quantities[row].as_deref(),
            raw_unit_price: unit_prices[row].as_deref(),
            raw_amount: amounts[row].as_deref(),
            raw_date,
            quantity: parse_number(quantities[row].as_deref()),
            unit_price: parse_number(unit_prices[row].as_deref()),
            amount: parse_number(amounts[row].as_deref()),
            parsed_date,
            reference_date,
            date_column,
        };

        for rule in RULES {
            if let Some(hit) = (rule.eval)(&ctx) {
                findings.push(Finding {
                    category: FindingCategory::BusinessRule,
                    row,
                    column: Some(hit.column),
                    value: hit.value,
                    reason: hit.reason,
                });
            }
        }
    }

    let date_stats = DateStats {
        column: date_column.to_string(),
        parsed_count: if date_column_present { parsed_count } else { 0 },
        failed_count: if date_column_present {
            total - parsed_count
        } else {
            0
        },
    };

    Ok((findings, date_stats))
}

fn values_or_blank(
    dataset: &OrderDataset,
    column: &str,
    total: usize,
) -> Vec<Option<String>> {
    dataset
        .column_values(column)
        .unwrap_or_else(|_| vec![None; total])
}

/// Best-effort numeric view of a cell. Infinities and NaN do not count as
/// numbers here.
pub(crate) fn parse_number(value: Option<&str>) -> Option<f64> {
    let num: f64 = value?.trim().parse().ok()?;
    num.is_finite().then_some(num)
}

/// Strict canonical-format date view of a cell.
pub(crate) fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?.trim(), DATE_FORMAT).ok()
}
