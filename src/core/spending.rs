//! Spending-by-category report over a trailing three-month window.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{error, info};

use crate::core::period;
use crate::core::transaction::Transaction;

/// Artifact name for persisted reports, one file per invocation.
pub const REPORT_FILE: &str = "spending_by_category_report.json";

/// Number of calendar months the report looks back from its reference.
const WINDOW_MONTHS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySpending {
    pub month: String,
    pub total: f64,
}

/// Computes the report and persists it to `output` before returning.
///
/// Persistence is a required side effect: a save failure is logged and
/// propagated even though the rows were computed successfully.
pub fn report(
    transactions: &[Transaction],
    category: &str,
    reference: NaiveDateTime,
    output: &Path,
) -> Result<Vec<MonthlySpending>> {
    let rows = spending_by_category(transactions, category, reference)?;
    save_report(&rows, output)?;
    Ok(rows)
}

/// Sums `operation_amount` per calendar month for `category` over the
/// trailing window ending at `reference`, both bounds inclusive.
///
/// Category comparison is exact string equality on the raw field; records
/// without a category never match. An empty result keeps the fixed
/// `(month, total)` row shape.
pub fn spending_by_category(
    transactions: &[Transaction],
    category: &str,
    reference: NaiveDateTime,
) -> Result<Vec<MonthlySpending>> {
    let window = period::trailing_months(reference, WINDOW_MONTHS)
        .context("reference date is outside the supported range")?;

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for tx in transactions {
        if tx.category.as_deref() != Some(category) {
            continue;
        }
        if !window.contains(tx.operation_date) {
            continue;
        }
        *totals
            .entry(period::month_label(tx.operation_date))
            .or_insert(0.0) += tx.operation_amount;
    }

    Ok(totals
        .into_iter()
        .map(|(month, total)| MonthlySpending { month, total })
        .collect())
}

fn save_report(rows: &[MonthlySpending], output: &Path) -> Result<()> {
    let body = serde_json::to_string_pretty(rows).context("Failed to serialize report")?;
    if let Err(e) = fs::write(output, body) {
        error!("Failed to save report to {}: {e}", output.display());
        return Err(e)
            .with_context(|| format!("Failed to save report to {}", output.display()));
    }
    info!("Report saved to {}", output.display());
    Ok(())
}
