//! Ranks spending categories by accumulated cashback for a target month.

use anyhow::{Result, bail};
use tracing::{error, warn};

use crate::core::period;
use crate::core::transaction::Transaction;

/// Categories of the `(year, month)` batch ranked by total cashback,
/// highest first.
///
/// Only strictly positive cashback advances a category; a record whose
/// cashback cell cannot be coerced is skipped on its own. Any failure of
/// the analysis as a whole (e.g. an out-of-range month) is logged and
/// reported as an empty ranking.
pub fn analyze(transactions: &[Transaction], year: i32, month: u32) -> Vec<(String, f64)> {
    match try_analyze(transactions, year, month) {
        Ok(ranked) => ranked,
        Err(e) => {
            error!("Cashback analysis failed: {e}");
            Vec::new()
        }
    }
}

fn try_analyze(transactions: &[Transaction], year: i32, month: u32) -> Result<Vec<(String, f64)>> {
    if !(1..=12).contains(&month) {
        bail!("month must be between 1 and 12, got {month}");
    }

    let mut totals: Vec<(String, f64)> = Vec::new();
    for tx in transactions
        .iter()
        .filter(|t| period::in_month(t.operation_date, year, month))
    {
        let cashback = match tx.cashback_amount() {
            Ok(value) => value,
            Err(e) => {
                warn!("Skipping record {:?}: {e}", tx.description);
                continue;
            }
        };
        // Zero or negative cashback must not create a category entry.
        if cashback <= 0.0 {
            continue;
        }
        let label = tx.category_label();
        match totals.iter_mut().find(|(category, _)| category == label) {
            Some((_, total)) => *total += cashback,
            None => totals.push((label.to_string(), cashback)),
        }
    }

    // Stable sort keeps first-appearance order for equal totals.
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(totals)
}
