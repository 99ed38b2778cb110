//! Bank-statement transaction records and the source abstraction.

use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;

/// Label used wherever a record carries no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A raw spreadsheet cell, kept unparsed until an analyzer needs it.
///
/// Statement exports mix numeric and textual cells in the cashback column;
/// coercion happens per record so one bad cell never fails a whole batch.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

/// One parsed line-item from a bank statement.
///
/// `operation_date` is always present: the statement source drops rows
/// without a parseable date before they reach any analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub operation_date: NaiveDateTime,
    pub card: String,
    /// Signed amount in the operation currency; negative is an outflow.
    pub operation_amount: f64,
    /// Signed amount actually charged; used for top-transaction ranking.
    pub payment_amount: f64,
    pub category: Option<String>,
    pub description: String,
    pub cashback: CellValue,
}

impl Transaction {
    /// Category label, falling back to the shared sentinel.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Coerces the raw cashback cell into a number.
    ///
    /// Empty cells count as zero; textual cells accept a comma decimal
    /// separator. An unparseable cell is an error the caller may skip at
    /// record granularity.
    pub fn cashback_amount(&self) -> Result<f64> {
        match &self.cashback {
            CellValue::Number(value) => Ok(*value),
            CellValue::Empty => Ok(0.0),
            CellValue::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(0.0);
                }
                trimmed
                    .replace(',', ".")
                    .parse::<f64>()
                    .map_err(|_| anyhow!("unparseable cashback value: {raw:?}"))
            }
        }
    }

    /// Trailing four characters of the card identifier, or the whole
    /// identifier when it is shorter.
    pub fn card_last_digits(&self) -> &str {
        self.card
            .char_indices()
            .rev()
            .nth(3)
            .map(|(index, _)| &self.card[index..])
            .unwrap_or(&self.card)
    }
}

/// Yields the normalized transaction batch for one invocation.
///
/// Implementations degrade to an empty batch on I/O problems; the fallible
/// signature exists so callers can fold an unexpected backend failure into
/// their own error payload.
pub trait TransactionSource {
    fn load(&self) -> Result<Vec<Transaction>>;
}
