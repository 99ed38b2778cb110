//! Spreadsheet-backed transaction source.
//!
//! Reads the first worksheet of a bank statement export. Rows without a
//! parseable operation date are dropped; a missing or unreadable file
//! degrades to an empty batch rather than an error.

use std::path::PathBuf;

use anyhow::Result;
use calamine::{Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, error, info};

use crate::core::transaction::{CellValue, Transaction, TransactionSource};

// Column headers as produced by the bank export.
const COL_DATE: &str = "Дата операции";
const COL_CARD: &str = "Номер карты";
const COL_OPERATION_AMOUNT: &str = "Сумма операции";
const COL_PAYMENT_AMOUNT: &str = "Сумма платежа";
const COL_CATEGORY: &str = "Категория";
const COL_DESCRIPTION: &str = "Описание";
const COL_CASHBACK: &str = "Кешбэк";

// Exports write day-first dates; some tools re-save them dash-separated.
const DATE_FORMATS: &[&str] = &["%d.%m.%Y %H:%M:%S", "%d-%m-%Y %H:%M:%S", "%d.%m.%Y", "%d-%m-%Y"];

pub struct ExcelStatementSource {
    path: PathBuf,
}

impl ExcelStatementSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        ExcelStatementSource { path: path.into() }
    }
}

impl TransactionSource for ExcelStatementSource {
    fn load(&self) -> Result<Vec<Transaction>> {
        let mut workbook = match calamine::open_workbook_auto(&self.path) {
            Ok(workbook) => workbook,
            Err(e) => {
                error!("Failed to open statement {}: {e}", self.path.display());
                return Ok(Vec::new());
            }
        };

        let sheet_names = workbook.sheet_names();
        let Some(sheet_name) = sheet_names.first().cloned() else {
            error!("Statement {} has no worksheets", self.path.display());
            return Ok(Vec::new());
        };
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                error!("Failed to read worksheet {sheet_name:?}: {e}");
                return Ok(Vec::new());
            }
        };

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            error!("Statement {} is empty", self.path.display());
            return Ok(Vec::new());
        };
        let columns = ColumnMap::from_header(header);

        let mut transactions = Vec::new();
        for row in rows {
            if let Some(tx) = columns.transaction_from_row(row) {
                transactions.push(tx);
            }
        }
        info!(
            "Loaded {} transactions from {}",
            transactions.len(),
            self.path.display()
        );
        Ok(transactions)
    }
}

/// Header-name to column-index mapping for one worksheet.
struct ColumnMap {
    date: Option<usize>,
    card: Option<usize>,
    operation_amount: Option<usize>,
    payment_amount: Option<usize>,
    category: Option<usize>,
    description: Option<usize>,
    cashback: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[Data]) -> Self {
        let mut columns = ColumnMap {
            date: None,
            card: None,
            operation_amount: None,
            payment_amount: None,
            category: None,
            description: None,
            cashback: None,
        };
        for (index, cell) in header.iter().enumerate() {
            let Data::String(name) = cell else { continue };
            match name.trim() {
                COL_DATE => columns.date = Some(index),
                COL_CARD => columns.card = Some(index),
                COL_OPERATION_AMOUNT => columns.operation_amount = Some(index),
                COL_PAYMENT_AMOUNT => columns.payment_amount = Some(index),
                COL_CATEGORY => columns.category = Some(index),
                COL_DESCRIPTION => columns.description = Some(index),
                COL_CASHBACK => columns.cashback = Some(index),
                _ => {}
            }
        }
        columns
    }

    fn transaction_from_row(&self, row: &[Data]) -> Option<Transaction> {
        let Some(operation_date) = self.date.and_then(|i| row.get(i)).and_then(parse_date) else {
            debug!("Dropping row without a parseable operation date");
            return None;
        };
        let Some(operation_amount) = self
            .operation_amount
            .and_then(|i| row.get(i))
            .and_then(parse_amount)
        else {
            debug!("Dropping row without a usable operation amount");
            return None;
        };
        let payment_amount = self
            .payment_amount
            .and_then(|i| row.get(i))
            .and_then(parse_amount)
            .unwrap_or(operation_amount);

        Some(Transaction {
            operation_date,
            card: self
                .card
                .and_then(|i| row.get(i))
                .map(text_value)
                .unwrap_or_default(),
            operation_amount,
            payment_amount,
            category: self
                .category
                .and_then(|i| row.get(i))
                .map(text_value)
                .filter(|s| !s.is_empty()),
            description: self
                .description
                .and_then(|i| row.get(i))
                .map(text_value)
                .unwrap_or_default(),
            cashback: self
                .cashback
                .and_then(|i| row.get(i))
                .map(cell_value)
                .unwrap_or(CellValue::Empty),
        })
    }
}

fn parse_date(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::String(raw) => parse_date_str(raw),
        Data::DateTime(dt) => datetime_from_serial(dt.as_f64()),
        _ => None,
    }
}

fn parse_date_str(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    for format in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Converts an Excel serial datetime (days since 1899-12-30) to a timestamp.
fn datetime_from_serial(serial: f64) -> Option<NaiveDateTime> {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    base.checked_add_signed(Duration::seconds(seconds))
}

fn parse_amount(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(value) => Some(*value),
        Data::Int(value) => Some(*value as f64),
        Data::String(raw) => raw.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

fn text_value(cell: &Data) -> String {
    match cell {
        Data::String(raw) => raw.trim().to_string(),
        Data::Float(value) => format!("{value}"),
        Data::Int(value) => format!("{value}"),
        _ => String::new(),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::String(raw) => CellValue::Text(raw.clone()),
        _ => CellValue::Empty,
    }
}
