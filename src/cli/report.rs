use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use comfy_table::Cell;

use super::ui;
use crate::core::spending;
use crate::core::transaction::TransactionSource;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders the trailing three-month spending report for `category` and
/// persists it as the report artifact.
pub fn run(source: &dyn TransactionSource, category: &str, date: Option<&str>) -> Result<()> {
    let reference = reference_date(date)?;
    let transactions = source.load()?;
    let rows = spending::report(
        &transactions,
        category,
        reference,
        Path::new(spending::REPORT_FILE),
    )?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell(&format!("Total ({category})")),
    ]);
    for row in &rows {
        table.add_row(vec![Cell::new(&row.month), ui::amount_cell(row.total)]);
    }

    println!("{table}");
    println!(
        "{}",
        ui::subtle_line(&format!("Report saved to {}", spending::REPORT_FILE))
    );
    Ok(())
}

fn reference_date(date: Option<&str>) -> Result<NaiveDateTime> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .with_context(|| format!("Invalid date {raw:?}, expected YYYY-MM-DD"))?
            .and_hms_opt(0, 0, 0)
            .context("reference date is out of range"),
        None => Ok(Local::now().naive_local()),
    }
}
