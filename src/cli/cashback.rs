use anyhow::Result;

use crate::core::cashback;
use crate::core::transaction::TransactionSource;

/// Prints the cashback ranking for `(year, month)` as a JSON object in
/// rank order.
pub fn run(source: &dyn TransactionSource, year: i32, month: u32) -> Result<()> {
    let transactions = source.load()?;
    let ranked = cashback::analyze(&transactions, year, month);

    let mut payload = serde_json::Map::new();
    for (category, total) in ranked {
        payload.insert(category, serde_json::Value::from(total));
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(payload))?
    );
    Ok(())
}
