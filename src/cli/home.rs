use anyhow::Result;

use super::ui;
use crate::core::dashboard;
use crate::core::quote::{CurrencyRateProvider, StockPriceProvider};
use crate::core::settings::UserSettings;
use crate::core::transaction::TransactionSource;

/// Builds the home dashboard and prints it as pretty JSON.
pub async fn run(
    datetime: &str,
    source: &dyn TransactionSource,
    settings: &UserSettings,
    currencies: &dyn CurrencyRateProvider,
    stocks: &dyn StockPriceProvider,
) -> Result<()> {
    let total_symbols = (settings.user_currencies.len() + settings.user_stocks.len()) as u64;
    let pb = ui::new_progress_bar(total_symbols, true);
    pb.set_message("Fetching quotes...");

    let tick = {
        let pb = pb.clone();
        move || pb.inc(1)
    };
    let response = dashboard::build(datetime, source, settings, currencies, stocks, &tick).await;
    pb.finish_and_clear();

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
