//! Home dashboard assembly: month-to-date card totals, top transactions,
//! greeting, and watched currency/stock quotes.

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use tracing::warn;

use crate::core::period;
use crate::core::quote::{CurrencyRateProvider, StockPriceProvider};
use crate::core::settings::UserSettings;
use crate::core::transaction::{Transaction, TransactionSource};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MAX_TOP_TRANSACTIONS: usize = 5;

/// Flat cashback accrued per transaction, as a fraction of the amount.
const CASHBACK_RATE: f64 = 0.01;

#[derive(Debug, Clone, Serialize)]
pub struct CardSummary {
    pub last_digits: String,
    pub total_spent: f64,
    pub cashback: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopTransaction {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrencyRate {
    pub currency: String,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockPrice {
    pub stock: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub greeting: String,
    pub cards: Vec<CardSummary>,
    pub top_transactions: Vec<TopTransaction>,
    pub currency_rates: Vec<CurrencyRate>,
    pub stock_prices: Vec<StockPrice>,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// Uniform result of the home operation. Failures keep the success shape
/// of a serialized payload; callers distinguish them by the `error` field.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum HomeResponse {
    Dashboard(Dashboard),
    Error(ErrorPayload),
}

/// Builds the dashboard for the instant given as `"YYYY-MM-DD HH:MM:SS"`.
///
/// A malformed `now` produces the date-format error payload; any other
/// failure (a collaborator erroring out) produces the generic system-error
/// payload. Individual quote lookup failures are logged and omitted.
/// `progress` fires once per attempted symbol.
pub async fn build(
    now: &str,
    source: &dyn TransactionSource,
    settings: &UserSettings,
    currencies: &dyn CurrencyRateProvider,
    stocks: &dyn StockPriceProvider,
    progress: &(dyn Fn()),
) -> HomeResponse {
    let instant = match NaiveDateTime::parse_from_str(now, DATETIME_FORMAT) {
        Ok(instant) => instant,
        Err(e) => {
            return HomeResponse::Error(ErrorPayload {
                error: format!("Date format error: {e}"),
            });
        }
    };

    match assemble(instant, source, settings, currencies, stocks, progress).await {
        Ok(dashboard) => HomeResponse::Dashboard(dashboard),
        Err(e) => HomeResponse::Error(ErrorPayload {
            error: format!("System error: {e}"),
        }),
    }
}

async fn assemble(
    instant: NaiveDateTime,
    source: &dyn TransactionSource,
    settings: &UserSettings,
    currencies: &dyn CurrencyRateProvider,
    stocks: &dyn StockPriceProvider,
    progress: &(dyn Fn()),
) -> Result<Dashboard> {
    let window = period::month_to_date(instant).context("month-to-date window out of range")?;
    let transactions = source.load()?;
    let in_window: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| window.contains(t.operation_date))
        .collect();

    let mut currency_rates = Vec::new();
    for currency in &settings.user_currencies {
        match currencies.get_rate(currency).await {
            Ok(rate) => currency_rates.push(CurrencyRate {
                currency: currency.clone(),
                rate,
            }),
            Err(e) => warn!("Omitting currency {currency}: {e}"),
        }
        progress();
    }

    let mut stock_prices = Vec::new();
    for symbol in &settings.user_stocks {
        match stocks.get_price(symbol).await {
            Ok(price) => stock_prices.push(StockPrice {
                stock: symbol.clone(),
                price,
            }),
            Err(e) => warn!("Omitting stock {symbol}: {e}"),
        }
        progress();
    }

    Ok(Dashboard {
        greeting: greeting_for_hour(instant.hour()).to_string(),
        cards: card_summaries(&in_window),
        top_transactions: top_transactions(&in_window),
        currency_rates,
        stock_prices,
    })
}

/// Per-card totals in first-appearance order, with the flat 1% cashback
/// model applied to the operation amount.
fn card_summaries(transactions: &[&Transaction]) -> Vec<CardSummary> {
    let mut cards: Vec<(String, f64, f64)> = Vec::new();
    for tx in transactions {
        let digits = tx.card_last_digits();
        let index = match cards.iter().position(|(d, _, _)| d == digits) {
            Some(index) => index,
            None => {
                cards.push((digits.to_string(), 0.0, 0.0));
                cards.len() - 1
            }
        };
        cards[index].1 += tx.operation_amount;
        cards[index].2 += tx.operation_amount * CASHBACK_RATE;
    }

    cards
        .into_iter()
        .map(|(last_digits, total_spent, cashback)| CardSummary {
            last_digits,
            total_spent: round2(total_spent),
            cashback: round2(cashback),
        })
        .collect()
}

/// At most five transactions, ranked by absolute payment amount.
fn top_transactions(transactions: &[&Transaction]) -> Vec<TopTransaction> {
    let mut ranked = transactions.to_vec();
    ranked.sort_by(|a, b| b.payment_amount.abs().total_cmp(&a.payment_amount.abs()));

    ranked
        .iter()
        .take(MAX_TOP_TRANSACTIONS)
        .map(|tx| TopTransaction {
            date: tx.operation_date.format("%d.%m.%Y").to_string(),
            amount: tx.payment_amount,
            category: tx.category_label().to_string(),
            description: tx.description.clone(),
        })
        .collect()
}

pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        18..=22 => "Good evening",
        _ => "Good night",
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
