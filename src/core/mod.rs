//! Core business logic and collaborator abstractions

pub mod cashback;
pub mod config;
pub mod dashboard;
pub mod log;
pub mod period;
pub mod quote;
pub mod settings;
pub mod spending;
pub mod transaction;

// Re-export main types for cleaner imports
pub use quote::{CurrencyRateProvider, StockPriceProvider};
pub use transaction::{Transaction, TransactionSource};
