//! Quote provider implementations

pub mod alpha_vantage;

// Re-export main types for cleaner imports
pub use alpha_vantage::AlphaVantageProvider;
