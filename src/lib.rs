pub mod cli;
pub mod core;
pub mod providers;
pub mod statement;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::core::config::AppConfig;
use crate::core::settings::UserSettings;
use crate::providers::AlphaVantageProvider;
use crate::statement::ExcelStatementSource;

#[derive(Debug, Clone)]
pub enum AppCommand {
    Home { datetime: String },
    Cashback { year: i32, month: u32 },
    Report { category: String, date: Option<String> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Statement analyzer starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let source = ExcelStatementSource::new(&config.statement_path);

    match command {
        AppCommand::Cashback { year, month } => cli::cashback::run(&source, year, month),
        AppCommand::Report { category, date } => {
            cli::report::run(&source, &category, date.as_deref())
        }
        AppCommand::Home { datetime } => {
            let settings = UserSettings::load_from_path(&config.settings_path);
            let api_key = config.api_key().unwrap_or_else(|| {
                warn!("No API key configured; quote lookups will be unavailable");
                String::new()
            });
            let provider = AlphaVantageProvider::new(
                config.alpha_vantage_url(),
                &api_key,
                &config.base_currency,
            )?;
            cli::home::run(&datetime, &source, &settings, &provider, &provider).await
        }
    }
}
