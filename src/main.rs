use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use finsight::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for finsight::AppCommand {
    fn from(cmd: Commands) -> finsight::AppCommand {
        match cmd {
            Commands::Home { datetime } => finsight::AppCommand::Home { datetime },
            Commands::Cashback { year, month } => finsight::AppCommand::Cashback { year, month },
            Commands::Report { category, date } => finsight::AppCommand::Report { category, date },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the home dashboard for a timestamp
    Home {
        /// Timestamp in "YYYY-MM-DD HH:MM:SS" format
        datetime: String,
    },
    /// Rank spending categories by accumulated cashback
    Cashback {
        /// Year to analyze
        year: i32,
        /// Month to analyze (1-12)
        month: u32,
    },
    /// Spending by category over the trailing three months
    Report {
        /// Category to analyze
        category: String,
        /// Reference date in YYYY-MM-DD format (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => finsight::cli::setup::setup(),
        Some(cmd) => finsight::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
