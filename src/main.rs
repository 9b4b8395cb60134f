use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use curconv::cli::convert::parse_amount;
use curconv::cli::setup::setup;
use curconv::core::log::init_logging;

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

impl From<Commands> for curconv::AppCommand {
    fn from(cmd: Commands) -> curconv::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                curconv::AppCommand::Convert { amount, from, to }
            }
            Commands::Rates { base, date } => curconv::AppCommand::Rates { base, date },
            Commands::Currencies => curconv::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount in the base currency
        #[arg(allow_negative_numbers = true, value_parser = parse_amount)]
        amount: f64,
        /// Base currency code, e.g. USD
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code, e.g. EUR
        #[arg(short, long)]
        to: Option<String>,
    },
    /// List exchange rates for a base currency
    Rates {
        /// Base currency code, e.g. USD
        base: Option<String>,
        /// Historical date (YYYY-MM-DD) instead of the latest rates
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// List available currency codes
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => curconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
