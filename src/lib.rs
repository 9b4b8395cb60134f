pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{ConverterSession, ExchangeRateRepository};
use crate::providers::CurrencyApiClient;
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: f64,
        from: Option<String>,
        to: Option<String>,
    },
    Rates {
        base: Option<String>,
        date: Option<NaiveDate>,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let api = &config.providers.currency_api;
    let client = CurrencyApiClient::with_timeout(&api.base_url, api.timeout())?;
    let repository = ExchangeRateRepository::new(Arc::new(client));

    match command {
        AppCommand::Convert { amount, from, to } => {
            let base = from.unwrap_or(config.base_currency);
            let target = to.unwrap_or(config.target_currency);
            let session = ConverterSession::with_selection(repository, &base, &target);
            cli::convert::run(&session, amount).await
        }
        AppCommand::Rates { base, date } => {
            let base = base.unwrap_or(config.base_currency);
            cli::rates::run(&repository, &base, date).await
        }
        AppCommand::Currencies => cli::currencies::run(&repository).await,
    }
}
