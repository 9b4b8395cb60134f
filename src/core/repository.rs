//! Exchange rate repository
//!
//! Sits between a [`RateSource`] and its consumers. Every failure from the
//! source is logged here, once, and handed back as a value; callers that only
//! care whether data arrived can use `.ok()`.

use crate::core::currency::ExchangeRate;
use crate::core::mapper;
use crate::core::rates::{RateSource, Result};
use std::sync::Arc;
use tracing::{debug, error};

/// Base used to discover the list of available currencies.
const CURRENCY_LIST_BASE: &str = "usd";

#[derive(Clone)]
pub struct ExchangeRateRepository {
    source: Arc<dyn RateSource>,
}

impl ExchangeRateRepository {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }

    pub async fn get_latest_exchange_rates(&self, base_code: &str) -> Result<Vec<ExchangeRate>> {
        let base_code = base_code.to_lowercase();
        let rates = self
            .source
            .fetch_latest(&base_code)
            .await
            .map(|payload| mapper::to_exchange_rates(&payload))
            .inspect_err(|e| {
                error!(base = %base_code, error = %e, "Failed to fetch latest exchange rates")
            })?;

        debug!(base = %base_code, count = rates.len(), "Fetched latest exchange rates");
        Ok(rates)
    }

    pub async fn get_historical_exchange_rates(
        &self,
        date: &str,
        base_code: &str,
    ) -> Result<Vec<ExchangeRate>> {
        let base_code = base_code.to_lowercase();
        let rates = self
            .source
            .fetch_historical(date, &base_code)
            .await
            .map(|payload| mapper::to_exchange_rates(&payload))
            .inspect_err(|e| {
                error!(
                    base = %base_code,
                    date = %date,
                    error = %e,
                    "Failed to fetch historical exchange rates"
                )
            })?;

        debug!(base = %base_code, date = %date, count = rates.len(), "Fetched historical exchange rates");
        Ok(rates)
    }

    /// Sorted codes of every currency the source quotes against USD.
    pub async fn get_available_currency_codes(&self) -> Result<Vec<String>> {
        self.source
            .fetch_latest(CURRENCY_LIST_BASE)
            .await
            .map(|payload| mapper::to_currency_code_list(&payload))
            .inspect_err(|e| {
                error!(
                    base = %CURRENCY_LIST_BASE,
                    error = %e,
                    "Failed to fetch available currency codes"
                )
            })
    }
}
