//! Converter session state
//!
//! Holds the current selections and the last fetched rate set, and publishes
//! every change through a [`watch`] channel so a front end can subscribe to it.

use crate::core::convert::convert;
use crate::core::currency::{ConversionResult, Currency, ExchangeRate};
use crate::core::repository::ExchangeRateRepository;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

pub const DEFAULT_BASE_CURRENCY: &str = "USD";
pub const DEFAULT_TARGET_CURRENCY: &str = "EUR";
const DEFAULT_AMOUNT: &str = "1.0";
const NO_RESULT: &str = "0.0";
const RATE_NOT_FOUND: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub currencies: Vec<String>,
    pub rates: Vec<ExchangeRate>,
    pub base_currency: String,
    pub target_currency: String,
    /// Amount as typed by the user
    pub amount: String,
    /// Display text of the last conversion
    pub converted_amount: String,
    pub last_result: Option<ConversionResult>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl SessionState {
    fn new(base_currency: &str, target_currency: &str) -> Self {
        Self {
            currencies: Vec::new(),
            rates: Vec::new(),
            base_currency: base_currency.to_uppercase(),
            target_currency: target_currency.to_uppercase(),
            amount: DEFAULT_AMOUNT.to_string(),
            converted_amount: NO_RESULT.to_string(),
            last_result: None,
            is_loading: false,
            error_message: None,
        }
    }

    fn recompute(&mut self) {
        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .unwrap_or(0.0);

        if self.rates.is_empty() {
            self.converted_amount = NO_RESULT.to_string();
            self.last_result = None;
            return;
        }

        let base = Currency::new(&self.base_currency);
        let target = Currency::new(&self.target_currency);
        self.last_result = convert(amount, &base, &target, &self.rates);
        self.converted_amount = match &self.last_result {
            Some(result) => format!("{:.2}", result.converted_amount),
            None => RATE_NOT_FOUND.to_string(),
        };
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_CURRENCY, DEFAULT_TARGET_CURRENCY)
    }
}

pub struct ConverterSession {
    repository: ExchangeRateRepository,
    state: watch::Sender<SessionState>,
    // Bumped on every rates request; only the latest one may apply its result
    generation: AtomicU64,
}

impl ConverterSession {
    pub fn new(repository: ExchangeRateRepository) -> Self {
        Self::with_selection(repository, DEFAULT_BASE_CURRENCY, DEFAULT_TARGET_CURRENCY)
    }

    pub fn with_selection(
        repository: ExchangeRateRepository,
        base_currency: &str,
        target_currency: &str,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::new(base_currency, target_currency));
        Self {
            repository,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Loads the currency list and the rates for the selected base.
    pub async fn initialize(&self) {
        let base = self.state.borrow().base_currency.clone();
        futures::join!(self.load_currencies(), self.fetch_latest_rates(&base));
    }

    pub async fn load_currencies(&self) {
        match self.repository.get_available_currency_codes().await {
            Ok(codes) => self.state.send_modify(|s| s.currencies = codes),
            Err(_) => self.state.send_modify(|s| {
                s.error_message = Some("Failed to load available currencies.".to_string())
            }),
        }
    }

    pub async fn fetch_latest_rates(&self, base_currency: &str) {
        let base_currency = base_currency.to_uppercase();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message = None;
            s.base_currency = base_currency.clone();
        });

        let result = self.repository.get_latest_exchange_rates(&base_currency).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(base = %base_currency, "Discarding rates superseded by a newer request");
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = false;
            match result {
                Ok(rates) => {
                    let mut codes: BTreeSet<String> = rates
                        .iter()
                        .map(|r| r.target_currency.code.clone())
                        .collect();
                    codes.insert(base_currency.clone());
                    s.currencies = codes.into_iter().collect();
                    s.rates = rates;
                    s.recompute();
                }
                Err(_) => {
                    s.error_message = Some(format!(
                        "Failed to load exchange rates for {base_currency}. Please try again later."
                    ));
                    s.rates.clear();
                    s.last_result = None;
                    s.converted_amount = NO_RESULT.to_string();
                }
            }
        });
    }

    pub async fn set_base_currency(&self, code: &str) {
        let code = code.to_uppercase();
        if self.state.borrow().base_currency != code {
            self.fetch_latest_rates(&code).await;
        }
    }

    pub fn set_target_currency(&self, code: &str) {
        let code = code.to_uppercase();
        self.state.send_if_modified(|s| {
            if s.target_currency == code {
                return false;
            }
            s.target_currency = code;
            s.recompute();
            true
        });
    }

    pub fn set_amount(&self, amount: &str) {
        self.state.send_modify(|s| {
            s.amount = amount.to_string();
            s.recompute();
        });
    }

    /// Recomputes the conversion from the current selections and rates.
    pub fn convert_currency(&self) {
        self.state.send_modify(SessionState::recompute);
    }
}
