//! Maps raw rate payloads into domain types

use crate::core::currency::{Currency, ExchangeRate};
use crate::core::rates::RawRatesPayload;
use std::collections::BTreeSet;

pub fn to_exchange_rates(payload: &RawRatesPayload) -> Vec<ExchangeRate> {
    let base_currency = Currency::new(&payload.base);

    payload
        .rates
        .iter()
        .map(|(target_code, rate)| ExchangeRate {
            base_currency: base_currency.clone(),
            target_currency: Currency::new(target_code),
            rate: *rate,
        })
        .collect()
}

/// All codes in the payload, base included, uppercased and sorted.
pub fn to_currency_code_list(payload: &RawRatesPayload) -> Vec<String> {
    let codes: BTreeSet<String> = std::iter::once(&payload.base)
        .chain(payload.rates.keys())
        .map(|code| code.to_uppercase())
        .collect();

    codes.into_iter().collect()
}
