//! Currency conversion against a fetched rate set

use crate::core::currency::{ConversionResult, Currency, ExchangeRate};

/// Converts `amount` using the first rate in `rates` quoted from `base` to
/// `target`.
///
/// Returns `None` when `rates` has no such pair. No rounding is applied and
/// `amount` is not validated.
pub fn convert(
    amount: f64,
    base: &Currency,
    target: &Currency,
    rates: &[ExchangeRate],
) -> Option<ConversionResult> {
    let exchange_rate = rates
        .iter()
        .find(|r| r.base_currency == *base && r.target_currency == *target)?
        .rate;

    Some(ConversionResult {
        amount,
        base_currency: base.clone(),
        converted_amount: amount * exchange_rate,
        target_currency: target.clone(),
        exchange_rate,
    })
}
