//! Currency domain types

use std::fmt::Display;
use std::hash::{Hash, Hasher};

/// A currency identified by its uppercase code, e.g. `USD`.
///
/// Identity is the code alone: two values with the same code and different
/// display names are equal.
#[derive(Debug, Clone, Eq)]
pub struct Currency {
    pub code: String,
    pub name: String,
}

impl Currency {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_uppercase(),
            name: String::new(),
        }
    }

    pub fn with_name(code: &str, name: &str) -> Self {
        Self {
            code: code.to_uppercase(),
            name: name.to_string(),
        }
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Currency::new(code)
    }
}

/// One unit of `base_currency` is worth `rate` units of `target_currency`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    pub base_currency: Currency,
    pub target_currency: Currency,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub amount: f64,
    pub base_currency: Currency,
    pub converted_amount: f64,
    pub target_currency: Currency,
    pub exchange_rate: f64,
}
