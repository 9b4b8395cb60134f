//! Rate source abstractions and the raw payload they produce

use async_trait::async_trait;
use std::collections::BTreeMap;

/// One deserialized rates response, still in the API's lowercase codes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRatesPayload {
    pub date: String,
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Failed to decode rates response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport { source, .. } if source.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Latest rates quoted against `base_code`.
    async fn fetch_latest(&self, base_code: &str) -> Result<RawRatesPayload>;

    /// Rates for `base_code` as published on `date` (`YYYY-MM-DD`, unchecked).
    async fn fetch_historical(&self, date: &str, base_code: &str) -> Result<RawRatesPayload>;
}
