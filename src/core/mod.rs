//! Core business logic abstractions

pub mod config;
pub mod convert;
pub mod currency;
pub mod log;
pub mod mapper;
pub mod rates;
pub mod repository;
pub mod session;

// Re-export main types for cleaner imports
pub use convert::convert;
pub use currency::{ConversionResult, Currency, ExchangeRate};
pub use rates::{FetchError, RateSource, RawRatesPayload};
pub use repository::ExchangeRateRepository;
pub use session::{ConverterSession, SessionState};
