//! Core types shared by the upstream provider, entrypoints and server

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use currency::CurrencyCode;
pub use error::{ErrorCode, FxError};
pub use rates::{HistoricalSeries, RateProvider, RateSnapshot, RateTable, TrendRecord};
