//! Exchange rate data model and the upstream provider abstraction.

use super::currency::CurrencyCode;
use super::error::{FxError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rates keyed by currency code.
pub type RateTable = BTreeMap<String, f64>;

/// Latest rates for one base currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    /// Amount of `base` the rates are quoted for. 1 unless converting.
    pub amount: f64,
    pub base: String,
    pub date: NaiveDate,
    pub rates: RateTable,
}

impl RateSnapshot {
    pub fn rate(&self, currency: &CurrencyCode) -> Result<f64> {
        lookup(&self.rates, currency)
    }
}

/// Rates for a base currency over a date range, ordered by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSeries {
    pub base: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rates: BTreeMap<NaiveDate, RateTable>,
}

impl HistoricalSeries {
    /// Rates on the earliest date of the series.
    pub fn earliest(&self) -> Option<(NaiveDate, &RateTable)> {
        self.rates.first_key_value().map(|(date, table)| (*date, table))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRecord {
    pub currency: CurrencyCode,
    pub current_rate: f64,
    pub previous_rate: f64,
    pub change: f64,
    pub change_percent: String,
}

impl TrendRecord {
    /// Both rates must be positive and finite.
    pub fn new(currency: CurrencyCode, current_rate: f64, previous_rate: f64) -> Result<Self> {
        for rate in [current_rate, previous_rate] {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(FxError::UpstreamBody(format!(
                    "rate for {currency} must be positive, got {rate}"
                )));
            }
        }
        let change = current_rate - previous_rate;
        let percent = change / previous_rate * 100.0;
        Ok(TrendRecord {
            currency,
            current_rate,
            previous_rate,
            change,
            change_percent: format_signed_percent(change, percent),
        })
    }
}

/// `+X.XX%` when `change` is non-negative, `-X.XX%` otherwise.
pub fn format_signed_percent(change: f64, percent: f64) -> String {
    if change >= 0.0 {
        format!("+{:.2}%", percent.abs())
    } else {
        format!("-{:.2}%", percent.abs())
    }
}

pub fn lookup(rates: &RateTable, currency: &CurrencyCode) -> Result<f64> {
    rates
        .get(currency.as_str())
        .copied()
        .ok_or_else(|| FxError::MissingRate {
            currency: currency.to_string(),
        })
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Latest rates for `base`, restricted to `targets` unless empty.
    async fn latest(&self, base: &CurrencyCode, targets: &[CurrencyCode]) -> Result<RateSnapshot>;

    /// Latest rates for `amount` units of `from`, quoted in `to`.
    async fn convert(
        &self,
        amount: f64,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<RateSnapshot>;

    /// Daily rates between `start` and `end`, inclusive.
    async fn series(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoricalSeries>;
}
