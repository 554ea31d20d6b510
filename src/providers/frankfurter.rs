use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::join_codes;
use crate::core::error::{FxError, Result};
use crate::core::{CurrencyCode, HistoricalSeries, RateProvider, RateSnapshot, RateTable};

/// Client for the Frankfurter API (ECB reference rates).
pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fxrelay/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!("Requesting rates from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Upstream returned an error status");
            return Err(FxError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| FxError::UpstreamBody(format!("{e} (from {path_and_query})")))
    }
}

fn unit_amount() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default = "unit_amount")]
    amount: f64,
    base: String,
    date: NaiveDate,
    rates: RateTable,
}

#[derive(Debug, Deserialize)]
struct RangeResponse {
    base: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    rates: BTreeMap<NaiveDate, RateTable>,
}

impl From<LatestResponse> for RateSnapshot {
    fn from(r: LatestResponse) -> Self {
        RateSnapshot {
            amount: r.amount,
            base: r.base,
            date: r.date,
            rates: r.rates,
        }
    }
}

impl From<RangeResponse> for HistoricalSeries {
    fn from(r: RangeResponse) -> Self {
        HistoricalSeries {
            base: r.base,
            start_date: r.start_date,
            end_date: r.end_date,
            rates: r.rates,
        }
    }
}

fn target_query(targets: &[CurrencyCode]) -> String {
    if targets.is_empty() {
        String::new()
    } else {
        format!("&to={}", join_codes(targets))
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterLatest", skip(self, base, targets), fields(base = %base))]
    async fn latest(&self, base: &CurrencyCode, targets: &[CurrencyCode]) -> Result<RateSnapshot> {
        let query = format!("/latest?from={base}{}", target_query(targets));
        let data: LatestResponse = self.get_json(&query).await?;
        Ok(data.into())
    }

    #[instrument(name = "FrankfurterConvert", skip(self, from, to), fields(from = %from, to = %to))]
    async fn convert(
        &self,
        amount: f64,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<RateSnapshot> {
        let query = format!("/latest?amount={amount}&from={from}&to={to}");
        let data: LatestResponse = self.get_json(&query).await?;
        Ok(data.into())
    }

    #[instrument(name = "FrankfurterSeries", skip(self, base, targets), fields(base = %base))]
    async fn series(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoricalSeries> {
        let query = format!(
            "/{}..{}?from={base}{}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            target_query(targets)
        );
        let data: RangeResponse = self.get_json(&query).await?;
        Ok(data.into())
    }
}
