use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::currency::{parse_base, parse_codes};
use crate::core::error::Result;
use crate::core::{RateProvider, RateTable};

pub const KEY: &str = "rates";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RatesInput {
    pub base: Option<String>,
    /// Restricts the result to these codes. Absent or empty means all.
    pub targets: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesOutput {
    pub base: String,
    pub date: NaiveDate,
    pub rates: RateTable,
    pub rate_count: usize,
    pub fetched_at: DateTime<Utc>,
}

pub async fn run(provider: &dyn RateProvider, input: RatesInput) -> Result<RatesOutput> {
    let base = parse_base(input.base.as_deref())?;
    let raw_targets = input.targets.unwrap_or_default();
    let targets = parse_codes("targets", &raw_targets, 0, usize::MAX)?;

    let snapshot = provider.latest(&base, &targets).await?;
    Ok(RatesOutput {
        base: snapshot.base,
        date: snapshot.date,
        rate_count: snapshot.rates.len(),
        rates: snapshot.rates,
        fetched_at: Utc::now(),
    })
}
