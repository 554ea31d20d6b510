use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::CATALOG;
use crate::core::error::Result;
use crate::core::{CurrencyCode, RateProvider, RateTable};

pub const KEY: &str = "overview";

pub const MAJORS: [&str; 6] = ["EUR", "GBP", "JPY", "CHF", "AUD", "CAD"];

pub const SOURCE: &str = "Frankfurter (European Central Bank reference rates)";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewOutput {
    pub base: String,
    pub date: NaiveDate,
    pub rates: RateTable,
    pub source: &'static str,
    pub entrypoints: Vec<&'static str>,
    pub fetched_at: DateTime<Utc>,
}

pub async fn run(provider: &dyn RateProvider) -> Result<OverviewOutput> {
    let majors = MAJORS
        .iter()
        .map(|code| code.parse())
        .collect::<Result<Vec<CurrencyCode>>>()?;
    let snapshot = provider.latest(&CurrencyCode::usd(), &majors).await?;

    Ok(OverviewOutput {
        base: snapshot.base,
        date: snapshot.date,
        rates: snapshot.rates,
        source: SOURCE,
        entrypoints: CATALOG.iter().map(|info| info.key).collect(),
        fetched_at: Utc::now(),
    })
}
