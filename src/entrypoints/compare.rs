use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::currency::{parse_base, parse_codes};
use crate::core::error::Result;
use crate::core::{CurrencyCode, RateProvider};

pub const KEY: &str = "compare";

pub const MIN_CURRENCIES: usize = 2;
pub const MAX_CURRENCIES: usize = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompareInput {
    pub base: Option<String>,
    pub currencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub currency: CurrencyCode,
    /// Units of `currency` per unit of base.
    pub rate: f64,
    /// Units of base per unit of `currency`.
    pub inverse: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOutput {
    pub base: String,
    pub date: NaiveDate,
    /// Sorted by rate, lowest first.
    pub comparison: Vec<ComparisonEntry>,
    /// Lowest rate: fewest units buy one unit of base.
    pub strongest: ComparisonEntry,
    /// Highest rate: most units buy one unit of base.
    pub weakest: ComparisonEntry,
    pub fetched_at: DateTime<Utc>,
}

pub async fn run(provider: &dyn RateProvider, input: CompareInput) -> Result<CompareOutput> {
    let base = parse_base(input.base.as_deref())?;
    let currencies = parse_codes(
        "currencies",
        &input.currencies,
        MIN_CURRENCIES,
        MAX_CURRENCIES,
    )?;

    let snapshot = provider.latest(&base, &currencies).await?;

    let mut comparison = Vec::with_capacity(currencies.len());
    for currency in currencies {
        let rate = snapshot.rate(&currency)?;
        comparison.push(ComparisonEntry {
            currency,
            rate,
            inverse: 1.0 / rate,
        });
    }
    comparison.sort_by(|a, b| a.rate.total_cmp(&b.rate));

    // parse_codes guarantees at least MIN_CURRENCIES entries
    let strongest = comparison[0].clone();
    let weakest = comparison[comparison.len() - 1].clone();

    Ok(CompareOutput {
        base: snapshot.base,
        date: snapshot.date,
        comparison,
        strongest,
        weakest,
        fetched_at: Utc::now(),
    })
}
