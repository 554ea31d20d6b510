use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::currency::{parse_base, parse_codes, parse_date};
use crate::core::error::{FxError, Result};
use crate::core::{RateProvider, RateTable};

pub const KEY: &str = "history";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistoryInput {
    pub base: Option<String>,
    pub targets: Vec<String>,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOutput {
    pub base: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rates: BTreeMap<NaiveDate, RateTable>,
    pub data_points: usize,
}

pub async fn run(provider: &dyn RateProvider, input: HistoryInput) -> Result<HistoryOutput> {
    let base = parse_base(input.base.as_deref())?;
    let targets = parse_codes("targets", &input.targets, 1, usize::MAX)?;
    let start = parse_date("startDate", &input.start_date)?;
    let end = parse_date("endDate", &input.end_date)?;
    if start > end {
        return Err(FxError::validation(format!(
            "startDate {start} is after endDate {end}"
        )));
    }

    let series = provider.series(&base, &targets, start, end).await?;
    Ok(HistoryOutput {
        base: series.base,
        start_date: series.start_date,
        end_date: series.end_date,
        data_points: series.rates.len(),
        rates: series.rates,
    })
}
