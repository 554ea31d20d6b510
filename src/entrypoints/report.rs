use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::currency::{parse_base, parse_codes};
use crate::core::error::{FxError, Result};
use crate::core::rates::lookup;
use crate::core::{RateProvider, TrendRecord};

pub const KEY: &str = "report";

pub const MAX_TARGETS: usize = 5;

/// Calendar days covered by the trend window.
pub const TREND_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportInput {
    pub base: Option<String>,
    pub targets: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutput {
    pub base: String,
    pub date: NaiveDate,
    pub period: Period,
    pub trends: Vec<TrendRecord>,
    pub generated_at: DateTime<Utc>,
}

pub async fn run(provider: &dyn RateProvider, input: ReportInput) -> Result<ReportOutput> {
    run_on(provider, input, Utc::now().date_naive()).await
}

async fn run_on(
    provider: &dyn RateProvider,
    input: ReportInput,
    today: NaiveDate,
) -> Result<ReportOutput> {
    let base = parse_base(input.base.as_deref())?;
    let targets = parse_codes("targets", &input.targets, 1, MAX_TARGETS)?;
    let window_start = today
        .checked_sub_days(Days::new(TREND_WINDOW_DAYS))
        .ok_or_else(|| FxError::validation(format!("no trend window before {today}")))?;

    let latest = provider.latest(&base, &targets).await?;
    let series = provider
        .series(&base, &targets, window_start, today)
        .await?;

    let (_, earliest) = series.earliest().ok_or_else(|| {
        FxError::UpstreamBody(format!("no history between {window_start} and {today}"))
    })?;

    let mut trends = Vec::with_capacity(targets.len());
    for currency in targets {
        let current = latest.rate(&currency)?;
        let previous = lookup(earliest, &currency)?;
        trends.push(TrendRecord::new(currency, current, previous)?);
    }

    Ok(ReportOutput {
        base: latest.base,
        date: latest.date,
        period: Period {
            start_date: series.start_date,
            end_date: series.end_date,
        },
        trends,
        generated_at: Utc::now(),
    })
}
