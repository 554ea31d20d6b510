use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::{FxError, Result};
use crate::core::{CurrencyCode, RateProvider};

pub const KEY: &str = "convert";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConvertInput {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

/// A validated conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl TryFrom<ConvertInput> for ConversionRequest {
    type Error = FxError;

    fn try_from(input: ConvertInput) -> Result<Self> {
        if !input.amount.is_finite() || input.amount <= 0.0 {
            return Err(FxError::validation(format!(
                "amount must be a positive number, got {}",
                input.amount
            )));
        }
        Ok(ConversionRequest {
            amount: input.amount,
            from: input.from.parse()?,
            to: input.to.parse()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Money {
    pub amount: f64,
    pub currency: CurrencyCode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOutput {
    pub original: Money,
    pub converted: Money,
    /// Units of `to` per unit of `from`.
    pub rate: f64,
    pub date: NaiveDate,
    pub fetched_at: DateTime<Utc>,
}

pub async fn run(provider: &dyn RateProvider, input: ConvertInput) -> Result<ConvertOutput> {
    let request = ConversionRequest::try_from(input)?;
    let snapshot = provider
        .convert(request.amount, &request.from, &request.to)
        .await?;
    let converted = snapshot.rate(&request.to)?;

    Ok(ConvertOutput {
        rate: converted / request.amount,
        original: Money {
            amount: request.amount,
            currency: request.from,
        },
        converted: Money {
            amount: converted,
            currency: request.to,
        },
        date: snapshot.date,
        fetched_at: Utc::now(),
    })
}
