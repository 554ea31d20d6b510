//! Priced entrypoints.
//!
//! Each entrypoint module exposes a `KEY`, a typed input, a serializable
//! output and an async `run` function. [`invoke`] dispatches a JSON input to
//! the entrypoint registered under a key and [`CATALOG`] describes them all,
//! including their price metadata.

pub mod compare;
pub mod convert;
pub mod history;
pub mod overview;
pub mod rates;
pub mod report;

use crate::core::RateProvider;
use crate::core::error::{FxError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Price {
    pub amount: &'static str,
    pub currency: &'static str,
}

const fn usd(amount: &'static str) -> Option<Price> {
    Some(Price {
        amount,
        currency: "USD",
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrypointInfo {
    pub key: &'static str,
    pub description: &'static str,
    /// `None` for free entrypoints.
    pub price: Option<Price>,
}

pub static CATALOG: [EntrypointInfo; 6] = [
    EntrypointInfo {
        key: overview::KEY,
        description: "Latest USD rates for the major currencies",
        price: None,
    },
    EntrypointInfo {
        key: convert::KEY,
        description: "Convert an amount from one currency to another",
        price: usd("0.001"),
    },
    EntrypointInfo {
        key: rates::KEY,
        description: "Latest rates for a base currency, optionally filtered",
        price: usd("0.001"),
    },
    EntrypointInfo {
        key: history::KEY,
        description: "Daily rates for a base currency over a date range",
        price: usd("0.002"),
    },
    EntrypointInfo {
        key: compare::KEY,
        description: "Compare 2 to 10 currencies against a base",
        price: usd("0.002"),
    },
    EntrypointInfo {
        key: report::KEY,
        description: "Current rates with 7 day trends for up to 5 currencies",
        price: usd("0.003"),
    },
];

pub fn find(key: &str) -> Option<&'static EntrypointInfo> {
    CATALOG.iter().find(|info| info.key == key)
}

/// Runs the entrypoint registered under `key` with a JSON `input`.
///
/// A `null` input is treated as an empty object so entrypoints whose fields
/// all have defaults can be called without one.
pub async fn invoke(key: &str, provider: &dyn RateProvider, input: Value) -> Result<Value> {
    debug!(key, "Invoking entrypoint");
    match key {
        overview::KEY => to_output(overview::run(provider).await?),
        convert::KEY => to_output(convert::run(provider, parse_input(input)?).await?),
        rates::KEY => to_output(rates::run(provider, parse_input(input)?).await?),
        history::KEY => to_output(history::run(provider, parse_input(input)?).await?),
        compare::KEY => to_output(compare::run(provider, parse_input(input)?).await?),
        report::KEY => to_output(report::run(provider, parse_input(input)?).await?),
        _ => Err(FxError::UnknownEntrypoint(key.to_string())),
    }
}

fn parse_input<T: DeserializeOwned>(input: Value) -> Result<T> {
    let input = if input.is_null() {
        Value::Object(Default::default())
    } else {
        input
    };
    serde_json::from_value(input).map_err(|e| FxError::validation(e.to_string()))
}

fn to_output<T: Serialize>(output: T) -> Result<Value> {
    Ok(serde_json::to_value(output)?)
}
