//! Currency codes and the input parsing shared by entrypoints.

use super::error::{FxError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// A 3-letter currency code, always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn usd() -> Self {
        CurrencyCode("USD".to_string())
    }
}

impl FromStr for CurrencyCode {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FxError::validation(format!(
                "currency code must be 3 letters, got {s:?}"
            )));
        }
        Ok(CurrencyCode(code.to_ascii_uppercase()))
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Comma separated list, as the upstream `to` parameter expects.
pub fn join_codes(codes: &[CurrencyCode]) -> String {
    codes
        .iter()
        .map(CurrencyCode::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses an optional base code, falling back to USD.
pub fn parse_base(base: Option<&str>) -> Result<CurrencyCode> {
    base.map_or_else(|| Ok(CurrencyCode::usd()), |b| b.parse())
}

/// Parses a list of codes, dropping duplicates while keeping the first
/// occurrence. The number of distinct codes must lie in `min..=max`.
pub fn parse_codes(
    field: &str,
    raw: &[String],
    min: usize,
    max: usize,
) -> Result<Vec<CurrencyCode>> {
    let mut codes: Vec<CurrencyCode> = Vec::with_capacity(raw.len());
    for item in raw {
        let code: CurrencyCode = item.parse()?;
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    if codes.len() < min || codes.len() > max {
        return Err(FxError::validation(format!(
            "{field} must contain between {min} and {max} distinct currency codes, got {}",
            codes.len()
        )));
    }
    Ok(codes)
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(FxError::validation(format!(
            "{field} must match YYYY-MM-DD, got {raw:?}"
        )));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| FxError::validation(format!("{field} is not a calendar date ({raw}): {e}")))
}
